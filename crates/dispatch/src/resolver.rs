//! Recipient resolution — the two registry lookups behind the fan-out.
//!
//! Each lookup is an exact-equality filter on `district`, `blood_group`
//! and the eligibility flag. The two queries are independent: the push
//! channel reads the user registry (device tokens live there), the SMS
//! channel reads the donor registry. Empty results are valid.

use sqlx::PgPool;

use bloodbridge_common::error::AppError;
use bloodbridge_common::types::{Donor, NotifiableUser};

/// Resolves the recipient sets for both fan-out channels.
pub struct RecipientResolver;

impl RecipientResolver {
    /// Find all eligible users registered for push notifications in the
    /// given district with the given blood group.
    pub async fn notifiable_users(
        pool: &PgPool,
        district: &str,
        blood_group: &str,
    ) -> Result<Vec<NotifiableUser>, AppError> {
        let users: Vec<NotifiableUser> = sqlx::query_as(
            r#"
            SELECT *
            FROM users
            WHERE district = $1
              AND blood_group = $2
              AND is_blood_clear = true
            "#,
        )
        .bind(district)
        .bind(blood_group)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Find all eligible donor contacts in the given district with the
    /// given blood group.
    pub async fn eligible_donors(
        pool: &PgPool,
        district: &str,
        blood_group: &str,
    ) -> Result<Vec<Donor>, AppError> {
        let donors: Vec<Donor> = sqlx::query_as(
            r#"
            SELECT *
            FROM donors
            WHERE district = $1
              AND blood_group = $2
              AND is_blood_clear = true
            "#,
        )
        .bind(district)
        .bind(blood_group)
        .fetch_all(pool)
        .await?;

        Ok(donors)
    }
}
