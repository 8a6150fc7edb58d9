//! SOS dispatch pipeline.
//!
//! Receives a newly created SOS request and:
//! 1. Screens it for the required matching keys (via `intake`)
//! 2. Resolves both recipient registries (via `RecipientResolver`)
//! 3. Builds the channel payloads (via `payload`)
//! 4. Sends one batched push call and commits the pending-SMS batch
//!
//! The two side-effecting channels are failure-isolated: a failed push
//! call never blocks the SMS enqueue, and vice versa. Only the SMS batch
//! write is atomic; there is no atomicity across channels.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use bloodbridge_common::error::AppError;
use bloodbridge_common::types::{Donor, SmsStatus, SosRequest};
use bloodbridge_push::PushSender;

use crate::intake::{self, IntakeOutcome, SkipReason};
use crate::payload;
use crate::resolver::RecipientResolver;

/// Central dispatcher that fans one created SOS out to both channels.
///
/// Capabilities are injected at construction; the hosting process owns
/// their lifecycle.
pub struct SosDispatcher {
    pool: PgPool,
    push: Arc<dyn PushSender>,
}

/// Per-channel results of one dispatch invocation.
///
/// Failures land here as observability data; nothing is retried and no
/// caller is waiting on a response.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Number of device tokens the batched push call covered.
    pub tokens_notified: usize,
    /// Number of pending-SMS rows actually inserted (conflict-skipped
    /// duplicates from a redelivered event are not counted).
    pub sms_queued: u64,
    pub push_error: Option<String>,
    pub sms_error: Option<String>,
}

/// Terminal state of one pipeline invocation.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The request was missing a matching key; zero side effects.
    Skipped(SkipReason),
    Dispatched(DispatchReport),
}

impl SosDispatcher {
    pub fn new(pool: PgPool, push: Arc<dyn PushSender>) -> Self {
        Self { pool, push }
    }

    /// Run the full pipeline for one created request.
    ///
    /// Invocations are stateless and independent; the hosting trigger may
    /// redeliver the same creation event, and the pending-SMS unique key
    /// keeps that from duplicating queue records.
    pub async fn dispatch(&self, sos_id: Uuid, sos: &SosRequest) -> DispatchOutcome {
        tracing::info!(
            sos_id = %sos_id,
            district = %sos.district,
            blood_group = %sos.blood_group,
            "New SOS received"
        );

        if let IntakeOutcome::Skip(reason) = intake::screen(sos) {
            tracing::info!(sos_id = %sos_id, reason = %reason, "Skipping SOS, matching keys incomplete");
            return DispatchOutcome::Skipped(reason);
        }

        // The two lookups have no ordering dependency on each other.
        let (users, donors) = tokio::join!(
            RecipientResolver::notifiable_users(&self.pool, &sos.district, &sos.blood_group),
            RecipientResolver::eligible_donors(&self.pool, &sos.district, &sos.blood_group),
        );

        let mut report = DispatchReport::default();

        match users {
            Ok(users) => {
                if users.is_empty() {
                    tracing::info!(sos_id = %sos_id, "No matching users found for push notifications");
                }
                let tokens = payload::collect_device_tokens(&users);
                if !tokens.is_empty() {
                    tracing::info!(sos_id = %sos_id, tokens = tokens.len(), "Sending push notifications");
                    let push_payload = payload::build_push_payload(sos_id, sos);
                    match self.push.send(&tokens, &push_payload).await {
                        Ok(()) => report.tokens_notified = tokens.len(),
                        Err(e) => {
                            tracing::warn!(sos_id = %sos_id, error = %e, "Push dispatch failed");
                            report.push_error = Some(e.to_string());
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    sos_id = %sos_id,
                    error = %e,
                    "User registry lookup failed, push channel disabled for this SOS"
                );
                report.push_error = Some(e.to_string());
            }
        }

        match donors {
            Ok(donors) => {
                if donors.is_empty() {
                    tracing::info!(sos_id = %sos_id, "No matching donors found for SMS queueing");
                } else {
                    match self.enqueue_pending_sms(sos_id, sos, &donors).await {
                        Ok(queued) => report.sms_queued = queued,
                        Err(e) => {
                            tracing::warn!(sos_id = %sos_id, error = %e, "Pending SMS batch commit failed");
                            report.sms_error = Some(e.to_string());
                        }
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    sos_id = %sos_id,
                    error = %e,
                    "Donor registry lookup failed, SMS channel disabled for this SOS"
                );
                report.sms_error = Some(e.to_string());
            }
        }

        tracing::info!(
            sos_id = %sos_id,
            tokens_notified = report.tokens_notified,
            sms_queued = report.sms_queued,
            "SOS dispatch complete"
        );

        DispatchOutcome::Dispatched(report)
    }

    /// Commit one pending-SMS row per donor with a phone, as a single
    /// atomic batch. Donors without a phone are skipped silently.
    ///
    /// `ON CONFLICT (sos_id, donor_id) DO NOTHING` makes a redelivered
    /// creation event a no-op here; `created_at` is assigned by the
    /// database.
    async fn enqueue_pending_sms(
        &self,
        sos_id: Uuid,
        sos: &SosRequest,
        donors: &[Donor],
    ) -> Result<u64, AppError> {
        let message = payload::build_sms_message(sos);

        let mut tx = self.pool.begin().await?;
        let mut queued = 0u64;

        for donor in donors {
            let Some(phone) = donor.phone.as_deref().filter(|p| !p.is_empty()) else {
                continue;
            };

            let result = sqlx::query(
                r#"
                INSERT INTO pending_sms (id, sos_id, donor_id, phone, message, status)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (sos_id, donor_id) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(sos_id)
            .bind(donor.id)
            .bind(phone)
            .bind(&message)
            .bind(SmsStatus::Pending.to_string())
            .execute(&mut *tx)
            .await?;

            queued += result.rows_affected();
        }

        tx.commit().await?;

        if queued > 0 {
            tracing::info!(sos_id = %sos_id, queued, "Pending SMS records created");
        }

        Ok(queued)
    }
}
