//! SOS creation listener.
//!
//! The `sos_requests` insert trigger raises a `sos_created` notification
//! carrying the new row id. This listener consumes those notifications
//! and runs the dispatch pipeline once per created request. Delivery is
//! at-least-once; the pipeline's pending-SMS unique key absorbs
//! redelivered events on the queue side.

use sqlx::PgPool;
use sqlx::postgres::PgListener;
use uuid::Uuid;

use bloodbridge_common::types::SosRequest;
use bloodbridge_dispatch::pipeline::{DispatchOutcome, SosDispatcher};

/// Notification channel raised by the `sos_requests` insert trigger.
pub const SOS_CHANNEL: &str = "sos_created";

/// Long-running consumer of SOS creation notifications.
pub struct SosListener {
    listener: PgListener,
    pool: PgPool,
    dispatcher: SosDispatcher,
}

impl SosListener {
    /// Connect a dedicated listening session and subscribe to the SOS
    /// creation channel.
    pub async fn connect(
        database_url: &str,
        pool: PgPool,
        dispatcher: SosDispatcher,
    ) -> anyhow::Result<Self> {
        let mut listener = PgListener::connect(database_url).await?;
        listener.listen(SOS_CHANNEL).await?;

        Ok(Self {
            listener,
            pool,
            dispatcher,
        })
    }

    /// Consume notifications until the connection fails.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        tracing::info!(channel = SOS_CHANNEL, "SOS listener started");

        loop {
            let notification = self.listener.recv().await?;
            let raw = notification.payload();

            let sos_id: Uuid = match raw.parse() {
                Ok(id) => id,
                Err(_) => {
                    tracing::warn!(payload = raw, "Ignoring notification with malformed SOS id");
                    continue;
                }
            };

            self.handle_sos(sos_id).await;
        }
    }

    /// Load the created row and hand it to the pipeline. Dispatch
    /// failures are observability events only; the loop keeps running.
    async fn handle_sos(&self, sos_id: Uuid) {
        let sos: Option<SosRequest> = match sqlx::query_as(
            "SELECT district, blood_group, note FROM sos_requests WHERE id = $1",
        )
        .bind(sos_id)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(row) => row,
            Err(e) => {
                tracing::error!(sos_id = %sos_id, error = %e, "Failed to load SOS row");
                return;
            }
        };

        let Some(sos) = sos else {
            tracing::warn!(sos_id = %sos_id, "SOS row vanished before dispatch, skipping");
            return;
        };

        match self.dispatcher.dispatch(sos_id, &sos).await {
            DispatchOutcome::Skipped(reason) => {
                tracing::info!(sos_id = %sos_id, reason = %reason, "SOS skipped");
            }
            DispatchOutcome::Dispatched(report) => {
                tracing::info!(
                    sos_id = %sos_id,
                    tokens_notified = report.tokens_notified,
                    sms_queued = report.sms_queued,
                    push_failed = report.push_error.is_some(),
                    sms_failed = report.sms_error.is_some(),
                    "SOS fan-out finished"
                );
            }
        }
    }
}
