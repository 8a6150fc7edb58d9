//! Push delivery transport.
//!
//! Exposes the `PushSender` capability consumed by the dispatch pipeline
//! and an FCM HTTP implementation of it. The transport sends one batched
//! call per payload; per-token outcomes (stale tokens, unregistered
//! devices) are FCM's concern and are not inspected here.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::json;

use bloodbridge_common::error::AppError;
use bloodbridge_common::types::PushPayload;

/// Capability for delivering one push payload to a set of device tokens.
///
/// Injected into the dispatch pipeline at construction; the hosting
/// process owns the client's lifecycle.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Deliver `payload` to every token in `tokens` as one batched call.
    async fn send(&self, tokens: &[String], payload: &PushPayload) -> Result<(), AppError>;
}

/// FCM client speaking the legacy HTTP send endpoint.
pub struct FcmClient {
    http: reqwest::Client,
    endpoint: String,
    server_key: String,
}

impl FcmClient {
    pub fn new(endpoint: String, server_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            server_key,
        }
    }

    /// Build the FCM request body for a batched token send.
    fn request_body(tokens: &[String], payload: &PushPayload) -> serde_json::Value {
        json!({
            "registration_ids": tokens,
            "notification": {
                "title": payload.title,
                "body": payload.body,
            },
            "data": payload.data,
        })
    }
}

#[async_trait]
impl PushSender for FcmClient {
    async fn send(&self, tokens: &[String], payload: &PushPayload) -> Result<(), AppError> {
        let body = Self::request_body(tokens, payload);

        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("key={}", self.server_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Push(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Push(format!(
                "FCM returned status {}",
                status
            )));
        }

        tracing::info!(tokens = tokens.len(), "Push notifications sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloodbridge_common::types::PushData;
    use uuid::Uuid;

    fn make_payload() -> PushPayload {
        PushPayload {
            title: "🚨 Urgent Blood Need: O+".to_string(),
            body: "Required in Colombo. Tap to view details.".to_string(),
            data: PushData {
                sos_id: Uuid::nil(),
                district: "Colombo".to_string(),
                blood_group: "O+".to_string(),
                note: "Surgery at 6pm".to_string(),
                click_action: "FLUTTER_NOTIFICATION_CLICK".to_string(),
            },
        }
    }

    #[test]
    fn test_request_body_shape() {
        let tokens = vec!["tokA".to_string(), "tokB".to_string()];
        let body = FcmClient::request_body(&tokens, &make_payload());

        assert_eq!(
            body["registration_ids"],
            serde_json::json!(["tokA", "tokB"])
        );
        assert_eq!(body["notification"]["title"], "🚨 Urgent Blood Need: O+");
        assert_eq!(
            body["notification"]["body"],
            "Required in Colombo. Tap to view details."
        );
    }

    #[test]
    fn test_request_body_data_keys() {
        let tokens = vec!["tokA".to_string()];
        let body = FcmClient::request_body(&tokens, &make_payload());

        let data = &body["data"];
        assert_eq!(data["sosId"], Uuid::nil().to_string());
        assert_eq!(data["district"], "Colombo");
        assert_eq!(data["bloodGroup"], "O+");
        assert_eq!(data["note"], "Surgery at 6pm");
        assert_eq!(data["click_action"], "FLUTTER_NOTIFICATION_CLICK");
    }
}
