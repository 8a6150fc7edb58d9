//! Payload construction for both fan-out channels.
//!
//! Pure functions: given the same request and registry snapshot, the
//! built push payload and SMS message are identical across runs.

use uuid::Uuid;

use bloodbridge_common::types::{NotifiableUser, PushData, PushPayload, SosRequest};

/// Routing marker the mobile client uses to open the SOS detail view.
pub const CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";

/// Collect the device tokens of the resolved users.
///
/// Users without a token, or with an empty one, are dropped silently.
pub fn collect_device_tokens(users: &[NotifiableUser]) -> Vec<String> {
    users
        .iter()
        .filter_map(|user| user.fcm_token.as_deref())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build the single push payload shared across all device tokens.
pub fn build_push_payload(sos_id: Uuid, sos: &SosRequest) -> PushPayload {
    PushPayload {
        title: format!("🚨 Urgent Blood Need: {}", sos.blood_group),
        body: format!("Required in {}. Tap to view details.", sos.district),
        data: PushData {
            sos_id,
            district: sos.district.clone(),
            blood_group: sos.blood_group.clone(),
            note: sos.note.clone().unwrap_or_default(),
            click_action: CLICK_ACTION.to_string(),
        },
    }
}

/// Build the SMS message body shared across all donor queue records.
///
/// The note clause is included only when the request carries a non-empty
/// note.
pub fn build_sms_message(sos: &SosRequest) -> String {
    let mut message = format!(
        "BloodBridge SOS: Need {} in {}. ",
        sos.blood_group, sos.district
    );
    if let Some(note) = sos.note.as_deref().filter(|n| !n.is_empty()) {
        message.push_str(&format!("Note: {}. ", note));
    }
    message.push_str("If you can help, open the app.");
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sos(note: Option<&str>) -> SosRequest {
        SosRequest {
            district: "Colombo".to_string(),
            blood_group: "O+".to_string(),
            note: note.map(str::to_string),
        }
    }

    fn make_user(token: Option<&str>) -> NotifiableUser {
        NotifiableUser {
            id: Uuid::new_v4(),
            district: "Colombo".to_string(),
            blood_group: "O+".to_string(),
            is_blood_clear: true,
            fcm_token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_collect_tokens_drops_missing_and_empty() {
        let users = vec![
            make_user(Some("tokA")),
            make_user(None),
            make_user(Some("")),
            make_user(Some("tokB")),
        ];
        assert_eq!(collect_device_tokens(&users), vec!["tokA", "tokB"]);
    }

    #[test]
    fn test_push_payload_interpolates_request_fields() {
        let sos_id = Uuid::new_v4();
        let payload = build_push_payload(sos_id, &make_sos(Some("Surgery at 6pm")));

        assert_eq!(payload.title, "🚨 Urgent Blood Need: O+");
        assert_eq!(payload.body, "Required in Colombo. Tap to view details.");
        assert_eq!(payload.data.sos_id, sos_id);
        assert_eq!(payload.data.district, "Colombo");
        assert_eq!(payload.data.blood_group, "O+");
        assert_eq!(payload.data.note, "Surgery at 6pm");
        assert_eq!(payload.data.click_action, CLICK_ACTION);
    }

    #[test]
    fn test_push_payload_note_defaults_to_empty_string() {
        let payload = build_push_payload(Uuid::new_v4(), &make_sos(None));
        assert_eq!(payload.data.note, "");
    }

    #[test]
    fn test_sms_message_with_note() {
        let message = build_sms_message(&make_sos(Some("Surgery at 6pm")));
        assert_eq!(
            message,
            "BloodBridge SOS: Need O+ in Colombo. Note: Surgery at 6pm. \
             If you can help, open the app."
        );
    }

    #[test]
    fn test_sms_message_without_note() {
        let message = build_sms_message(&make_sos(None));
        assert_eq!(
            message,
            "BloodBridge SOS: Need O+ in Colombo. If you can help, open the app."
        );
        assert!(!message.contains("Note:"));
    }

    #[test]
    fn test_sms_message_empty_note_omits_clause() {
        let message = build_sms_message(&make_sos(Some("")));
        assert!(!message.contains("Note:"));
    }

    #[test]
    fn test_construction_is_deterministic() {
        let sos_id = Uuid::new_v4();
        let sos = make_sos(Some("Surgery at 6pm"));
        assert_eq!(
            build_push_payload(sos_id, &sos),
            build_push_payload(sos_id, &sos)
        );
        assert_eq!(build_sms_message(&sos), build_sms_message(&sos));
    }
}
