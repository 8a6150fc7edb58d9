//! Request intake — screens a newly created SOS before fan-out.
//!
//! A request missing either matching key is a clean skip, not an error:
//! the pipeline terminates with zero side effects and logs the reason.

use bloodbridge_common::types::SosRequest;

/// Why an incoming request was skipped without side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingDistrict,
    MissingBloodGroup,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingDistrict => write!(f, "missing_district"),
            SkipReason::MissingBloodGroup => write!(f, "missing_blood_group"),
        }
    }
}

/// Result of screening an incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeOutcome {
    Proceed,
    Skip(SkipReason),
}

/// Screen a newly created request for the fields both registry lookups
/// filter on. Presence means a non-empty string; no normalization.
pub fn screen(sos: &SosRequest) -> IntakeOutcome {
    if sos.district.is_empty() {
        return IntakeOutcome::Skip(SkipReason::MissingDistrict);
    }
    if sos.blood_group.is_empty() {
        return IntakeOutcome::Skip(SkipReason::MissingBloodGroup);
    }
    IntakeOutcome::Proceed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_sos(district: &str, blood_group: &str) -> SosRequest {
        SosRequest {
            district: district.to_string(),
            blood_group: blood_group.to_string(),
            note: None,
        }
    }

    #[test]
    fn test_complete_request_proceeds() {
        assert_eq!(screen(&make_sos("Colombo", "O+")), IntakeOutcome::Proceed);
    }

    #[test]
    fn test_missing_district_skips() {
        assert_eq!(
            screen(&make_sos("", "O+")),
            IntakeOutcome::Skip(SkipReason::MissingDistrict)
        );
    }

    #[test]
    fn test_missing_blood_group_skips() {
        assert_eq!(
            screen(&make_sos("Colombo", "")),
            IntakeOutcome::Skip(SkipReason::MissingBloodGroup)
        );
    }

    #[test]
    fn test_both_missing_reports_district_first() {
        assert_eq!(
            screen(&make_sos("", "")),
            IntakeOutcome::Skip(SkipReason::MissingDistrict)
        );
    }

    #[test]
    fn test_note_is_not_required() {
        let sos = SosRequest {
            district: "Kandy".to_string(),
            blood_group: "AB-".to_string(),
            note: Some("Surgery at 6pm".to_string()),
        };
        assert_eq!(screen(&sos), IntakeOutcome::Proceed);
    }
}
