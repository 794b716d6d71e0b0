use serde::{Deserialize, Serialize};

/// Attendance status for a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    Achieved,
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
    Impossible,
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceStatus::Achieved => write!(f, "Achieved"),
            ComplianceStatus::OnTrack => write!(f, "On Track"),
            ComplianceStatus::AtRisk => write!(f, "At Risk"),
            ComplianceStatus::Impossible => write!(f, "Impossible"),
        }
    }
}

/// Classify a period from its counters. First matching rule wins:
///
/// 1. badged in at least the required days: `Achieved`
/// 2. nothing badged and pace not yet measurable: `OnTrack`
/// 3. more days still needed than days left: `Impossible`
/// 4. behind pace: `AtRisk`
/// 5. otherwise `OnTrack`
///
/// `Impossible` is checked before `AtRisk` so an unreachable goal is never
/// reported as merely at risk.
pub fn classify(
    days_badged_in: i32,
    days_required: i32,
    days_ahead_of_pace: i32,
    days_still_needed: i32,
    days_left: i32,
) -> ComplianceStatus {
    if days_badged_in >= days_required {
        return ComplianceStatus::Achieved;
    }
    if days_ahead_of_pace == 0 && days_badged_in == 0 {
        return ComplianceStatus::OnTrack;
    }
    if days_still_needed > days_left {
        return ComplianceStatus::Impossible;
    }
    if days_ahead_of_pace < 0 {
        return ComplianceStatus::AtRisk;
    }
    ComplianceStatus::OnTrack
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_achieved_wins_over_everything() {
        assert_eq!(classify(32, 32, -5, 0, 0), ComplianceStatus::Achieved);
        assert_eq!(classify(40, 32, 3, 0, 10), ComplianceStatus::Achieved);
    }

    #[test]
    fn test_not_started_is_on_track() {
        assert_eq!(classify(0, 32, 0, 32, 63), ComplianceStatus::OnTrack);
        // Rule 2 fires before rule 3 even when the goal is already out of reach
        assert_eq!(classify(0, 32, 0, 32, 10), ComplianceStatus::OnTrack);
    }

    #[test]
    fn test_impossible_before_at_risk() {
        assert_eq!(classify(1, 32, -10, 31, 20), ComplianceStatus::Impossible);
        assert_eq!(classify(1, 32, 2, 31, 20), ComplianceStatus::Impossible);
    }

    #[test]
    fn test_behind_pace_is_at_risk() {
        assert_eq!(classify(1, 32, -3, 31, 50), ComplianceStatus::AtRisk);
    }

    #[test]
    fn test_on_pace_is_on_track() {
        assert_eq!(classify(5, 32, 0, 27, 50), ComplianceStatus::OnTrack);
        assert_eq!(classify(5, 32, 2, 27, 50), ComplianceStatus::OnTrack);
    }

    #[test]
    fn test_display() {
        assert_eq!(ComplianceStatus::OnTrack.to_string(), "On Track");
        assert_eq!(ComplianceStatus::AtRisk.to_string(), "At Risk");
        assert_eq!(ComplianceStatus::Impossible.to_string(), "Impossible");
        assert_eq!(ComplianceStatus::Achieved.to_string(), "Achieved");
    }
}
