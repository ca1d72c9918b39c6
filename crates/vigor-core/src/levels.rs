//! Ordered categorical levels shared by the streak and wellness engines.

use serde::{Deserialize, Serialize};

/// Four-step risk scale used for streak breakage and burnout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    /// 0 for low up to 3 for critical.
    pub fn rank(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Moderate => 1,
            RiskLevel::High => 2,
            RiskLevel::Critical => 3,
        }
    }

    pub fn is_elevated(&self) -> bool {
        *self >= RiskLevel::High
    }
}

/// How quickly a notification or intervention needs attention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl From<RiskLevel> for Urgency {
    fn from(risk: RiskLevel) -> Self {
        match risk {
            RiskLevel::Low => Urgency::Low,
            RiskLevel::Moderate => Urgency::Medium,
            RiskLevel::High => Urgency::High,
            RiskLevel::Critical => Urgency::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_matches_rank() {
        assert!(RiskLevel::Low < RiskLevel::Moderate);
        assert!(RiskLevel::High < RiskLevel::Critical);
        assert_eq!(RiskLevel::Critical.rank(), 3);
        assert!(RiskLevel::High.is_elevated());
        assert!(!RiskLevel::Moderate.is_elevated());
    }

    #[test]
    fn test_urgency_mirrors_risk() {
        assert_eq!(Urgency::from(RiskLevel::Moderate), Urgency::Medium);
        assert_eq!(Urgency::from(RiskLevel::Critical), Urgency::Critical);
    }
}
