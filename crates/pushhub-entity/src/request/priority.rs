//! Push request priority levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of a push request.
///
/// Priority orders worker processing; it has no effect on distribution
/// correctness.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PushRequestPriority {
    /// Low priority — background events.
    Low,
    /// Normal priority — standard events (default).
    #[default]
    Normal,
    /// High priority — important events.
    High,
    /// Urgent priority — requires immediate attention.
    Urgent,
    /// Critical priority — system-level alerts.
    Critical,
}

impl PushRequestPriority {
    /// Return the numeric priority (higher = more urgent).
    pub fn numeric_priority(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Normal => 2,
            Self::High => 3,
            Self::Urgent => 4,
            Self::Critical => 5,
        }
    }

    /// Return the priority as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for PushRequestPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(PushRequestPriority::Low < PushRequestPriority::Normal);
        assert!(PushRequestPriority::Normal < PushRequestPriority::High);
        assert!(PushRequestPriority::High < PushRequestPriority::Urgent);
        assert!(PushRequestPriority::Urgent < PushRequestPriority::Critical);
    }

    #[test]
    fn test_default_is_normal() {
        assert_eq!(PushRequestPriority::default(), PushRequestPriority::Normal);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&PushRequestPriority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
