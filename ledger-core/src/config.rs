//! Configuration for split allocation and the balance ledger

use crate::types::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Residual imbalance treated as rounding noise (0.01)
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Decimal places of the smallest currency unit
pub const DEFAULT_MINOR_UNITS: u32 = 2;

/// Allocation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Decimal places of the smallest currency unit (2 = cents/paise)
    pub minor_units: u32,

    /// Manual split tolerance
    pub tolerance: Decimal,

    /// Participant whose own share is always pre-settled
    pub self_id: Option<ParticipantId>,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            minor_units: DEFAULT_MINOR_UNITS,
            tolerance: DEFAULT_TOLERANCE,
            self_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AllocationConfig::default();
        assert_eq!(config.tolerance, Decimal::new(1, 2));
        assert_eq!(config.minor_units, 2);
        assert!(config.self_id.is_none());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AllocationConfig = serde_json::from_str(r#"{"self_id": "me"}"#).unwrap();
        assert_eq!(config.self_id, Some("me".into()));
        assert_eq!(config.minor_units, DEFAULT_MINOR_UNITS);
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
    }
}
