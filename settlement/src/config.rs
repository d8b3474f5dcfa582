//! Configuration for the settlement engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tally_ledger::{AllocationConfig, ParticipantId, DEFAULT_TOLERANCE};

/// Settlement engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Split allocation configuration
    pub allocation: AllocationConfig,

    /// Netting configuration
    pub netting: NettingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "tally-settlement".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            allocation: AllocationConfig::default(),
            netting: NettingConfig::default(),
        }
    }
}

/// Netting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NettingConfig {
    /// Residual balance treated as settled
    pub tolerance: Decimal,
}

impl Default for NettingConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        Config::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `TALLY_*` overrides looked up through `lookup`
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> crate::Result<Self> {
        if let Some(tolerance) = lookup("TALLY_TOLERANCE") {
            let tolerance = Decimal::from_str(tolerance.trim()).map_err(|e| {
                crate::Error::Config(format!("TALLY_TOLERANCE {:?}: {}", tolerance, e))
            })?;
            self.allocation.tolerance = tolerance;
            self.netting.tolerance = tolerance;
        }

        if let Some(units) = lookup("TALLY_MINOR_UNITS") {
            self.allocation.minor_units = units.trim().parse().map_err(|e| {
                crate::Error::Config(format!("TALLY_MINOR_UNITS {:?}: {}", units, e))
            })?;
        }

        if let Some(self_id) = lookup("TALLY_SELF_ID") {
            let self_id = self_id.trim();
            self.allocation.self_id = (!self_id.is_empty()).then(|| ParticipantId::new(self_id));
        }

        self.validate()?;
        Ok(self)
    }

    /// Check value ranges
    pub fn validate(&self) -> crate::Result<()> {
        if self.allocation.tolerance < Decimal::ZERO || self.netting.tolerance < Decimal::ZERO {
            return Err(crate::Error::Config("Tolerance must not be negative".to_string()));
        }
        // Decimal carries at most 28 fractional digits
        if self.allocation.minor_units > 28 {
            return Err(crate::Error::Config(format!(
                "Minor units {} out of range",
                self.allocation.minor_units
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "tally-settlement");
        assert_eq!(config.netting.tolerance, Decimal::new(1, 2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[allocation]
minor_units = 0
self_id = "me"

[netting]
tolerance = "0.5"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.allocation.minor_units, 0);
        assert_eq!(config.allocation.self_id, Some(ParticipantId::new("me")));
        assert_eq!(config.allocation.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(config.netting.tolerance, Decimal::new(5, 1));
        assert_eq!(config.service_name, "tally-settlement");
    }

    #[test]
    fn test_from_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "allocation = 3").unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(crate::Error::Config(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("TALLY_TOLERANCE", "0.05"),
            ("TALLY_MINOR_UNITS", "3"),
            ("TALLY_SELF_ID", "me"),
        ]
        .into_iter()
        .collect();

        let config = Config::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.allocation.tolerance, Decimal::new(5, 2));
        assert_eq!(config.netting.tolerance, Decimal::new(5, 2));
        assert_eq!(config.allocation.minor_units, 3);
        assert_eq!(config.allocation.self_id, Some(ParticipantId::new("me")));
    }

    #[test]
    fn test_overrides_reject_bad_values() {
        let bad_tolerance = Config::default()
            .with_overrides(|key| (key == "TALLY_TOLERANCE").then(|| "-1".to_string()));
        assert!(matches!(bad_tolerance, Err(crate::Error::Config(_))));

        let bad_units = Config::default()
            .with_overrides(|key| (key == "TALLY_MINOR_UNITS").then(|| "two".to_string()));
        assert!(matches!(bad_units, Err(crate::Error::Config(_))));
    }
}
