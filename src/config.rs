//! Compliance configuration.
//!
//! Threshold values for the monitored metrics. Values are inclusive: a
//! reading at or below the threshold is compliant, strictly above is a
//! breach. Invalid ranges are rejected with a typed error, never silently
//! clamped.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunable thresholds for the rule engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceConfig {
    /// Maximum allowed temperature before an OVERTEMP breach.
    pub max_temperature_threshold: f64,
    /// Maximum allowed relative humidity (%) before an OVERHUM breach.
    pub max_humidity_threshold: f64,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            max_temperature_threshold: 60.0,
            max_humidity_threshold: 80.0,
        }
    }
}

impl ComplianceConfig {
    /// Range-check every field. Called at service construction so a bad
    /// config can never reach the rule engine.
    pub fn validate(&self) -> Result<()> {
        if !self.max_temperature_threshold.is_finite() {
            return Err(Error::Config("max_temperature_threshold must be finite"));
        }
        if !(0.0..=100.0).contains(&self.max_humidity_threshold) {
            return Err(Error::Config("max_humidity_threshold must be 0–100"));
        }
        Ok(())
    }
}
