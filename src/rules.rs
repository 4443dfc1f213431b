//! Threshold rule evaluator and evaluation pipeline.
//!
//! The rule engine runs **once per update**: validation guard first, then
//! each threshold rule in fixed declaration order, mutating a carried
//! [`AlertState`]. Rules act on independent alert kinds, so the order only
//! matters for log readability, not correctness.
//!
//! ## Per-metric policy
//!
//! - metric absent → clear the alert (no telemetry means nothing to report,
//!   and it resolves any existing breach for that metric)
//! - numeric and above threshold → raise
//! - numeric at or below threshold → clear
//! - present but non-numeric → leave the alert state entirely unchanged and
//!   log a type-mismatch warning; the pass itself never fails on this

use log::warn;

use crate::alerts::{AlertKind, AlertState, AlertStatus};
use crate::config::ComplianceConfig;
use crate::error::{Error, Result};
use crate::telemetry::{FieldValue, TelemetryBag};

/// Bag field that forces a failed evaluation pass when set to `true`.
pub const VALIDATION_FLAG: &str = "testValidation";

// ---------------------------------------------------------------------------
// Threshold rule
// ---------------------------------------------------------------------------

/// One monitored metric: a bag field, the alert kind it drives, and its
/// inclusive threshold.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdRule {
    pub metric: &'static str,
    pub kind: AlertKind,
    pub threshold: f64,
}

impl ThresholdRule {
    /// Apply this rule to the carried state.
    fn evaluate(&self, bag: &TelemetryBag, state: &mut AlertState) {
        match bag.field(self.metric) {
            FieldValue::Absent => state.clear(self.kind),
            FieldValue::Number(value) if value > self.threshold => state.raise(self.kind),
            FieldValue::Number(_) => state.clear(self.kind),
            _ => {
                warn!(
                    "RULES | {}: non-numeric value, {} left unchanged",
                    self.metric,
                    self.kind.name()
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Evaluation pipeline
// ---------------------------------------------------------------------------

/// Result of a successful evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// The new external alert status to persist.
    pub status: AlertStatus,
    /// Compliance verdict: true iff any alert kind is active.
    pub non_compliant: bool,
}

/// The fixed-order rule set, built from configuration.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: [ThresholdRule; AlertKind::COUNT],
}

impl RuleEngine {
    pub fn new(config: &ComplianceConfig) -> Self {
        Self {
            rules: [
                ThresholdRule {
                    metric: "maxTemperature",
                    kind: AlertKind::OverTemp,
                    threshold: config.max_temperature_threshold,
                },
                ThresholdRule {
                    metric: "maxHumidity",
                    kind: AlertKind::OverHum,
                    threshold: config.max_humidity_threshold,
                },
            ],
        }
    }

    /// Run one full evaluation cycle over `bag`, carrying forward
    /// `prior_status`.
    ///
    /// A failed validation pass returns [`Error::ValidationFailed`] before
    /// any new status is produced: all transitions happen on a scratch
    /// state, so the caller's persisted status is untouched and the asset
    /// must be treated as non-compliant for this pass.
    pub fn evaluate(&self, bag: &TelemetryBag, prior_status: &AlertStatus) -> Result<Evaluation> {
        let mut state = AlertState::from_status(prior_status)?;
        state.begin_cycle();

        validation_rule(bag)?;

        for rule in &self.rules {
            rule.evaluate(bag, &mut state);
        }

        let compliant = state.no_alerts_active();
        Ok(Evaluation {
            status: state.to_status(),
            non_compliant: !compliant,
        })
    }
}

/// Pass/fail guard, independent of thresholds, run before them.
///
/// `testValidation: true` forces an out-of-compliance outcome
/// deterministically; absent, `false`, or non-boolean is a no-op.
fn validation_rule(bag: &TelemetryBag) -> Result<()> {
    if bag.flag_is_set(VALIDATION_FLAG) {
        return Err(Error::ValidationFailed);
    }
    Ok(())
}
