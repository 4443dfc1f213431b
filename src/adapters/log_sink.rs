//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured compliance events to the
//! log facade. A message-bus or webhook adapter would implement the same
//! trait.

use log::info;

use crate::app::events::ComplianceEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ComplianceEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ComplianceEvent) {
        match event {
            ComplianceEvent::AssetStored { asset_id, created } => {
                info!(
                    "ASSET | {} {asset_id}",
                    if *created { "created" } else { "updated" }
                );
            }
            ComplianceEvent::AssetDeleted { asset_id } => {
                info!("ASSET | deleted {asset_id}");
            }
            ComplianceEvent::AlertRaised(kind) => {
                info!("ALERT | raised {kind}");
            }
            ComplianceEvent::AlertCleared(kind) => {
                info!("ALERT | cleared {kind}");
            }
            ComplianceEvent::ValidationFailed => {
                info!("EVAL  | validation failed, asset non-compliant");
            }
            ComplianceEvent::Evaluated { non_compliant } => {
                info!(
                    "EVAL  | {}",
                    if *non_compliant {
                        "NON-COMPLIANT"
                    } else {
                        "compliant"
                    }
                );
            }
        }
    }
}
