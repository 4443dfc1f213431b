//! Outbound application events.
//!
//! The [`ComplianceService`](super::service::ComplianceService) emits these
//! through the [`EventSink`](super::ports::EventSink) port. Adapters on the
//! other side decide what to do with them.

use crate::alerts::AlertKind;

/// Structured events emitted by the compliance core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplianceEvent {
    /// An asset record was written to the ledger.
    AssetStored { asset_id: String, created: bool },

    /// An asset record was removed from the ledger.
    AssetDeleted { asset_id: String },

    /// An alert kind transitioned into breach this cycle.
    AlertRaised(AlertKind),

    /// An alert kind transitioned out of breach this cycle.
    AlertCleared(AlertKind),

    /// The validation guard fired; the pass was aborted.
    ValidationFailed,

    /// An evaluation pass completed (carries the verdict).
    Evaluated { non_compliant: bool },
}
