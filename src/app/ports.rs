//! Port traits — the boundary between the compliance core and the outside
//! world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ComplianceService (domain)
//! ```
//!
//! Driven adapters (the key-value ledger, event sinks) implement these
//! traits. The [`ComplianceService`](super::service::ComplianceService)
//! consumes them via generics at call sites, so the core never touches a
//! storage engine or transport directly.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Ledger port (driven adapter: domain ↔ key-value store)
// ───────────────────────────────────────────────────────────────

/// The external key-value ledger capability.
///
/// Ordering of concurrent updates to the same key is the store's problem:
/// each core invocation sees one complete, already-serialized operation.
/// Writes MUST be atomic — the core never issues a partial write.
pub trait LedgerPort {
    /// Read the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write `value` under `key` atomically.
    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Delete `key`. Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, key: &str) -> Result<(), LedgerError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured
/// [`ComplianceEvent`](super::events::ComplianceEvent)s through this port.
/// Adapters decide where they go (log, message bus, test recorder, ...).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ComplianceEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`LedgerPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// The store rejected or could not complete the operation.
    Unavailable,
    /// Stored data failed integrity / deserialization checks.
    Corrupted,
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "ledger unavailable"),
            Self::Corrupted => write!(f, "stored data corrupted"),
        }
    }
}
