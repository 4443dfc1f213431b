//! Unified error types for the compliance core.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! dispatch shell's error handling uniform. All fatal kinds abort the current
//! operation and surface to the immediate caller — there are no internal
//! retries (retry, if any, belongs to the ledger collaborator).
//!
//! Type mismatches in telemetry values are deliberately *not* represented
//! here: they are absorbed inside the threshold rules as logged warnings and
//! never fail an evaluation pass.

use core::fmt;

use crate::app::ports::LedgerError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the compliance core funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input payload lacks a usable, non-blank asset identifier.
    /// Raised before any ledger access.
    MissingPrimaryKey,
    /// An alert-status payload names a kind outside the enumeration.
    UnknownAlertKind(String),
    /// The validation rule's guard fired; the caller must treat the asset
    /// as non-compliant for this pass.
    ValidationFailed,
    /// The requested asset has no record in the ledger.
    AssetNotFound,
    /// The input payload could not be parsed.
    MalformedPayload(&'static str),
    /// The underlying ledger failed, or returned data that does not
    /// deserialize to a record. The operation aborts with no partial write.
    StoreUnavailable(LedgerError),
    /// A deployment record (contract or trade state) is missing from the
    /// ledger; the payload names which one.
    DeploymentStateMissing(&'static str),
    /// Configuration is invalid, or a contract version mismatch at init.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPrimaryKey => write!(f, "asset id is mandatory and must be non-blank"),
            Self::UnknownAlertKind(name) => write!(f, "unknown alert kind: {name}"),
            Self::ValidationFailed => write!(f, "validation rule failed"),
            Self::AssetNotFound => write!(f, "asset not found in ledger"),
            Self::MalformedPayload(msg) => write!(f, "malformed payload: {msg}"),
            Self::StoreUnavailable(e) => write!(f, "store unavailable: {e}"),
            Self::DeploymentStateMissing(which) => {
                write!(f, "unable to get {which} from ledger")
            }
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<LedgerError> for Error {
    fn from(e: LedgerError) -> Self {
        Self::StoreUnavailable(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
