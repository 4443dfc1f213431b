//! Compliance tracking core for telemetry-monitored shipment assets.
//!
//! Telemetry updates a persisted asset record through a partial-field merge,
//! and every evaluation pass decides whether the asset is in breach of its
//! configured thresholds. Persistence and transport are external
//! collaborators behind port traits; the core is pure, synchronous logic.

#![deny(unused_must_use)]

pub mod alerts;
pub mod app;
pub mod asset;
pub mod config;
pub mod rules;
pub mod telemetry;

mod error;

pub mod adapters;

pub use alerts::{AlertKind, AlertState, AlertStatus};
pub use asset::{AssetRecord, Geolocation};
pub use config::ComplianceConfig;
pub use error::{Error, Result};
pub use rules::{Evaluation, RuleEngine};
pub use telemetry::{FieldValue, TelemetryBag};
