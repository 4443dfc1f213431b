//! Compliance service — the hexagonal core.
//!
//! [`ComplianceService`] owns the rule engine and exposes the operations the
//! surrounding CRUD/dispatch shell calls. All I/O flows through port traits
//! injected at call sites, making the entire service testable with mock
//! adapters.
//!
//! ```text
//!  LedgerPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                 │     ComplianceService       │
//!   update bag ──▶│  merge · rules · aggregate  │
//!                 └────────────────────────────┘
//! ```
//!
//! The service is synchronous and holds no state between invocations beyond
//! the config-derived rule table: every call is one complete operation.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::alerts::{AlertKind, AlertStatus};
use crate::asset::AssetRecord;
use crate::config::ComplianceConfig;
use crate::error::{Error, Result};
use crate::rules::{Evaluation, RuleEngine};
use crate::telemetry::TelemetryBag;

use super::events::ComplianceEvent;
use super::ports::{EventSink, LedgerError, LedgerPort};

/// Ledger key under which the contract state record lives.
pub const CONTRACT_STATE_KEY: &str = "ContractStateKey";

/// Version the deployer's init argument must match.
pub const CONTRACT_VERSION: &str = "1.0";

/// Ledger key under which the trade state record lives.
pub const TRADE_STATE_KEY: &str = "TradeStateKey";

/// Trade id the deployer's init argument must match.
pub const TRADE_ID: &str = "0476219";

/// Deployment-level record stored once at init.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractState {
    pub version: String,
    pub status: bool,
}

/// The trade this deployment tracks, stored once at init.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeState {
    #[serde(rename = "tradeID")]
    pub trade_id: String,
}

// ───────────────────────────────────────────────────────────────
// ComplianceService
// ───────────────────────────────────────────────────────────────

/// Orchestrates merge, rule evaluation, and compliance aggregation.
pub struct ComplianceService {
    engine: RuleEngine,
}

impl ComplianceService {
    /// Construct the service. Rejects an invalid configuration up front so
    /// a bad threshold can never reach the rule engine.
    pub fn new(config: &ComplianceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: RuleEngine::new(config),
        })
    }

    // ── Deployment ────────────────────────────────────────────

    /// Initialise the deployment: persist the contract state under
    /// [`CONTRACT_STATE_KEY`] and the trade state under
    /// [`TRADE_STATE_KEY`].
    ///
    /// The supplied version and trade id must match [`CONTRACT_VERSION`]
    /// and [`TRADE_ID`] exactly, and an already-initialised deployment is
    /// refused.
    pub fn init(
        &self,
        ledger: &mut impl LedgerPort,
        version: &str,
        trade_id: &str,
    ) -> Result<()> {
        if version != CONTRACT_VERSION {
            return Err(Error::Config("contract version mismatch"));
        }
        if trade_id != TRADE_ID {
            return Err(Error::Config("trade id mismatch"));
        }
        if ledger.exists(CONTRACT_STATE_KEY) {
            return Err(Error::Config("deployment already initialised"));
        }
        let contract = ContractState {
            version: version.to_string(),
            status: false,
        };
        let bytes = serialize(&contract)?;
        ledger.put(CONTRACT_STATE_KEY, &bytes)?;

        let trade = TradeState {
            trade_id: trade_id.to_string(),
        };
        let bytes = serialize(&trade)?;
        ledger.put(TRADE_STATE_KEY, &bytes)?;
        Ok(())
    }

    /// Read back the contract state record written by [`init`](Self::init).
    pub fn read_contract_state(&self, ledger: &impl LedgerPort) -> Result<Vec<u8>> {
        let bytes = ledger
            .get(CONTRACT_STATE_KEY)?
            .ok_or(Error::DeploymentStateMissing("contract state"))?;
        let _: ContractState = serde_json::from_slice(&bytes)
            .map_err(|_| Error::StoreUnavailable(LedgerError::Corrupted))?;
        Ok(bytes)
    }

    /// Read back the trade state record written by [`init`](Self::init).
    pub fn read_trade_state(&self, ledger: &impl LedgerPort) -> Result<Vec<u8>> {
        let bytes = ledger
            .get(TRADE_STATE_KEY)?
            .ok_or(Error::DeploymentStateMissing("trade state"))?;
        let _: TradeState = serde_json::from_slice(&bytes)
            .map_err(|_| Error::StoreUnavailable(LedgerError::Corrupted))?;
        Ok(bytes)
    }

    // ── Asset CRUD ────────────────────────────────────────────

    /// Create or update an asset from one sparse update bag.
    ///
    /// Validates the primary key, merges the update onto the stored record
    /// (field-granular, present-fields-only), writes the result, and returns
    /// the stored bytes. Either the full merged record is written or nothing
    /// is.
    pub fn create_or_update(
        &self,
        ledger: &mut impl LedgerPort,
        sink: &mut impl EventSink,
        bag: &TelemetryBag,
    ) -> Result<Vec<u8>> {
        let mut incoming: AssetRecord = serde_json::from_value(bag.as_value())
            .map_err(|_| Error::MalformedPayload("payload does not match the asset record schema"))?;
        let asset_id = incoming.validated_id()?;
        incoming.asset_id = Some(asset_id.clone());

        let stored = match ledger.get(&asset_id)? {
            Some(bytes) => Some(
                serde_json::from_slice::<AssetRecord>(&bytes)
                    .map_err(|_| Error::StoreUnavailable(LedgerError::Corrupted))?,
            ),
            None => None,
        };
        let created = stored.is_none();

        let merged = AssetRecord::merge(stored, incoming);
        let bytes = serialize(&merged)?;
        ledger.put(&asset_id, &bytes)?;

        sink.emit(&ComplianceEvent::AssetStored { asset_id, created });
        Ok(bytes)
    }

    /// Read the stored record for `asset_id`.
    pub fn read_asset(&self, ledger: &impl LedgerPort, asset_id: &str) -> Result<Vec<u8>> {
        let key = validated_key(asset_id)?;
        let bytes = ledger.get(key)?.ok_or(Error::AssetNotFound)?;
        let _: AssetRecord = serde_json::from_slice(&bytes)
            .map_err(|_| Error::StoreUnavailable(LedgerError::Corrupted))?;
        Ok(bytes)
    }

    /// Remove the record for `asset_id`. Unconditional: deletion never
    /// consults alert state.
    pub fn delete_asset(
        &self,
        ledger: &mut impl LedgerPort,
        sink: &mut impl EventSink,
        asset_id: &str,
    ) -> Result<()> {
        let key = validated_key(asset_id)?;
        ledger.delete(key)?;
        sink.emit(&ComplianceEvent::AssetDeleted {
            asset_id: key.to_string(),
        });
        Ok(())
    }

    // ── Alert evaluation ──────────────────────────────────────

    /// Run one evaluation pass over `bag`, carrying forward
    /// `current_status`.
    ///
    /// A failed validation pass returns [`Error::ValidationFailed`] with the
    /// prior status untouched; the caller must treat the asset as
    /// non-compliant for that pass.
    pub fn evaluate_alerts(
        &self,
        sink: &mut impl EventSink,
        current_status: &AlertStatus,
        bag: &TelemetryBag,
    ) -> Result<Evaluation> {
        let evaluation = match self.engine.evaluate(bag, current_status) {
            Ok(evaluation) => evaluation,
            Err(Error::ValidationFailed) => {
                warn!("EVAL | validation rule fired, pass aborted");
                sink.emit(&ComplianceEvent::ValidationFailed);
                return Err(Error::ValidationFailed);
            }
            Err(e) => return Err(e),
        };

        for name in &evaluation.status.raised {
            if let Ok(kind) = AlertKind::from_name(name) {
                sink.emit(&ComplianceEvent::AlertRaised(kind));
            }
        }
        for name in &evaluation.status.cleared {
            if let Ok(kind) = AlertKind::from_name(name) {
                sink.emit(&ComplianceEvent::AlertCleared(kind));
            }
        }
        sink.emit(&ComplianceEvent::Evaluated {
            non_compliant: evaluation.non_compliant,
        });
        Ok(evaluation)
    }
}

// ───────────────────────────────────────────────────────────────
// Internal
// ───────────────────────────────────────────────────────────────

/// Key validation shared by the id-keyed operations: trimmed, non-blank.
fn validated_key(asset_id: &str) -> Result<&str> {
    let key = asset_id.trim();
    if key.is_empty() {
        return Err(Error::MissingPrimaryKey);
    }
    Ok(key)
}

/// JSON-encode a record destined for the ledger. Only reachable failure is a
/// non-finite float smuggled into a record, which JSON cannot carry.
fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|_| Error::MalformedPayload("non-serializable record value"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryLedger;

    /// Test sink that records every emitted event.
    #[derive(Default)]
    struct Recorder(Vec<ComplianceEvent>);

    impl EventSink for Recorder {
        fn emit(&mut self, event: &ComplianceEvent) {
            self.0.push(event.clone());
        }
    }

    /// Ledger whose every operation fails, for abort-path coverage.
    struct DownLedger;

    impl LedgerPort for DownLedger {
        fn get(&self, _key: &str) -> core::result::Result<Option<Vec<u8>>, LedgerError> {
            Err(LedgerError::Unavailable)
        }
        fn put(&mut self, _key: &str, _value: &[u8]) -> core::result::Result<(), LedgerError> {
            Err(LedgerError::Unavailable)
        }
        fn delete(&mut self, _key: &str) -> core::result::Result<(), LedgerError> {
            Err(LedgerError::Unavailable)
        }
        fn exists(&self, _key: &str) -> bool {
            false
        }
    }

    fn service() -> ComplianceService {
        ComplianceService::new(&ComplianceConfig::default()).unwrap()
    }

    fn bag(json: &str) -> TelemetryBag {
        TelemetryBag::from_slice(json.as_bytes()).unwrap()
    }

    #[test]
    fn create_then_read_returns_exactly_the_supplied_fields() {
        let svc = service();
        let mut ledger = MemoryLedger::new();
        let mut sink = Recorder::default();

        let stored = svc
            .create_or_update(
                &mut ledger,
                &mut sink,
                &bag(r#"{"assetID": "CARGO1", "carrier": "Maersk"}"#),
            )
            .unwrap();

        let read = svc.read_asset(&ledger, "CARGO1").unwrap();
        assert_eq!(stored, read);

        let record: AssetRecord = serde_json::from_slice(&read).unwrap();
        assert_eq!(record.asset_id.as_deref(), Some("CARGO1"));
        assert_eq!(record.carrier.as_deref(), Some("Maersk"));
        assert!(record.location.is_none());
        assert!(record.max_temperature.is_none());
        assert!(record.max_humidity.is_none());
    }

    #[test]
    fn update_merges_onto_stored_record() {
        let svc = service();
        let mut ledger = MemoryLedger::new();
        let mut sink = Recorder::default();

        svc.create_or_update(
            &mut ledger,
            &mut sink,
            &bag(r#"{"assetID": "CARGO1", "carrier": "Maersk", "maxTemperature": 20.0}"#),
        )
        .unwrap();
        svc.create_or_update(
            &mut ledger,
            &mut sink,
            &bag(r#"{"assetID": "CARGO1", "maxTemperature": 61.0}"#),
        )
        .unwrap();

        let record: AssetRecord =
            serde_json::from_slice(&svc.read_asset(&ledger, "CARGO1").unwrap()).unwrap();
        assert_eq!(record.carrier.as_deref(), Some("Maersk"));
        assert_eq!(record.max_temperature, Some(61.0));

        assert_eq!(
            sink.0,
            vec![
                ComplianceEvent::AssetStored {
                    asset_id: "CARGO1".into(),
                    created: true
                },
                ComplianceEvent::AssetStored {
                    asset_id: "CARGO1".into(),
                    created: false
                },
            ]
        );
    }

    #[test]
    fn same_update_twice_is_idempotent() {
        let svc = service();
        let mut ledger = MemoryLedger::new();
        let mut sink = Recorder::default();
        let update = bag(r#"{"assetID": "CARGO1", "maxHumidity": 44.0}"#);

        let once = svc.create_or_update(&mut ledger, &mut sink, &update).unwrap();
        let twice = svc.create_or_update(&mut ledger, &mut sink, &update).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn asset_id_is_trimmed_before_lookup() {
        let svc = service();
        let mut ledger = MemoryLedger::new();
        let mut sink = Recorder::default();

        svc.create_or_update(&mut ledger, &mut sink, &bag(r#"{"assetID": "  CARGO1 "}"#))
            .unwrap();
        assert!(svc.read_asset(&ledger, "CARGO1").is_ok());
    }

    #[test]
    fn missing_key_fails_before_any_store_access() {
        let svc = service();
        // DownLedger would fail any access — proving the key check comes
        // first.
        let mut ledger = DownLedger;
        let mut sink = Recorder::default();

        assert_eq!(
            svc.create_or_update(&mut ledger, &mut sink, &bag(r#"{"carrier": "Maersk"}"#)),
            Err(Error::MissingPrimaryKey)
        );
        assert_eq!(svc.read_asset(&ledger, "   "), Err(Error::MissingPrimaryKey));
        assert_eq!(
            svc.delete_asset(&mut ledger, &mut sink, ""),
            Err(Error::MissingPrimaryKey)
        );
        assert!(sink.0.is_empty());
    }

    #[test]
    fn store_failure_aborts_with_no_partial_write() {
        let svc = service();
        let mut ledger = DownLedger;
        let mut sink = Recorder::default();

        let err = svc
            .create_or_update(&mut ledger, &mut sink, &bag(r#"{"assetID": "CARGO1"}"#))
            .unwrap_err();
        assert_eq!(err, Error::StoreUnavailable(LedgerError::Unavailable));
        assert!(sink.0.is_empty(), "no stored event on a failed write");
    }

    #[test]
    fn corrupted_stored_record_surfaces_as_store_unavailable() {
        let svc = service();
        let mut ledger = MemoryLedger::new();
        let mut sink = Recorder::default();
        ledger.put("CARGO1", b"{ not json").unwrap();

        assert_eq!(
            svc.create_or_update(&mut ledger, &mut sink, &bag(r#"{"assetID": "CARGO1"}"#)),
            Err(Error::StoreUnavailable(LedgerError::Corrupted))
        );
        assert_eq!(
            svc.read_asset(&ledger, "CARGO1"),
            Err(Error::StoreUnavailable(LedgerError::Corrupted))
        );
    }

    #[test]
    fn delete_is_unconditional() {
        let svc = service();
        let mut ledger = MemoryLedger::new();
        let mut sink = Recorder::default();

        // Record whose telemetry has an active alert — deletion must not
        // care.
        svc.create_or_update(
            &mut ledger,
            &mut sink,
            &bag(r#"{"assetID": "CARGO1", "maxTemperature": 99.0}"#),
        )
        .unwrap();
        svc.delete_asset(&mut ledger, &mut sink, "CARGO1").unwrap();
        assert_eq!(svc.read_asset(&ledger, "CARGO1"), Err(Error::AssetNotFound));

        // Deleting a non-existent key still succeeds.
        svc.delete_asset(&mut ledger, &mut sink, "CARGO2").unwrap();
    }

    #[test]
    fn evaluate_emits_raise_clear_and_verdict_events() {
        let svc = service();
        let mut sink = Recorder::default();

        let first = svc
            .evaluate_alerts(
                &mut sink,
                &AlertStatus::default(),
                &bag(r#"{"maxTemperature": 75}"#),
            )
            .unwrap();
        assert!(first.non_compliant);
        assert_eq!(
            sink.0,
            vec![
                ComplianceEvent::AlertRaised(AlertKind::OverTemp),
                ComplianceEvent::Evaluated {
                    non_compliant: true
                },
            ]
        );

        sink.0.clear();
        let second = svc
            .evaluate_alerts(&mut sink, &first.status, &bag(r#"{"maxTemperature": 50}"#))
            .unwrap();
        assert!(!second.non_compliant);
        assert_eq!(
            sink.0,
            vec![
                ComplianceEvent::AlertCleared(AlertKind::OverTemp),
                ComplianceEvent::Evaluated {
                    non_compliant: false
                },
            ]
        );
    }

    #[test]
    fn validation_failure_leaves_prior_status_untouched() {
        let svc = service();
        let mut sink = Recorder::default();
        let prior = AlertStatus {
            active: vec!["OVERHUM".into()],
            ..Default::default()
        };

        // The pinned policy: a failed pass produces no new status at all, so
        // whatever the caller had persisted stays persisted.
        let err = svc
            .evaluate_alerts(
                &mut sink,
                &prior,
                &bag(r#"{"testValidation": true, "maxHumidity": 1}"#),
            )
            .unwrap_err();
        assert_eq!(err, Error::ValidationFailed);
        assert_eq!(prior.active, vec!["OVERHUM"]);
        assert_eq!(sink.0, vec![ComplianceEvent::ValidationFailed]);
    }

    #[test]
    fn init_checks_version_and_persists_contract_state() {
        let svc = service();
        let mut ledger = MemoryLedger::new();

        assert_eq!(
            svc.init(&mut ledger, "0.9", TRADE_ID),
            Err(Error::Config("contract version mismatch"))
        );
        assert!(!ledger.exists(CONTRACT_STATE_KEY));

        svc.init(&mut ledger, CONTRACT_VERSION, TRADE_ID).unwrap();
        let bytes = svc.read_contract_state(&ledger).unwrap();
        let state: ContractState = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(state.version, CONTRACT_VERSION);
        assert!(!state.status);
    }

    #[test]
    fn init_checks_trade_id_and_persists_trade_state() {
        let svc = service();
        let mut ledger = MemoryLedger::new();

        assert_eq!(
            svc.init(&mut ledger, CONTRACT_VERSION, "9999999"),
            Err(Error::Config("trade id mismatch"))
        );
        assert!(!ledger.exists(TRADE_STATE_KEY));

        svc.init(&mut ledger, CONTRACT_VERSION, TRADE_ID).unwrap();
        let bytes = svc.read_trade_state(&ledger).unwrap();
        let state: TradeState = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(state.trade_id, TRADE_ID);

        // External name on the wire.
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["tradeID"], TRADE_ID);
    }

    #[test]
    fn init_refuses_an_already_initialised_deployment() {
        let svc = service();
        let mut ledger = MemoryLedger::new();

        svc.init(&mut ledger, CONTRACT_VERSION, TRADE_ID).unwrap();
        assert_eq!(
            svc.init(&mut ledger, CONTRACT_VERSION, TRADE_ID),
            Err(Error::Config("deployment already initialised"))
        );
    }

    #[test]
    fn missing_deployment_records_have_dedicated_errors() {
        let svc = service();
        let ledger = MemoryLedger::new();

        assert_eq!(
            svc.read_contract_state(&ledger),
            Err(Error::DeploymentStateMissing("contract state"))
        );
        assert_eq!(
            svc.read_trade_state(&ledger),
            Err(Error::DeploymentStateMissing("trade state"))
        );
    }

    #[test]
    fn rejects_invalid_config_at_construction() {
        let config = ComplianceConfig {
            max_humidity_threshold: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            ComplianceService::new(&config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn mistyped_record_field_fails_the_update() {
        let svc = service();
        let mut ledger = MemoryLedger::new();
        let mut sink = Recorder::default();

        assert!(matches!(
            svc.create_or_update(
                &mut ledger,
                &mut sink,
                &bag(r#"{"assetID": "CARGO1", "maxTemperature": "warm"}"#),
            ),
            Err(Error::MalformedPayload(_))
        ));
        assert!(!ledger.exists("CARGO1"));
    }
}
