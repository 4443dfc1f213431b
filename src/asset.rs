//! Persisted asset record and the partial-field merge.
//!
//! Every attribute except the primary key is optional, and "absent" is a
//! first-class state distinct from any default value: absent fields are
//! skipped on serialization and survive merges untouched.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Latitude/longitude pair. Treated as a single field by the merge — a
/// sparse update supplying `location` replaces the whole value, never one
/// coordinate of a stored pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// The persisted entity, keyed by `assetID`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Primary key. Mandatory on every operation, immutable once created.
    #[serde(rename = "assetID", skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    /// Current asset location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Geolocation>,
    /// Peak temperature reported for the asset.
    #[serde(rename = "maxTemperature", skip_serializing_if = "Option::is_none")]
    pub max_temperature: Option<f64>,
    /// Peak relative humidity (%) reported for the asset.
    #[serde(rename = "maxHumidity", skip_serializing_if = "Option::is_none")]
    pub max_humidity: Option<f64>,
    /// Transport entity currently in possession of the asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
}

impl AssetRecord {
    /// Extract the primary key: trimmed of surrounding whitespace, required
    /// non-blank. Fails with [`Error::MissingPrimaryKey`] before any ledger
    /// access.
    pub fn validated_id(&self) -> Result<String> {
        let id = self
            .asset_id
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if id.is_empty() {
            return Err(Error::MissingPrimaryKey);
        }
        Ok(id.to_string())
    }

    /// Apply a sparse `incoming` update onto a previously `stored` record.
    ///
    /// No stored record means a create: the incoming update is the result
    /// as-is. Otherwise every attribute *present* in the update overwrites
    /// the stored value, and absent attributes retain the stored value. The
    /// primary key is never altered (it was already validated to match the
    /// lookup key before merge runs).
    pub fn merge(stored: Option<AssetRecord>, incoming: AssetRecord) -> AssetRecord {
        let Some(mut merged) = stored else {
            return incoming;
        };
        if incoming.location.is_some() {
            merged.location = incoming.location;
        }
        if incoming.max_temperature.is_some() {
            merged.max_temperature = incoming.max_temperature;
        }
        if incoming.max_humidity.is_some() {
            merged.max_humidity = incoming.max_humidity;
        }
        if incoming.carrier.is_some() {
            merged.carrier = incoming.carrier;
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> AssetRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn id_is_trimmed() {
        let r = record(r#"{"assetID": "  CARGO1  "}"#);
        assert_eq!(r.validated_id().unwrap(), "CARGO1");
    }

    #[test]
    fn blank_or_missing_id_is_rejected() {
        assert_eq!(record("{}").validated_id(), Err(Error::MissingPrimaryKey));
        assert_eq!(
            record(r#"{"assetID": "   "}"#).validated_id(),
            Err(Error::MissingPrimaryKey)
        );
    }

    #[test]
    fn merge_without_stored_record_is_a_create() {
        let incoming = record(r#"{"assetID": "C1", "carrier": "Maersk"}"#);
        let merged = AssetRecord::merge(None, incoming.clone());
        assert_eq!(merged, incoming);
        assert!(merged.location.is_none());
        assert!(merged.max_temperature.is_none());
    }

    #[test]
    fn present_fields_overwrite_absent_fields_retain() {
        let stored = record(r#"{"assetID": "C1", "carrier": "Maersk", "maxTemperature": 20.0}"#);
        let update = record(r#"{"assetID": "C1", "maxTemperature": 55.5}"#);
        let merged = AssetRecord::merge(Some(stored), update);
        assert_eq!(merged.carrier.as_deref(), Some("Maersk"));
        assert_eq!(merged.max_temperature, Some(55.5));
    }

    #[test]
    fn location_is_replaced_whole() {
        let stored = record(
            r#"{"assetID": "C1", "location": {"latitude": 10.0, "longitude": 20.0}}"#,
        );
        let update = record(r#"{"assetID": "C1", "location": {"latitude": 11.0}}"#);
        let merged = AssetRecord::merge(Some(stored), update);
        let loc = merged.location.unwrap();
        assert_eq!(loc.latitude, Some(11.0));
        assert_eq!(loc.longitude, None, "longitude must not leak from the stored pair");
    }

    #[test]
    fn merge_is_idempotent() {
        let stored = record(r#"{"assetID": "C1", "maxHumidity": 40.0}"#);
        let update = record(r#"{"assetID": "C1", "carrier": "MSC"}"#);
        let once = AssetRecord::merge(Some(stored), update.clone());
        let twice = AssetRecord::merge(Some(once.clone()), update);
        assert_eq!(once, twice);
    }

    #[test]
    fn absent_fields_stay_absent_in_serialized_output() {
        let r = record(r#"{"assetID": "C1", "maxHumidity": 40.0}"#);
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("maxTemperature"));
        assert!(!json.contains("carrier"));
        assert!(!json.contains("location"));
    }
}
