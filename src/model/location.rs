// src/model/location.rs
//! Spoof target record

use crate::model::cell::SerializableCellInfo;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Fallback latitude (Beijing)
pub const DEFAULT_LAT: f64 = 39.9042;

/// Fallback longitude (Beijing)
pub const DEFAULT_LNG: f64 = 116.4074;

// `"wifiBssids": null` is accepted and read as an empty list.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A location the operator wants the host application to observe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    /// Display label; not used for interception
    #[serde(default)]
    pub name: String,

    pub lat: f64,

    pub lng: f64,

    /// Capture time, milliseconds since epoch
    #[serde(default)]
    pub timestamp: i64,

    /// Access points seen at capture time, in scan order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub wifi_bssids: Vec<String>,

    #[serde(default)]
    pub cell_info: Option<SerializableCellInfo>,
}

impl LocationRecord {
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
            timestamp: Utc::now().timestamp_millis(),
            wifi_bssids: Vec::new(),
            cell_info: None,
        }
    }

    pub fn with_bssids<I, S>(mut self, bssids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.wifi_bssids = bssids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cell(mut self, cell: SerializableCellInfo) -> Self {
        self.cell_info = Some(cell);
        self
    }

    /// The record used whenever nothing valid is published
    pub fn default_location() -> Self {
        Self {
            name: "default".to_string(),
            lat: DEFAULT_LAT,
            lng: DEFAULT_LNG,
            timestamp: 0,
            wifi_bssids: Vec::new(),
            cell_info: None,
        }
    }

    /// Coordinates fall inside WGS84 bounds. Reads never enforce this;
    /// it only feeds diagnostics.
    pub fn has_valid_coordinates(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        if self.timestamp <= 0 {
            return None;
        }
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}
