// src/model/cell.rs
//! Serialized serving-cell identity

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Sentinel for an identity field the collector could not fill
pub const UNSET: i32 = -1;

fn unset() -> i32 {
    UNSET
}

/// Radio access technology of the recorded cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkType {
    #[serde(rename = "GSM")]
    Gsm,
    #[serde(rename = "WCDMA")]
    Wcdma,
    #[serde(rename = "LTE")]
    Lte,
    #[serde(rename = "NR")]
    Nr,
    #[serde(other)]
    Unknown,
}

impl NetworkType {
    /// GSM and WCDMA carry a (lac, cid) identity that can be rebuilt as a
    /// platform cell location. LTE/NR identities cannot.
    pub fn is_circuit_switched(&self) -> bool {
        matches!(self, NetworkType::Gsm | NetworkType::Wcdma)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Gsm => "GSM",
            NetworkType::Wcdma => "WCDMA",
            NetworkType::Lte => "LTE",
            NetworkType::Nr => "NR",
            NetworkType::Unknown => "UNKNOWN",
        }
    }
}

impl Default for NetworkType {
    fn default() -> Self {
        NetworkType::Unknown
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Collectors write `"networkType": null` when the type was never resolved.
fn network_type_or_unknown<'de, D>(deserializer: D) -> std::result::Result<NetworkType, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<NetworkType>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serving cell captured alongside a location record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializableCellInfo {
    #[serde(default, deserialize_with = "network_type_or_unknown")]
    pub network_type: NetworkType,

    #[serde(default = "unset")]
    pub mcc: i32,

    #[serde(default = "unset")]
    pub mnc: i32,

    /// LAC for GSM/WCDMA, TAC for LTE/NR
    #[serde(default = "unset")]
    pub lac: i32,

    #[serde(default = "unset")]
    pub cid: i32,
}

impl SerializableCellInfo {
    pub fn new(network_type: NetworkType, mcc: i32, mnc: i32, lac: i32, cid: i32) -> Self {
        Self {
            network_type,
            mcc,
            mnc,
            lac,
            cid,
        }
    }

    pub fn is_circuit_switched(&self) -> bool {
        self.network_type.is_circuit_switched()
    }

    /// Both location identity fields carry real values
    pub fn has_identity(&self) -> bool {
        self.lac != UNSET && self.cid != UNSET
    }
}

impl fmt::Display for SerializableCellInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} MCC:{} MNC:{} LAC/TAC:{} CID:{}",
            self.network_type, self.mcc, self.mnc, self.lac, self.cid
        )
    }
}
