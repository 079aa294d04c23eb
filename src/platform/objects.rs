// src/platform/objects.rs
//! Platform value types crossing the hook boundary
//!
//! These mirror the shape of the OS objects the hooked accessors return.
//! The interception runtime converts between them and the real objects.

use serde::{Deserialize, Serialize};

/// `ScanResult.WIFI_STANDARD_11N`
pub const WIFI_STANDARD_11N: i32 = 4;

/// `ScanResult.WIFI_STANDARD_11AC`
pub const WIFI_STANDARD_11AC: i32 = 5;

/// One entry of a Wi-Fi scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Lower-case colon-separated MAC
    pub bssid: String,
    pub ssid: String,
    pub capabilities: String,
    /// RSSI in dBm
    pub level: i32,
    /// MHz
    pub frequency: i32,
    /// Microseconds since boot when the entry was last seen
    pub timestamp_us: i64,
    /// Only reported by newer platform revisions
    pub wifi_standard: Option<i32>,
}

/// GSM/UMTS cell location (lac + cid + primary scrambling code)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GsmCellLocation {
    pub lac: i32,
    pub cid: i32,
    pub psc: i32,
}

/// Result of `TelephonyManager#getCellLocation`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellLocation {
    Gsm(GsmCellLocation),
}
