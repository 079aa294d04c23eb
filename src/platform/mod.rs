// src/platform/mod.rs
//! Versioned platform adapters
//!
//! Replacement radio objects are built through an adapter selected from
//! the running OS revision. Each supported revision band has its own
//! variant; anything outside the known bands gets [`PlatformAdapter::Unsupported`],
//! which refuses to synthesize so hooks keep the original platform value.
//!
//! | Revision  | SDK      | Scan result fields          |
//! |-----------|----------|-----------------------------|
//! | `Legacy`  | 21..=29  | base fields                 |
//! | `Modern`  | 30..=35  | base fields + Wi-Fi standard |

pub mod objects;

pub use objects::{CellLocation, GsmCellLocation, ScanResult};

use crate::model::{NetworkType, SerializableCellInfo, UNSET};
use mac_address::MacAddress;
use objects::{WIFI_STANDARD_11AC, WIFI_STANDARD_11N};
use std::fmt;

/// Oldest SDK with a known object layout
pub const MIN_SUPPORTED_SDK: u32 = 21;

/// Newest SDK with a known object layout
pub const MAX_SUPPORTED_SDK: u32 = 35;

/// First SDK reporting `ScanResult#getWifiStandard`
const WIFI_STANDARD_SDK: u32 = 30;

const MAX_LAC: i32 = 0xFFFF;
const MAX_GSM_CID: i32 = 0xFFFF;
const MAX_UMTS_CID: i32 = 0x0FFF_FFFF;

const CHANNELS_MHZ: [i32; 4] = [2412, 2437, 2462, 5180];
const STRONGEST_DBM: i32 = -45;
const WEAKEST_DBM: i32 = -90;
const CAPABILITIES: &str = "[WPA2-PSK-CCMP][RSN-PSK-CCMP][ESS]";

/// Why an object could not be synthesized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    UnsupportedRevision(u32),
    InvalidBssid(String),
    NotCircuitSwitched(NetworkType),
    UnsetIdentity,
    IdentityOutOfRange { lac: i32, cid: i32 },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::UnsupportedRevision(sdk) => write!(f, "unsupported SDK {}", sdk),
            SynthesisError::InvalidBssid(bssid) => write!(f, "invalid BSSID {:?}", bssid),
            SynthesisError::NotCircuitSwitched(ty) => write!(f, "{} cells are not synthesized", ty),
            SynthesisError::UnsetIdentity => f.write_str("lac/cid not set"),
            SynthesisError::IdentityOutOfRange { lac, cid } => {
                write!(f, "lac {} / cid {} out of range", lac, cid)
            }
        }
    }
}

impl std::error::Error for SynthesisError {}

/// Object layout selected from the running SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformAdapter {
    Legacy { sdk_int: u32 },
    Modern { sdk_int: u32 },
    Unsupported { sdk_int: u32 },
}

impl PlatformAdapter {
    pub fn for_sdk(sdk_int: u32) -> Self {
        match sdk_int {
            s if s < MIN_SUPPORTED_SDK => PlatformAdapter::Unsupported { sdk_int },
            s if s < WIFI_STANDARD_SDK => PlatformAdapter::Legacy { sdk_int },
            s if s <= MAX_SUPPORTED_SDK => PlatformAdapter::Modern { sdk_int },
            _ => PlatformAdapter::Unsupported { sdk_int },
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, PlatformAdapter::Unsupported { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            PlatformAdapter::Legacy { .. } => "legacy",
            PlatformAdapter::Modern { .. } => "modern",
            PlatformAdapter::Unsupported { .. } => "unsupported",
        }
    }

    /// Build the `index`-th scan entry for a recorded BSSID
    pub fn scan_result(
        &self,
        bssid: &str,
        index: usize,
        timestamp_us: i64,
    ) -> Result<ScanResult, SynthesisError> {
        if let PlatformAdapter::Unsupported { sdk_int } = *self {
            return Err(SynthesisError::UnsupportedRevision(sdk_int));
        }

        let mac: MacAddress = bssid
            .trim()
            .parse()
            .map_err(|_| SynthesisError::InvalidBssid(bssid.to_string()))?;

        let frequency = CHANNELS_MHZ[index % CHANNELS_MHZ.len()];
        let level = (STRONGEST_DBM - 4 * index as i32).max(WEAKEST_DBM);
        let wifi_standard = match self {
            PlatformAdapter::Modern { .. } if frequency >= 5000 => Some(WIFI_STANDARD_11AC),
            PlatformAdapter::Modern { .. } => Some(WIFI_STANDARD_11N),
            _ => None,
        };

        Ok(ScanResult {
            bssid: mac.to_string().to_lowercase(),
            ssid: String::new(),
            capabilities: CAPABILITIES.to_string(),
            level,
            frequency,
            timestamp_us,
            wifi_standard,
        })
    }

    /// Build a GSM cell location from a recorded GSM or WCDMA cell
    pub fn gsm_cell_location(
        &self,
        cell: &SerializableCellInfo,
    ) -> Result<CellLocation, SynthesisError> {
        if let PlatformAdapter::Unsupported { sdk_int } = *self {
            return Err(SynthesisError::UnsupportedRevision(sdk_int));
        }
        if !cell.is_circuit_switched() {
            return Err(SynthesisError::NotCircuitSwitched(cell.network_type));
        }
        if !cell.has_identity() {
            return Err(SynthesisError::UnsetIdentity);
        }

        let max_cid = match cell.network_type {
            NetworkType::Wcdma => MAX_UMTS_CID,
            _ => MAX_GSM_CID,
        };
        if !(0..=MAX_LAC).contains(&cell.lac) || !(0..=max_cid).contains(&cell.cid) {
            return Err(SynthesisError::IdentityOutOfRange {
                lac: cell.lac,
                cid: cell.cid,
            });
        }

        Ok(CellLocation::Gsm(GsmCellLocation {
            lac: cell.lac,
            cid: cell.cid,
            psc: UNSET,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_bands() {
        assert!(matches!(PlatformAdapter::for_sdk(19), PlatformAdapter::Unsupported { .. }));
        assert!(matches!(PlatformAdapter::for_sdk(21), PlatformAdapter::Legacy { .. }));
        assert!(matches!(PlatformAdapter::for_sdk(29), PlatformAdapter::Legacy { .. }));
        assert!(matches!(PlatformAdapter::for_sdk(30), PlatformAdapter::Modern { .. }));
        assert!(matches!(PlatformAdapter::for_sdk(35), PlatformAdapter::Modern { .. }));
        assert!(matches!(PlatformAdapter::for_sdk(36), PlatformAdapter::Unsupported { .. }));
    }

    #[test]
    fn test_scan_result_fields() {
        let legacy = PlatformAdapter::for_sdk(28);
        let entry = legacy.scan_result("AA:BB:CC:DD:EE:FF", 0, 1234).unwrap();
        assert_eq!(entry.bssid, "aa:bb:cc:dd:ee:ff");
        assert_eq!(entry.frequency, 2412);
        assert_eq!(entry.level, -45);
        assert_eq!(entry.timestamp_us, 1234);
        assert_eq!(entry.wifi_standard, None);

        let modern = PlatformAdapter::for_sdk(34);
        let entry = modern.scan_result("aa-bb-cc-dd-ee-ff", 3, 0).unwrap();
        assert_eq!(entry.bssid, "aa:bb:cc:dd:ee:ff");
        assert_eq!(entry.frequency, 5180);
        assert_eq!(entry.wifi_standard, Some(WIFI_STANDARD_11AC));
    }

    #[test]
    fn test_signal_floor() {
        let entry = PlatformAdapter::for_sdk(30)
            .scan_result("00:11:22:33:44:55", 100, 0)
            .unwrap();
        assert_eq!(entry.level, WEAKEST_DBM);
    }

    #[test]
    fn test_invalid_bssid() {
        let err = PlatformAdapter::for_sdk(30).scan_result("not-a-mac", 0, 0).unwrap_err();
        assert_eq!(err, SynthesisError::InvalidBssid("not-a-mac".to_string()));
    }

    #[test]
    fn test_unsupported_fails_closed() {
        let adapter = PlatformAdapter::for_sdk(40);
        assert!(!adapter.is_supported());
        assert!(adapter.scan_result("aa:bb:cc:dd:ee:ff", 0, 0).is_err());

        let cell = SerializableCellInfo::new(NetworkType::Gsm, 460, 0, 1, 2);
        assert_eq!(
            adapter.gsm_cell_location(&cell).unwrap_err(),
            SynthesisError::UnsupportedRevision(40)
        );
    }

    #[test]
    fn test_gsm_and_wcdma_cells() {
        let adapter = PlatformAdapter::for_sdk(29);

        let gsm = SerializableCellInfo::new(NetworkType::Gsm, 460, 0, 4301, 20931);
        let location = adapter.gsm_cell_location(&gsm).unwrap();
        assert_eq!(
            location,
            CellLocation::Gsm(GsmCellLocation { lac: 4301, cid: 20931, psc: -1 })
        );

        let wcdma = SerializableCellInfo::new(NetworkType::Wcdma, 460, 1, 4301, 0x0ABC_DEF0);
        let location = adapter.gsm_cell_location(&wcdma).unwrap();
        let CellLocation::Gsm(cell) = location;
        assert_eq!(cell.cid, 0x0ABC_DEF0);
    }

    #[test]
    fn test_cell_rejections() {
        let adapter = PlatformAdapter::for_sdk(33);

        let lte = SerializableCellInfo::new(NetworkType::Lte, 460, 0, 1, 2);
        assert_eq!(
            adapter.gsm_cell_location(&lte).unwrap_err(),
            SynthesisError::NotCircuitSwitched(NetworkType::Lte)
        );

        let unset = SerializableCellInfo::new(NetworkType::Gsm, 460, 0, UNSET, 2);
        assert_eq!(adapter.gsm_cell_location(&unset).unwrap_err(), SynthesisError::UnsetIdentity);

        let too_big = SerializableCellInfo::new(NetworkType::Gsm, 460, 0, 1, 0x0ABC_DEF0);
        assert!(matches!(
            adapter.gsm_cell_location(&too_big).unwrap_err(),
            SynthesisError::IdentityOutOfRange { .. }
        ));
    }
}
