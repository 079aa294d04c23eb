// src/interception/surfaces.rs
//! The fixed set of intercepted API surfaces
//!
//! Exactly one hook is registered per surface; there are no alternative
//! registrations of the same method with different policies.

use crate::interception::runtime::MethodTarget;
use serde::Serialize;
use std::fmt;

const LOCATION: &str = "android.location.Location";
const WIFI_MANAGER: &str = "android.net.wifi.WifiManager";
const TELEPHONY_MANAGER: &str = "android.telephony.TelephonyManager";

/// An intercepted OS entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Latitude,
    Longitude,
    /// `Location#isFromMockProvider`
    MockFlagLegacy,
    /// `Location#isMock`
    MockFlagModern,
    WifiScanResults,
    CellLocation,
}

/// How a surface participates in the pairing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceGroup {
    Coordinates,
    Authenticity,
    Radio,
}

impl Surface {
    pub const ALL: [Surface; 6] = [
        Surface::Latitude,
        Surface::Longitude,
        Surface::MockFlagLegacy,
        Surface::MockFlagModern,
        Surface::WifiScanResults,
        Surface::CellLocation,
    ];

    pub fn target(&self) -> MethodTarget {
        match self {
            Surface::Latitude => MethodTarget::new(LOCATION, "getLatitude"),
            Surface::Longitude => MethodTarget::new(LOCATION, "getLongitude"),
            Surface::MockFlagLegacy => MethodTarget::new(LOCATION, "isFromMockProvider"),
            Surface::MockFlagModern => MethodTarget::new(LOCATION, "isMock"),
            Surface::WifiScanResults => MethodTarget::new(WIFI_MANAGER, "getScanResults"),
            Surface::CellLocation => MethodTarget::new(TELEPHONY_MANAGER, "getCellLocation"),
        }
    }

    /// First API level exposing the method
    pub fn min_sdk(&self) -> u32 {
        match self {
            Surface::MockFlagLegacy => 18,
            Surface::MockFlagModern => 31,
            _ => 1,
        }
    }

    pub fn is_available_on(&self, sdk_int: u32) -> bool {
        sdk_int >= self.min_sdk()
    }

    pub fn group(&self) -> SurfaceGroup {
        match self {
            Surface::Latitude | Surface::Longitude => SurfaceGroup::Coordinates,
            Surface::MockFlagLegacy | Surface::MockFlagModern => SurfaceGroup::Authenticity,
            Surface::WifiScanResults | Surface::CellLocation => SurfaceGroup::Radio,
        }
    }

    pub fn in_group(group: SurfaceGroup) -> impl Iterator<Item = Surface> {
        Self::ALL.into_iter().filter(move |s| s.group() == group)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Latitude => "latitude",
            Surface::Longitude => "longitude",
            Surface::MockFlagLegacy => "mock_flag_legacy",
            Surface::MockFlagModern => "mock_flag_modern",
            Surface::WifiScanResults => "wifi_scan_results",
            Surface::CellLocation => "cell_location",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
