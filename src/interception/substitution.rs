// src/interception/substitution.rs
//! Post-call substitutions, one per surface
//!
//! Every hook body runs inline on the caller's thread. A body computes an
//! optional replacement from the original result; `None` or a panic keeps
//! the original value.

use crate::interception::anti_detection::PairingGate;
use crate::interception::runtime::{CallFrame, HookValue, PostHook};
use crate::interception::surfaces::Surface;
use crate::platform::PlatformAdapter;
use crate::state::MockStateResolver;
use crate::utils::errors::EngineError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

/// Apply `body` to the frame, keeping the original result on `None` or panic
pub fn substitute<F>(surface: Surface, frame: &mut CallFrame, body: F)
where
    F: FnOnce(&HookValue) -> Option<HookValue>,
{
    let outcome = catch_unwind(AssertUnwindSafe(|| body(frame.result())));

    match outcome {
        Ok(Some(value)) => {
            metrics::counter!("geomock_substitutions_total", "surface" => surface.as_str())
                .increment(1);
            frame.set_result(value);
        }
        Ok(None) => {
            metrics::counter!("geomock_passthrough_total", "surface" => surface.as_str())
                .increment(1);
        }
        Err(_) => {
            error!("Substitution for {} panicked, keeping original value", surface);
            metrics::counter!("geomock_passthrough_total", "surface" => surface.as_str())
                .increment(1);
        }
    }
}

/// Latitude/longitude override, effective only while the gate is armed
pub fn coordinate_hook(
    surface: Surface,
    resolver: Arc<MockStateResolver>,
    gate: Arc<PairingGate>,
) -> PostHook {
    Arc::new(move |frame: &mut CallFrame| {
        substitute(surface, frame, |original| {
            if !gate.is_armed() {
                return None;
            }
            let record = resolver.resolve();
            let value = match surface {
                Surface::Latitude => record.lat,
                Surface::Longitude => record.lng,
                _ => return None,
            };
            debug!("{}: {:?} -> {}", surface, original.as_f64(), value);
            Some(HookValue::Double(value))
        })
    })
}

/// Wi-Fi scan results rebuilt from the resolved BSSID list
pub fn wifi_scan_hook(resolver: Arc<MockStateResolver>, adapter: PlatformAdapter) -> PostHook {
    Arc::new(move |frame: &mut CallFrame| {
        substitute(Surface::WifiScanResults, frame, |original| {
            if !adapter.is_supported() {
                return None;
            }

            // Match the freshest real entry.
            let timestamp_us = original
                .as_scan_results()
                .and_then(|entries| entries.iter().map(|e| e.timestamp_us).max())
                .unwrap_or(0);

            let record = resolver.resolve();
            let mut results = Vec::with_capacity(record.wifi_bssids.len());
            for bssid in &record.wifi_bssids {
                match adapter.scan_result(bssid, results.len(), timestamp_us) {
                    Ok(entry) => results.push(entry),
                    Err(e) => debug!(
                        "{}",
                        EngineError::SynthesisFailed {
                            surface: Surface::WifiScanResults,
                            reason: e.to_string(),
                        }
                    ),
                }
            }

            debug!("{}: {} synthesized entries", Surface::WifiScanResults, results.len());
            Some(HookValue::ScanResults(results))
        })
    })
}

/// Cell location rebuilt for GSM/WCDMA records; anything else passes through
pub fn cell_location_hook(resolver: Arc<MockStateResolver>, adapter: PlatformAdapter) -> PostHook {
    Arc::new(move |frame: &mut CallFrame| {
        substitute(Surface::CellLocation, frame, |_original| {
            let record = resolver.resolve();
            let cell = record.cell_info.as_ref()?;

            match adapter.gsm_cell_location(cell) {
                Ok(location) => Some(HookValue::CellLocation(location)),
                Err(e) => {
                    debug!(
                        "{}",
                        EngineError::SynthesisFailed {
                            surface: Surface::CellLocation,
                            reason: e.to_string(),
                        }
                    );
                    None
                }
            }
        })
    })
}
