// src/interception/anti_detection.rs
//! Authenticity-flag overrides and the coordinate pairing rule
//!
//! Registered hooks can never be removed, so pairing is enforced with a
//! per-process gate instead:
//!
//! ```text
//! install flags ──(all applicable ok?)──┬─ no ─→ coordinates withheld, gate stays off
//!                                       └─ yes → install lat + lng
//!                                                 └─(both ok?)─→ arm gate
//! ```
//!
//! Coordinate and flag hooks only substitute while the gate is armed, so a
//! host app sees either both overrides or neither.

use crate::interception::runtime::{register_hook, CallFrame, HookRuntime, HookValue, PostHook};
use crate::interception::substitution::substitute;
use crate::interception::surfaces::{Surface, SurfaceGroup};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Per-process switch making coordinate and flag overrides effective together
#[derive(Debug, Default)]
pub struct PairingGate {
    armed: AtomicBool,
}

impl PairingGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    pub fn arm(&self) {
        self.armed.store(true, Ordering::Release);
    }
}

/// Forces mock-detection flags to "not mocked"
pub struct AntiDetectionLayer {
    gate: Arc<PairingGate>,
}

impl AntiDetectionLayer {
    pub fn new(gate: Arc<PairingGate>) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> Arc<PairingGate> {
        Arc::clone(&self.gate)
    }

    /// Flag variants the running OS exposes
    pub fn applicable_flags(sdk_int: u32) -> Vec<Surface> {
        Surface::in_group(SurfaceGroup::Authenticity)
            .filter(|s| s.is_available_on(sdk_int))
            .collect()
    }

    /// Hook forcing `surface` to report "not mocked" while the gate is armed
    pub fn flag_hook(&self, surface: Surface) -> PostHook {
        let gate = self.gate();
        Arc::new(move |frame: &mut CallFrame| {
            substitute(surface, frame, |original| {
                if !gate.is_armed() {
                    return None;
                }
                if original.as_bool() == Some(true) {
                    debug!("{}: hiding mock flag", surface);
                }
                Some(HookValue::Bool(false))
            })
        })
    }

    /// Register every applicable flag hook; `true` when none failed
    pub fn install_flags<F>(&self, runtime: &dyn HookRuntime, mut record: F) -> bool
    where
        F: FnMut(Surface, Result<(), String>),
    {
        let mut all_ok = true;
        for surface in Self::applicable_flags(runtime.sdk_int()) {
            let outcome = register_hook(runtime, &surface.target(), self.flag_hook(surface));
            all_ok &= outcome.is_ok();
            record(surface, outcome);
        }
        all_ok
    }

    /// Arm the gate once both halves of the pair are in place
    pub fn seal(&self, flags_ok: bool, coordinates_ok: bool) -> bool {
        if flags_ok && coordinates_ok {
            self.gate.arm();
            info!("Coordinate and authenticity overrides armed");
            true
        } else {
            info!(
                "Overrides left disarmed (flags ok: {}, coordinates ok: {})",
                flags_ok, coordinates_ok
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interception::simulated::SimulatedRuntime;

    #[test]
    fn test_applicable_flags() {
        assert_eq!(AntiDetectionLayer::applicable_flags(30), vec![Surface::MockFlagLegacy]);
        assert_eq!(
            AntiDetectionLayer::applicable_flags(33),
            vec![Surface::MockFlagLegacy, Surface::MockFlagModern]
        );
        assert!(AntiDetectionLayer::applicable_flags(17).is_empty());
    }

    #[test]
    fn test_flag_hook_respects_gate() {
        let layer = AntiDetectionLayer::new(Arc::new(PairingGate::new()));
        let hook = layer.flag_hook(Surface::MockFlagLegacy);

        let mut frame = CallFrame::new(HookValue::Bool(true));
        hook(&mut frame);
        assert_eq!(frame.result().as_bool(), Some(true));

        layer.seal(true, true);
        let mut frame = CallFrame::new(HookValue::Bool(true));
        hook(&mut frame);
        assert_eq!(frame.result().as_bool(), Some(false));
    }

    #[test]
    fn test_install_flags_reports_each_variant() {
        let runtime = SimulatedRuntime::new(33).without_method(Surface::MockFlagModern.target());
        let layer = AntiDetectionLayer::new(Arc::new(PairingGate::new()));

        let mut seen = Vec::new();
        let ok = layer.install_flags(&runtime, |surface, outcome| seen.push((surface, outcome.is_ok())));

        assert!(!ok);
        assert_eq!(
            seen,
            vec![(Surface::MockFlagLegacy, true), (Surface::MockFlagModern, false)]
        );
    }

    #[test]
    fn test_seal_requires_both_halves() {
        let layer = AntiDetectionLayer::new(Arc::new(PairingGate::new()));
        assert!(!layer.seal(true, false));
        assert!(!layer.seal(false, true));
        assert!(!layer.gate().is_armed());
        assert!(layer.seal(true, true));
        assert!(layer.gate().is_armed());
    }
}
