// src/interception/mod.rs
//! Location interception layer
//!
//! This module installs post-call substitutions on OS location and radio
//! accessors inside a hosted process:
//!
//! - **Runtime**: the narrow hook-registration boundary to the host runtime
//! - **Surfaces**: the fixed set of intercepted methods
//! - **Substitution**: per-surface hook bodies
//! - **Anti-detection**: mock-flag overrides and coordinate pairing
//! - **Engine**: per-process installation with per-surface isolation
//! - **Simulated**: an in-process runtime for tests and dry runs
//!
//! # Architecture
//!
//! ```text
//! Host App (Unmodified)
//!     │
//!     ├─ Location.getLatitude()/getLongitude() → resolve() → lat / lng
//!     ├─ Location.isFromMockProvider()/isMock() → false
//!     ├─ WifiManager.getScanResults() → entries built from recorded BSSIDs
//!     └─ TelephonyManager.getCellLocation() → GSM/WCDMA cell, else original
//! ```

pub mod anti_detection;
pub mod engine;
pub mod runtime;
pub mod simulated;
pub mod substitution;
pub mod surfaces;

// Re-export commonly used types
pub use anti_detection::{AntiDetectionLayer, PairingGate};
pub use engine::{InstallReport, InstallState, InterceptionEngine, LoadOutcome, SurfaceStatus};
pub use runtime::{CallFrame, HookError, HookRuntime, HookValue, LoadPackageParam, MethodTarget, PostHook};
pub use simulated::SimulatedRuntime;
pub use surfaces::{Surface, SurfaceGroup};
