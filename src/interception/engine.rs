// src/interception/engine.rs
//! Per-process hook installation
//!
//! One engine exists per hosted process. The first eligible package load
//! installs every supported surface; later loads in the same process are
//! no-ops. Each surface installs independently and a failure on one never
//! stops the others.

use crate::interception::anti_detection::{AntiDetectionLayer, PairingGate};
use crate::interception::runtime::{register_hook, HookRuntime, LoadPackageParam, PostHook};
use crate::interception::substitution::{cell_location_hook, coordinate_hook, wifi_scan_hook};
use crate::interception::surfaces::{Surface, SurfaceGroup};
use crate::platform::PlatformAdapter;
use crate::state::{FileConfigStore, MockStateResolver};
use crate::utils::config::{EngineConfig, InterceptionConfig};
use crate::utils::errors::EngineError;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Installation result for one surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SurfaceStatus {
    Installed,
    /// The OS revision does not expose the method
    Unsupported { sdk_int: u32 },
    Failed { reason: String },
    /// Not registered because its paired flag hooks failed
    Withheld,
}

/// Outcome of installing all surfaces in one process
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub package_name: String,
    pub sdk_int: u32,
    pub adapter: &'static str,
    pub surfaces: Vec<(Surface, SurfaceStatus)>,
    /// Coordinate and authenticity overrides are effective
    pub paired: bool,
}

impl InstallReport {
    fn new(package_name: &str, sdk_int: u32, adapter: &PlatformAdapter) -> Self {
        Self {
            package_name: package_name.to_string(),
            sdk_int,
            adapter: adapter.name(),
            surfaces: Vec::with_capacity(Surface::ALL.len()),
            paired: false,
        }
    }

    fn record(&mut self, surface: Surface, status: SurfaceStatus) {
        self.surfaces.push((surface, status));
    }

    pub fn status(&self, surface: Surface) -> Option<&SurfaceStatus> {
        self.surfaces
            .iter()
            .find(|(s, _)| *s == surface)
            .map(|(_, status)| status)
    }

    pub fn is_installed(&self, surface: Surface) -> bool {
        self.status(surface) == Some(&SurfaceStatus::Installed)
    }

    pub fn installed(&self) -> Vec<Surface> {
        self.surfaces
            .iter()
            .filter(|(_, status)| *status == SurfaceStatus::Installed)
            .map(|(s, _)| *s)
            .collect()
    }

    pub fn failed(&self) -> Vec<Surface> {
        self.surfaces
            .iter()
            .filter(|(_, status)| matches!(status, SurfaceStatus::Failed { .. }))
            .map(|(s, _)| *s)
            .collect()
    }
}

/// Install lifecycle of the hosting process
#[derive(Debug, Clone)]
pub enum InstallState {
    Uninstalled,
    Installing,
    Installed(Arc<InstallReport>),
}

/// Result of handling one package-load notification
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// System process or the management app
    Excluded,
    /// Another load in this process is installing right now
    InProgress,
    /// Hooks were already installed by an earlier load
    AlreadyInstalled(Arc<InstallReport>),
    Installed(Arc<InstallReport>),
}

impl LoadOutcome {
    pub fn report(&self) -> Option<&InstallReport> {
        match self {
            LoadOutcome::AlreadyInstalled(report) | LoadOutcome::Installed(report) => Some(report),
            LoadOutcome::Excluded | LoadOutcome::InProgress => None,
        }
    }
}

/// Installs and owns the hooks of one process
pub struct InterceptionEngine {
    resolver: Arc<MockStateResolver>,
    config: InterceptionConfig,
    anti_detection: AntiDetectionLayer,
    state: Mutex<InstallState>,
}

impl InterceptionEngine {
    pub fn new(resolver: Arc<MockStateResolver>, config: InterceptionConfig) -> Self {
        Self {
            resolver,
            config,
            anti_detection: AntiDetectionLayer::new(Arc::new(PairingGate::new())),
            state: Mutex::new(InstallState::Uninstalled),
        }
    }

    /// Engine reading the published record from the configured path
    pub fn from_config(config: &EngineConfig) -> Self {
        let store = Arc::new(FileConfigStore::new(&config.store));
        let resolver = Arc::new(MockStateResolver::new(store));
        Self::new(resolver, config.engine.clone())
    }

    pub fn resolver(&self) -> &Arc<MockStateResolver> {
        &self.resolver
    }

    pub fn state(&self) -> InstallState {
        self.state.lock().clone()
    }

    pub fn is_paired(&self) -> bool {
        self.anti_detection.gate().is_armed()
    }

    /// Handle a package-load notification from the host runtime
    pub fn on_package_loaded(&self, param: &LoadPackageParam<'_>) -> LoadOutcome {
        if self.config.is_excluded(param.package_name) {
            debug!("Skipping excluded package {}", param.package_name);
            return LoadOutcome::Excluded;
        }

        {
            let mut state = self.state.lock();
            match &*state {
                InstallState::Installed(report) => {
                    debug!(
                        "Hooks already installed for this process, ignoring load of {}",
                        param.package_name
                    );
                    return LoadOutcome::AlreadyInstalled(Arc::clone(report));
                }
                InstallState::Installing => return LoadOutcome::InProgress,
                InstallState::Uninstalled => *state = InstallState::Installing,
            }
        }

        let report = Arc::new(self.install_all(param.package_name, param.runtime));
        *self.state.lock() = InstallState::Installed(Arc::clone(&report));
        LoadOutcome::Installed(report)
    }

    fn install_all(&self, package_name: &str, runtime: &dyn HookRuntime) -> InstallReport {
        let sdk_int = runtime.sdk_int();
        let adapter = PlatformAdapter::for_sdk(sdk_int);
        let mut report = InstallReport::new(package_name, sdk_int, &adapter);

        info!(
            "Installing hooks in {} (SDK {}, {} adapter)",
            package_name,
            sdk_int,
            adapter.name()
        );

        // Flags first: coordinates are only registered once their pair is in place.
        let flags_ok = self.anti_detection.install_flags(runtime, |surface, outcome| {
            let status = Self::status_from(surface, outcome);
            report.record(surface, status);
        });
        for surface in Surface::in_group(SurfaceGroup::Authenticity) {
            if !surface.is_available_on(sdk_int) {
                report.record(surface, SurfaceStatus::Unsupported { sdk_int });
            }
        }

        let mut coordinates_ok = flags_ok;
        for surface in Surface::in_group(SurfaceGroup::Coordinates) {
            if !flags_ok {
                warn!("Withholding {} hook: authenticity flags not fully installed", surface);
                report.record(surface, SurfaceStatus::Withheld);
                continue;
            }
            let hook = coordinate_hook(surface, self.resolver.clone(), self.anti_detection.gate());
            let status = self.install(runtime, surface, hook);
            coordinates_ok &= status == SurfaceStatus::Installed;
            report.record(surface, status);
        }
        report.paired = self.anti_detection.seal(flags_ok, coordinates_ok);

        let wifi = wifi_scan_hook(self.resolver.clone(), adapter);
        let status = self.install(runtime, Surface::WifiScanResults, wifi);
        report.record(Surface::WifiScanResults, status);

        let cell = cell_location_hook(self.resolver.clone(), adapter);
        let status = self.install(runtime, Surface::CellLocation, cell);
        report.record(Surface::CellLocation, status);

        report.surfaces.sort_by_key(|(surface, _)| *surface);
        info!(
            "Installed {}/{} hooks in {} (paired: {})",
            report.installed().len(),
            Surface::ALL.len(),
            package_name,
            report.paired
        );
        report
    }

    fn install(&self, runtime: &dyn HookRuntime, surface: Surface, hook: PostHook) -> SurfaceStatus {
        let outcome = register_hook(runtime, &surface.target(), hook);
        Self::status_from(surface, outcome)
    }

    fn status_from(surface: Surface, outcome: Result<(), String>) -> SurfaceStatus {
        match outcome {
            Ok(()) => {
                debug!("Hooked {}", surface.target());
                metrics::counter!(
                    "geomock_hook_install_total",
                    "surface" => surface.as_str(),
                    "outcome" => "installed"
                )
                .increment(1);
                SurfaceStatus::Installed
            }
            Err(reason) => {
                warn!(
                    "{}",
                    EngineError::HookInstallFailed {
                        surface,
                        reason: reason.clone(),
                    }
                );
                metrics::counter!(
                    "geomock_hook_install_total",
                    "surface" => surface.as_str(),
                    "outcome" => "failed"
                )
                .increment(1);
                SurfaceStatus::Failed { reason }
            }
        }
    }
}
