// src/main.rs
//! GeoMock Probe
//!
//! Operator diagnostics for the interception engine: shows what a hooked
//! process would currently observe, dry-runs hook installation for a given
//! OS revision, and watches the published record for changes.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geomock_engine::interception::{HookValue, LoadPackageParam, SimulatedRuntime, Surface};
use geomock_engine::observability::{describe_metrics, init_tracing};
use geomock_engine::platform::{CellLocation, GsmCellLocation};
use geomock_engine::state::{FileConfigStore, MockStateResolver, Resolution, ResolutionSource};
use geomock_engine::{EngineConfig, InterceptionEngine};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "geomock-probe", version, about = "Inspect the location interception engine")]
struct Cli {
    /// Engine settings file (defaults to GEOMOCK_CONFIG or the built-in path)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read the spoof target from this file instead of the configured path
    #[arg(short, long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the record hooks would currently return
    Resolve,

    /// Install hooks into a simulated process and show what it observes
    DryRun {
        #[arg(long, default_value_t = 34)]
        sdk: u32,

        #[arg(long, default_value = "com.example.app")]
        package: String,

        /// `Class` or `Class#method` to treat as missing (repeatable)
        #[arg(long)]
        missing: Vec<String>,
    },

    /// Print the resolved record whenever it changes
    Watch {
        #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
        interval_ms: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    }
    .context("Failed to load engine settings")?;
    if let Some(store) = cli.store {
        config.store.path = store;
    }

    init_tracing(&config.logging)?;
    describe_metrics();

    info!("GeoMock probe v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Resolve => resolve(&config),
        Command::DryRun {
            sdk,
            package,
            missing,
        } => dry_run(&config, sdk, &package, &missing),
        Command::Watch { interval_ms } => watch(&config, Duration::from_millis(interval_ms)).await,
    }
}

fn resolver_for(config: &EngineConfig) -> (FileConfigStore, MockStateResolver) {
    let store = FileConfigStore::new(&config.store);
    let resolver = MockStateResolver::new(Arc::new(store.clone()));
    (store, resolver)
}

fn describe(store: &FileConfigStore, resolution: &Resolution) -> serde_json::Value {
    let reason = match resolution.source {
        ResolutionSource::Default => store.read_checked().err().map(|e| e.to_string()),
        ResolutionSource::Config => None,
    };

    json!({
        "path": store.path(),
        "source": resolution.source,
        "fallback_reason": reason,
        "in_range": resolution.record.has_valid_coordinates(),
        "captured_at": resolution.record.captured_at(),
        "record": resolution.record,
    })
}

fn resolve(config: &EngineConfig) -> Result<()> {
    let (store, resolver) = resolver_for(config);
    let resolution = resolver.resolve_traced();

    if !resolution.record.has_valid_coordinates() {
        warn!(
            "Published coordinates ({}, {}) are outside WGS84 bounds",
            resolution.record.lat, resolution.record.lng
        );
    }

    println!("{}", serde_json::to_string_pretty(&describe(&store, &resolution))?);
    Ok(())
}

fn dry_run(config: &EngineConfig, sdk: u32, package: &str, missing: &[String]) -> Result<()> {
    let runtime = SimulatedRuntime::new(sdk);
    for spec in missing {
        runtime.hide(spec);
    }

    let engine = InterceptionEngine::from_config(config);
    let outcome = engine.on_package_loaded(&LoadPackageParam::new(package, &runtime));
    let report = match outcome.report() {
        Some(report) => report.clone(),
        None => {
            println!("{}", json!({ "package": package, "excluded": true }));
            return Ok(());
        }
    };

    // Stand-in originals for what the real platform would have returned.
    let real_cell = HookValue::CellLocation(CellLocation::Gsm(GsmCellLocation {
        lac: 1,
        cid: 1,
        psc: -1,
    }));
    let observed = json!({
        "latitude": runtime.invoke(&Surface::Latitude.target(), HookValue::Double(0.0)).as_f64(),
        "longitude": runtime.invoke(&Surface::Longitude.target(), HookValue::Double(0.0)).as_f64(),
        "is_from_mock_provider": runtime
            .invoke(&Surface::MockFlagLegacy.target(), HookValue::Bool(true))
            .as_bool(),
        "is_mock": runtime
            .invoke(&Surface::MockFlagModern.target(), HookValue::Bool(true))
            .as_bool(),
        "scan_results": runtime
            .invoke(&Surface::WifiScanResults.target(), HookValue::Null)
            .as_scan_results()
            .map(|entries| entries.to_vec()),
        "cell_location": runtime
            .invoke(&Surface::CellLocation.target(), real_cell)
            .as_cell_location()
            .copied(),
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "report": report, "observed": observed }))?
    );
    Ok(())
}

async fn watch(config: &EngineConfig, period: Duration) -> Result<()> {
    let (store, resolver) = resolver_for(config);
    info!("Watching {} every {:?}", store.path().display(), period);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut interval = tokio::time::interval(period);
    let mut last: Option<Resolution> = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let current = resolver.resolve_traced();
                if last.as_ref() != Some(&current) {
                    println!("{}", serde_json::to_string(&describe(&store, &current))?);
                    last = Some(current);
                }
            }
            result = &mut shutdown => {
                result.context("Failed to listen for CTRL+C")?;
                info!("Received shutdown signal, stopping watch");
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_rejects_zero_interval() {
        assert!(Cli::try_parse_from(["geomock-probe", "watch", "--interval-ms", "0"]).is_err());

        let cli = Cli::try_parse_from(["geomock-probe", "watch", "--interval-ms", "250"]).unwrap();
        assert!(matches!(cli.command, Command::Watch { interval_ms: 250 }));
    }
}
