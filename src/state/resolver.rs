// src/state/resolver.rs
//! Total resolution of the spoof target
//!
//! Hooks never deal with "nothing configured": the resolver always hands
//! back a usable record, falling back to a fixed default coordinate.

use crate::model::LocationRecord;
use crate::state::config_store::ConfigStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::trace;

/// Where a resolved record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Read from the published config
    Config,
    /// Fallback coordinate
    Default,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::Config => "config",
            ResolutionSource::Default => "default",
        }
    }
}

/// A resolved record plus its origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub record: LocationRecord,
    pub source: ResolutionSource,
}

/// Turns a fallible store read into a guaranteed record
pub struct MockStateResolver {
    store: Arc<dyn ConfigStore>,
    fallback: LocationRecord,
}

impl MockStateResolver {
    /// Resolver falling back to the fixed default coordinate
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            fallback: LocationRecord::default_location(),
        }
    }

    /// Current spoof target; never fails
    pub fn resolve(&self) -> LocationRecord {
        self.resolve_traced().record
    }

    /// Current spoof target and whether the fallback was used
    pub fn resolve_traced(&self) -> Resolution {
        let resolution = match self.store.read_current() {
            Some(record) => Resolution {
                record,
                source: ResolutionSource::Config,
            },
            None => Resolution {
                record: self.fallback.clone(),
                source: ResolutionSource::Default,
            },
        };

        trace!(
            "Resolved ({}, {}) from {}",
            resolution.record.lat,
            resolution.record.lng,
            resolution.source.as_str()
        );
        metrics::counter!("geomock_resolutions_total", "source" => resolution.source.as_str())
            .increment(1);

        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NetworkType, SerializableCellInfo};
    use crate::state::config_store::{FileConfigStore, MemoryConfigStore};
    use proptest::prelude::*;
    use std::fs;
    use tempfile::tempdir;

    fn memory_resolver() -> (Arc<MemoryConfigStore>, MockStateResolver) {
        let store = Arc::new(MemoryConfigStore::new());
        let resolver = MockStateResolver::new(store.clone());
        (store, resolver)
    }

    #[test]
    fn test_published_record_wins() {
        let (store, resolver) = memory_resolver();
        store.publish(&LocationRecord::new("target", 48.8566, 2.3522));

        let resolution = resolver.resolve_traced();
        assert_eq!(resolution.source, ResolutionSource::Config);
        assert_eq!(resolution.record.lat, 48.8566);
        assert_eq!(resolution.record.lng, 2.3522);
    }

    #[test]
    fn test_absent_config_uses_default() {
        let (_store, resolver) = memory_resolver();

        let resolution = resolver.resolve_traced();
        assert_eq!(resolution.source, ResolutionSource::Default);
        assert_eq!((resolution.record.lat, resolution.record.lng), (39.9042, 116.4074));
    }

    #[test]
    fn test_malformed_config_uses_default() {
        let (store, resolver) = memory_resolver();
        for content in ["", "not json", "{\"lat\": 1.0", "[]", "{\"lat\":\"north\",\"lng\":1}"] {
            store.publish_raw(content);
            let record = resolver.resolve();
            assert_eq!((record.lat, record.lng), (39.9042, 116.4074), "content: {:?}", content);
        }
    }

    #[test]
    fn test_default_record_has_no_radio_data() {
        let (_store, resolver) = memory_resolver();

        let record = resolver.resolve();
        assert!(record.wifi_bssids.is_empty());
        assert!(record.cell_info.is_none());
    }

    #[test]
    fn test_idempotent_with_unchanged_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mock_location.loc");
        let record = LocationRecord::new("loop", -33.8688, 151.2093)
            .with_bssids(["aa:bb:cc:dd:ee:ff"])
            .with_cell(SerializableCellInfo::new(NetworkType::Gsm, 505, 1, 10, 20));
        fs::write(&path, serde_json::to_string(&record).unwrap()).unwrap();

        let resolver = MockStateResolver::new(Arc::new(FileConfigStore::at(&path)));
        let first = resolver.resolve();
        for _ in 0..10 {
            assert_eq!(resolver.resolve(), first);
        }
        assert_eq!(first, record);
    }

    #[test]
    fn test_picks_up_new_record_without_caching() {
        let (store, resolver) = memory_resolver();
        store.publish(&LocationRecord::new("a", 10.0, 20.0));
        assert_eq!(resolver.resolve().lat, 10.0);

        store.publish(&LocationRecord::new("b", 11.0, 21.0));
        assert_eq!(resolver.resolve().lat, 11.0);

        store.clear();
        assert_eq!(resolver.resolve().lat, 39.9042);
    }

    proptest! {
        #[test]
        fn prop_in_range_coordinates_resolve_exactly(
            lat in -90.0f64..=90.0,
            lng in -180.0f64..=180.0,
        ) {
            let dir = tempdir().unwrap();
            let path = dir.path().join("mock_location.loc");
            let json = serde_json::json!({
                "name": "prop",
                "lat": lat,
                "lng": lng,
                "timestamp": 0,
                "wifiBssids": [],
                "cellInfo": null
            });
            fs::write(&path, json.to_string()).unwrap();

            let resolver = MockStateResolver::new(Arc::new(FileConfigStore::at(&path)));
            let resolution = resolver.resolve_traced();
            prop_assert_eq!(resolution.source, ResolutionSource::Config);
            prop_assert_eq!(resolution.record.lat, lat);
            prop_assert_eq!(resolution.record.lng, lng);
        }

        #[test]
        fn prop_garbage_resolves_to_default(content in "[^{}]*") {
            let (store, resolver) = memory_resolver();
            store.publish_raw(content);
            let record = resolver.resolve();
            prop_assert_eq!((record.lat, record.lng), (39.9042, 116.4074));
        }
    }
}
