//! In-memory parameter store with optional JSON snapshot persistence.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use crate::error::{ParameterError, ParameterResult};
use crate::path::ParameterPath;

/// A stored parameter value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Parameter {
    /// The stored string value.
    pub value: String,
    /// Version, starting at 1 and bumped only when the value changes.
    pub version: u64,
    /// Time of the last write that changed the value.
    pub last_modified: DateTime<Utc>,
}

/// Thread-safe parameter store, single-writer-per-path and multi-reader.
///
/// `publish` is idempotent: republishing an unchanged value keeps the stored
/// version, so a redeployed producer stack leaves consumers undisturbed.
#[derive(Debug, Default)]
pub struct ParameterStore {
    inner: DashMap<ParameterPath, Parameter>,
}

impl ParameterStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Write a value at `path`, returning the stored version.
    ///
    /// Publishing the same value again is a no-op; a different value
    /// overwrites and bumps the version.
    pub fn publish(&self, path: ParameterPath, value: impl Into<String>) -> u64 {
        let value = value.into();
        let mut entry = self.inner.entry(path.clone()).or_insert_with(|| Parameter {
            value: value.clone(),
            version: 1,
            last_modified: Utc::now(),
        });
        if entry.value != value {
            entry.value = value;
            entry.version += 1;
            entry.last_modified = Utc::now();
        }
        let version = entry.version;
        drop(entry);
        debug!(path = %path, version, "published parameter");
        version
    }

    /// Resolve the value at `path`.
    ///
    /// # Errors
    /// Returns [`ParameterError::ParameterNotFound`] if the path has never
    /// been published. There is no retry; the caller treats this as a hard
    /// precondition failure.
    pub fn resolve(&self, path: &ParameterPath) -> ParameterResult<String> {
        self.inner
            .get(path)
            .map(|p| p.value.clone())
            .ok_or_else(|| ParameterError::ParameterNotFound(path.to_string()))
    }

    /// Get the full parameter record at `path`, if present.
    #[must_use]
    pub fn get(&self, path: &ParameterPath) -> Option<Parameter> {
        self.inner.get(path).map(|p| p.clone())
    }

    /// Whether a value exists at `path`.
    #[must_use]
    pub fn contains(&self, path: &ParameterPath) -> bool {
        self.inner.contains_key(path)
    }

    /// Remove the value at `path`, returning it if present.
    pub fn remove(&self, path: &ParameterPath) -> Option<Parameter> {
        self.inner.remove(path).map(|(_, p)| p)
    }

    /// Number of stored parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Write all parameters to a JSON snapshot file.
    pub fn save_snapshot(&self, file: &Path) -> ParameterResult<()> {
        // BTreeMap keeps the snapshot diff-stable across runs.
        let snapshot: BTreeMap<String, Parameter> = self
            .inner
            .iter()
            .map(|e| (e.key().to_string(), e.value().clone()))
            .collect();
        let json = serde_json::to_vec_pretty(&snapshot).map_err(|source| {
            ParameterError::SnapshotFormat {
                path: file.display().to_string(),
                source,
            }
        })?;
        std::fs::write(file, json).map_err(|source| ParameterError::SnapshotIo {
            path: file.display().to_string(),
            source,
        })?;
        debug!(file = %file.display(), count = self.len(), "saved parameter snapshot");
        Ok(())
    }

    /// Load parameters from a JSON snapshot file, replacing current contents.
    pub fn load_snapshot(&self, file: &Path) -> ParameterResult<()> {
        let bytes = std::fs::read(file).map_err(|source| ParameterError::SnapshotIo {
            path: file.display().to_string(),
            source,
        })?;
        let snapshot: BTreeMap<String, Parameter> =
            serde_json::from_slice(&bytes).map_err(|source| ParameterError::SnapshotFormat {
                path: file.display().to_string(),
                source,
            })?;
        self.inner.clear();
        for (path, parameter) in snapshot {
            self.inner.insert(ParameterPath::from_raw(path), parameter);
        }
        debug!(file = %file.display(), count = self.len(), "loaded parameter snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use netstack_core::DeploymentId;

    use super::*;

    fn path(name: &str) -> ParameterPath {
        ParameterPath::new(&DeploymentId::new("test").unwrap(), name)
    }

    #[test]
    fn test_should_resolve_published_value() {
        let store = ParameterStore::new();
        store.publish(path("coreRouterId"), "tgw-0123456789abcdef0");

        let value = store.resolve(&path("coreRouterId")).unwrap();
        assert_eq!(value, "tgw-0123456789abcdef0");
    }

    #[test]
    fn test_should_fail_resolving_unpublished_path() {
        let store = ParameterStore::new();
        let err = store.resolve(&path("coreRouterId")).unwrap_err();
        assert!(matches!(err, ParameterError::ParameterNotFound(_)));
    }

    #[test]
    fn test_should_keep_version_on_idempotent_republish() {
        let store = ParameterStore::new();
        let v1 = store.publish(path("coreRouterId"), "tgw-aaa");
        let v2 = store.publish(path("coreRouterId"), "tgw-aaa");
        assert_eq!(v1, 1);
        assert_eq!(v2, 1);
    }

    #[test]
    fn test_should_bump_version_on_changed_value() {
        let store = ParameterStore::new();
        store.publish(path("coreRouterId"), "tgw-aaa");
        let v2 = store.publish(path("coreRouterId"), "tgw-bbb");
        assert_eq!(v2, 2);
        assert_eq!(store.resolve(&path("coreRouterId")).unwrap(), "tgw-bbb");
    }

    #[test]
    fn test_should_round_trip_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("params.json");

        let store = ParameterStore::new();
        store.publish(path("coreRouterId"), "tgw-aaa");
        store.publish(path("edgeRouteTableId"), "tgw-rtb-bbb");
        store.save_snapshot(&file).unwrap();

        let restored = ParameterStore::new();
        restored.load_snapshot(&file).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.resolve(&path("coreRouterId")).unwrap(), "tgw-aaa");
        assert_eq!(
            restored.get(&path("edgeRouteTableId")).unwrap().version,
            store.get(&path("edgeRouteTableId")).unwrap().version
        );
    }
}
