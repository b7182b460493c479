//! Shared installation state passed between jobs.
//!
//! Values are stored as JSON under string keys so later steps (and the saved
//! state file) see the same shape regardless of who wrote them. Known keys are
//! declared as `StorageKey` types, which gives each one a typed accessor:
//!
//! ```
//! use setupkit::global_storage::{keys, GlobalStorage};
//!
//! let mut gs = GlobalStorage::new();
//! gs.insert::<keys::LocationRegion>(&"Europe".to_string()).unwrap();
//! assert_eq!(gs.get::<keys::LocationRegion>().unwrap().as_deref(), Some("Europe"));
//! ```

use crate::error::{Result, SetupError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A well-known storage key and the type stored under it.
pub trait StorageKey {
    const NAME: &'static str;
    type Value: Serialize + DeserializeOwned;
}

/// The keys this crate reads or writes.
pub mod keys {
    use super::StorageKey;
    use crate::partition::record::{BootLoaderRecord, PartitionRecord};

    /// Ordered partition records written by `FillGlobalStorageJob`.
    pub struct Partitions;
    impl StorageKey for Partitions {
        const NAME: &'static str = "partitions";
        type Value = Vec<PartitionRecord>;
    }

    /// Bootloader placement; `None` is stored as an explicit `null`.
    pub struct BootLoader;
    impl StorageKey for BootLoader {
        const NAME: &'static str = "bootLoader";
        type Value = Option<BootLoaderRecord>;
    }

    pub struct LocationRegion;
    impl StorageKey for LocationRegion {
        const NAME: &'static str = "locationRegion";
        type Value = String;
    }

    pub struct LocationZone;
    impl StorageKey for LocationZone {
        const NAME: &'static str = "locationZone";
        type Value = String;
    }

    /// Where the target system is mounted; written by the mount step.
    pub struct RootMountPoint;
    impl StorageKey for RootMountPoint {
        const NAME: &'static str = "rootMountPoint";
        type Value = String;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalStorage {
    entries: BTreeMap<String, Value>,
}

impl GlobalStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `K`, replacing whatever was there.
    pub fn insert<K: StorageKey>(&mut self, value: &K::Value) -> Result<()> {
        let json = serde_json::to_value(value)?;
        self.insert_raw(K::NAME, json);
        Ok(())
    }

    /// Read `K`. `Ok(None)` when the key was never written.
    pub fn get<K: StorageKey>(&self) -> Result<Option<K::Value>> {
        match self.entries.get(K::NAME) {
            None => Ok(None),
            Some(v) => serde_json::from_value(v.clone()).map(Some).map_err(|e| {
                SetupError::storage(format!("value under {:?} has unexpected shape: {}", K::NAME, e))
            }),
        }
    }

    pub fn contains<K: StorageKey>(&self) -> bool {
        self.contains_raw(K::NAME)
    }

    pub fn insert_raw(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        debug!(key = %key, "global storage insert");
        self.entries.insert(key, value);
    }

    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_raw(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The whole store as one JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(self.entries.clone().into_iter().collect())
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.to_json())?;
        fs::write(path.as_ref(), text)?;
        debug!(path = %path.as_ref().display(), keys = self.len(), "saved global storage");
        Ok(())
    }

    /// Load a store previously written by `save_json`. The file must hold a JSON object.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(Self {
                entries: map.into_iter().collect(),
            }),
            other => Err(SetupError::storage(format!(
                "expected a JSON object in {}, found {}",
                path.as_ref().display(),
                type_name(&other)
            ))),
        }
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
