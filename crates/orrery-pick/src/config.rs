// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persistent pick tunables.
//!
//! [`PickConfig`] is stored as JSON under [`PickConfig::KEY`] through any
//! [`ConfigStore`]. Stored files may be partial; absent fields take their
//! defaults and the merged result is validated before use.

use std::cell::RefCell;
use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::aabb_tree::DEFAULT_POLYS_PER_LEAF;

/// Radius used for points and tubes when no appearance sets one.
pub const DEFAULT_RADIUS: f64 = 0.025;

/// Tunables of [`crate::AabbPickSystem`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickConfig {
    /// Deepest component nesting the traversal accepts.
    pub max_depth: usize,
    /// Leaf capacity of newly built trees.
    pub max_polys_per_leaf: usize,
    /// Build a tree for meshes with at least this many faces, even without
    /// the `pick_tree` attribute.
    pub auto_tree_min_faces: Option<usize>,
    /// Point radius at the scene root.
    pub default_point_radius: f64,
    /// Tube radius at the scene root.
    pub default_tube_radius: f64,
}

impl PickConfig {
    /// Storage key.
    pub const KEY: &'static str = "pick";

    /// Stored config merged over the defaults. Nothing stored means defaults.
    pub fn load<S: ConfigStore>(config: &JsonConfig<S>) -> Result<Self, ConfigError> {
        let loaded: Self = config.get(Self::KEY)?.unwrap_or_default();
        loaded.validate()?;
        Ok(loaded)
    }

    /// Validates and stores this config.
    pub fn save<S: ConfigStore>(&self, config: &JsonConfig<S>) -> Result<(), ConfigError> {
        self.validate()?;
        config.put(Self::KEY, self)
    }

    /// Rejects values the pick system cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &'static str| Err(ConfigError::Invalid { field, reason });
        if self.max_depth == 0 {
            return invalid("max_depth", "must be at least 1");
        }
        if self.max_polys_per_leaf == 0 {
            return invalid("max_polys_per_leaf", "must be at least 1");
        }
        for (field, radius) in
            [("default_point_radius", self.default_point_radius), ("default_tube_radius", self.default_tube_radius)]
        {
            if !(radius.is_finite() && radius > 0.0) {
                return invalid(field, "must be finite and positive");
            }
        }
        Ok(())
    }
}

impl Default for PickConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_polys_per_leaf: DEFAULT_POLYS_PER_LEAF,
            auto_tree_min_faces: None,
            default_point_radius: DEFAULT_RADIUS,
            default_tube_radius: DEFAULT_RADIUS,
        }
    }
}

/// Byte storage for config documents.
///
/// Keys are checked with [`check_key`] before they reach a store.
pub trait ConfigStore {
    /// Document stored under `key`, `None` if there is none.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError>;
    /// Replaces the document under `key`.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ConfigError>;
}

/// Why a config could not be read, written, or used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Keys are non-empty ASCII lowercase letters, digits, `-` and `_`.
    #[error("invalid config key {key:?}")]
    BadKey {
        /// Rejected key.
        key: String,
    },
    /// The store failed.
    #[error("config store at {target}: {source}")]
    Io {
        /// Key or location being accessed.
        target: String,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },
    /// Stored document is not valid JSON for the requested type.
    #[error("config {key:?} is malformed: {source}")]
    Malformed {
        /// Offending key.
        key: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// Value has no JSON encoding.
    #[error("config {key:?} could not be encoded: {source}")]
    Encode {
        /// Key being written.
        key: String,
        /// Encoder error.
        #[source]
        source: serde_json::Error,
    },
    /// A field has an unusable value.
    #[error("{field} {reason}")]
    Invalid {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// No directory to keep configs in.
    #[error("no config directory: set ORRERY_CONFIG_DIR or a home directory")]
    NoConfigDir,
}

/// Checks that `key` is usable as a storage key (and as a file stem).
pub fn check_key(key: &str) -> Result<(), ConfigError> {
    let ok = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(ConfigError::BadKey { key: key.to_owned() })
    }
}

/// Typed JSON documents over a [`ConfigStore`].
#[derive(Debug)]
pub struct JsonConfig<S> {
    store: S,
}

impl<S> JsonConfig<S> {
    /// Documents kept in `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Gives the backing store back.
    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> JsonConfig<S> {
    /// Decodes the document under `key`. Absent and empty documents are `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        check_key(key)?;
        match self.store.read(key)? {
            Some(bytes) if !bytes.is_empty() => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|source| ConfigError::Malformed { key: key.to_owned(), source }),
            _ => Ok(None),
        }
    }

    /// Encodes `value` as pretty JSON and stores it under `key`.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), ConfigError> {
        check_key(key)?;
        let mut bytes = serde_json::to_vec_pretty(value)
            .map_err(|source| ConfigError::Encode { key: key.to_owned(), source })?;
        bytes.push(b'\n');
        self.store.write(key, &bytes)
    }
}

/// Store that lives in memory only.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    docs: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl MemoryConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys with a document, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.docs.borrow().keys().cloned().collect()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        Ok(self.docs.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ConfigError> {
        self.docs.borrow_mut().insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    fn with_doc(doc: &[u8]) -> JsonConfig<MemoryConfigStore> {
        let store = MemoryConfigStore::new();
        store.write(PickConfig::KEY, doc).unwrap();
        JsonConfig::new(store)
    }

    #[test]
    fn partial_document_fills_in_defaults() {
        let config = PickConfig::load(&with_doc(br#"{ "max_polys_per_leaf": 12 }"#)).unwrap();
        assert_eq!(config.max_polys_per_leaf, 12);
        assert_eq!(config.max_depth, 256);
        assert_eq!(config.auto_tree_min_faces, None);
    }

    #[test]
    fn absent_and_empty_documents_load_defaults() {
        let config = JsonConfig::new(MemoryConfigStore::new());
        assert_eq!(PickConfig::load(&config).unwrap(), PickConfig::default());
        assert_eq!(PickConfig::load(&with_doc(b"")).unwrap(), PickConfig::default());
    }

    #[test]
    fn malformed_document_names_its_key() {
        match PickConfig::load(&with_doc(b"{ nope")) {
            Err(ConfigError::Malformed { key, .. }) => assert_eq!(key, "pick"),
            other => panic!("expected a malformed document, got {other:?}"),
        }
    }

    #[test]
    fn unusable_values_are_rejected_on_load_and_save() {
        let err = PickConfig::load(&with_doc(br#"{ "max_polys_per_leaf": 0 }"#)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_polys_per_leaf", .. }));

        let config = JsonConfig::new(MemoryConfigStore::new());
        let negative = PickConfig { default_tube_radius: -1.0, ..PickConfig::default() };
        assert!(matches!(negative.save(&config), Err(ConfigError::Invalid { field: "default_tube_radius", .. })));
        assert!(config.store().keys().is_empty());
    }

    #[test]
    fn keys_are_restricted_to_file_safe_names() {
        for key in ["pick", "pick-v2", "tree_3"] {
            assert!(check_key(key).is_ok(), "{key}");
        }
        for key in ["", "../pick", "Pick", "a b", "pick.json"] {
            assert!(matches!(check_key(key), Err(ConfigError::BadKey { .. })), "{key:?}");
        }
        let config = JsonConfig::new(MemoryConfigStore::new());
        assert!(config.put("../escape", &PickConfig::default()).is_err());
    }
}
