// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config documents as `<key>.json` files in one directory.
//!
//! The directory is `$ORRERY_CONFIG_DIR` when set, else the platform config
//! directory (`~/.config/orrery` on Linux). Writes go to a sibling `.tmp`
//! file that is renamed over the target, so readers never see half a file.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use orrery_pick::config::{check_key, ConfigError, ConfigStore};

/// Overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "ORRERY_CONFIG_DIR";

/// [`ConfigStore`] over a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    dir: PathBuf,
}

impl FsConfigStore {
    /// Store in `$ORRERY_CONFIG_DIR` or the platform config directory.
    pub fn discover() -> Result<Self, ConfigError> {
        Self::open(resolve_dir(std::env::var_os(CONFIG_DIR_ENV))?)
    }

    /// Store in `dir`, which is created if missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| dir_error(&dir, source))?;
        Ok(Self { dir })
    }

    /// Directory holding the files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`. Fails for keys [`check_key`] rejects.
    pub fn file(&self, key: &str) -> Result<PathBuf, ConfigError> {
        check_key(key)?;
        Ok(self.dir.join(key).with_extension("json"))
    }

    /// Keys that have a file, sorted. Stray files are ignored.
    pub fn keys(&self) -> Result<Vec<String>, ConfigError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| dir_error(&self.dir, source))?;
        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|source| dir_error(&self.dir, source))?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    if check_key(stem).is_ok() {
                        keys.push(stem.to_owned());
                    }
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn dir_error(dir: &Path, source: io::Error) -> ConfigError {
    ConfigError::Io { target: dir.display().to_string(), source }
}

fn resolve_dir(env_override: Option<OsString>) -> Result<PathBuf, ConfigError> {
    match env_override {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => ProjectDirs::from("dev", "flyingrobots", "orrery")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir),
    }
}

impl ConfigStore for FsConfigStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        match fs::read(self.file(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io { target: key.to_owned(), source }),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ConfigError> {
        let target = self.file(key)?;
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, bytes)
            .and_then(|()| fs::rename(&staging, &target))
            .map_err(|source| ConfigError::Io { target: key.to_owned(), source })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn override_wins_unless_empty() {
        assert_eq!(resolve_dir(Some("/srv/orrery".into())).unwrap(), PathBuf::from("/srv/orrery"));
        // Empty falls through to the platform directory, which may not exist in CI.
        if let Ok(dir) = resolve_dir(Some(OsString::new())) {
            assert_ne!(dir, PathBuf::new());
        }
    }
}
