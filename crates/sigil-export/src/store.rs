// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Watermark config repository.
//
// The last-used watermark configuration is persisted as one JSON record and
// loaded as the default for subsequent exports. Coordinators read the store
// exactly once per export call, so a change made mid-batch never affects
// in-flight items.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sigil_core::error::Result;
use sigil_core::types::WatermarkConfig;
use tracing::{debug, info, warn};

/// Storage seam for the last-used watermark configuration.
///
/// A missing or malformed record falls back to the hard-coded default —
/// there is no schema versioning.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> WatermarkConfig;
    fn save(&self, cfg: &WatermarkConfig) -> Result<()>;
}

/// In-memory store, the default for tests and embedding callers.
#[derive(Default)]
pub struct MemoryConfigStore {
    inner: Mutex<WatermarkConfig>,
}

impl MemoryConfigStore {
    pub fn new(cfg: WatermarkConfig) -> Self {
        Self {
            inner: Mutex::new(cfg),
        }
    }
}

impl ConfigRepository for MemoryConfigStore {
    fn load(&self) -> WatermarkConfig {
        self.inner.lock().expect("config lock poisoned").clone()
    }

    fn save(&self, cfg: &WatermarkConfig) -> Result<()> {
        *self.inner.lock().expect("config lock poisoned") = cfg.clone();
        Ok(())
    }
}

/// File-backed store persisting pretty-printed JSON.
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the conventional location inside the app data directory.
    pub fn default_location() -> Self {
        Self::new(data_dir().join("watermark.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigRepository for FileConfigStore {
    fn load(&self) -> WatermarkConfig {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(cfg) => {
                    debug!(path = %self.path.display(), "watermark config loaded");
                    cfg
                }
                Err(e) => {
                    warn!(path = %self.path.display(), "malformed watermark config, using defaults: {e}");
                    WatermarkConfig::default()
                }
            },
            Err(_) => WatermarkConfig::default(),
        }
    }

    fn save(&self, cfg: &WatermarkConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(cfg)?;
        std::fs::write(&self.path, json)?;
        info!(path = %self.path.display(), "watermark config saved");
        Ok(())
    }
}

/// Return the application data directory, creating it if needed.
///
/// Tries XDG data dir, then the home directory, then /tmp as last resort.
pub fn data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from("/tmp")
    };
    let dir = base.join("sigil");
    std::fs::create_dir_all(&dir).ok();
    dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_core::types::{WatermarkColor, WatermarkRepeat};

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryConfigStore::default();
        let mut cfg = WatermarkConfig::default();
        cfg.text = "INTERNAL".into();
        cfg.color = WatermarkColor::Red;

        store.save(&cfg).expect("save");
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn file_store_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileConfigStore::new(dir.path().join("watermark.json"));

        let mut cfg = WatermarkConfig::default();
        cfg.repeat = WatermarkRepeat::Grid;
        cfg.opacity = 55;

        store.save(&cfg).expect("save");
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileConfigStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load(), WatermarkConfig::default());
    }

    #[test]
    fn malformed_file_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("watermark.json");
        std::fs::write(&path, "{broken").expect("write");

        let store = FileConfigStore::new(path);
        assert_eq!(store.load(), WatermarkConfig::default());
    }
}
