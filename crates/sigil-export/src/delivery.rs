// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File delivery — the save-as seam at the end of an export.
//
// The coordinator hands finished bytes to a `FileDelivery`; production code
// writes to disk, tests record calls for assertions.

use std::path::PathBuf;
use std::sync::Mutex;

use sigil_core::error::{Result, SigilError};
use tracing::{info, instrument};

/// Destination for finished export files.
pub trait FileDelivery: Send + Sync {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<()>;
}

/// Writes delivered files into a target directory.
pub struct DiskDelivery {
    dir: PathBuf,
}

impl DiskDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FileDelivery for DiskDelivery {
    #[instrument(skip(self, bytes), fields(bytes_len = bytes.len()))]
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| SigilError::Download(format!("create output dir: {e}")))?;

        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)
            .map_err(|e| SigilError::Download(format!("write {}: {e}", path.display())))?;

        info!("saved export to {}", path.display());
        Ok(())
    }
}

/// Records every delivered file in memory. Used by tests to count calls and
/// inspect delivered bytes.
#[derive(Default)]
pub struct MemoryDelivery {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of `(filename, bytes)` pairs in delivery order.
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().expect("delivery lock poisoned").clone()
    }

    pub fn save_count(&self) -> usize {
        self.saved.lock().expect("delivery lock poisoned").len()
    }
}

impl FileDelivery for MemoryDelivery {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<()> {
        self.saved
            .lock()
            .expect("delivery lock poisoned")
            .push((filename.to_owned(), bytes.to_vec()));
        Ok(())
    }
}
