// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Archive packaging — bundles multiple export files into one zip.

use std::io::{Cursor, Write};

use sigil_core::error::{Result, SigilError};
use tracing::{debug, instrument};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Bundle `(filename, bytes)` entries into a single zip archive.
///
/// Duplicate filenames get a numeric suffix so no entry is silently
/// overwritten.
#[instrument(skip_all, fields(entries = entries.len()))]
pub fn bundle(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut seen: Vec<String> = Vec::new();
    for (name, bytes) in entries {
        let entry_name = dedupe_name(name, &seen);
        seen.push(entry_name.clone());

        writer
            .start_file(&entry_name, options)
            .map_err(|e| SigilError::FormatWriter(format!("zip entry {entry_name}: {e}")))?;
        writer
            .write_all(bytes)
            .map_err(|e| SigilError::FormatWriter(format!("zip write {entry_name}: {e}")))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| SigilError::FormatWriter(format!("zip finish: {e}")))?;

    let bytes = cursor.into_inner();
    debug!(bytes = bytes.len(), "archive bundled");
    Ok(bytes)
}

/// Append ` (n)` before the extension until the name is unique.
fn dedupe_name(name: &str, seen: &[String]) -> String {
    if !seen.iter().any(|s| s == name) {
        return name.to_owned();
    }

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (name, None),
    };

    for n in 1.. {
        let candidate = match ext {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        };
        if !seen.iter().any(|s| *s == candidate) {
            return candidate;
        }
    }
    unreachable!()
}
