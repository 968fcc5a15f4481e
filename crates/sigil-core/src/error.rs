// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Sigil.

use thiserror::Error;

/// Top-level error type for all Sigil operations.
#[derive(Debug, Error)]
pub enum SigilError {
    // -- Input validation --
    #[error("invalid input: {0}")]
    Validation(String),

    // -- Document conversion --
    #[error("content conversion failed: {0}")]
    Conversion(String),

    // -- Format writers --
    #[error("format writer failed: {0}")]
    FormatWriter(String),

    // -- File delivery --
    #[error("file delivery failed: {0}")]
    Download(String),

    // -- Batch orchestration --
    #[error("a batch export is already in progress")]
    BatchBusy,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SigilError>;
