// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Sigil document export engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Anchor position for a non-repeating watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Tiling mode for the watermark pattern.
///
/// `position` is only meaningful for `None`; the tiled modes cover the
/// whole page and ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkRepeat {
    None,
    Diagonal,
    Grid,
}

/// Fixed four-entry watermark palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkColor {
    Gray,
    Red,
    Blue,
    Black,
}

impl WatermarkColor {
    /// CSS hex value of this palette entry.
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Gray => "#6b7280",
            Self::Red => "#ef4444",
            Self::Blue => "#3b82f6",
            Self::Black => "#000000",
        }
    }

    /// RGB triple in the 0..1 range, for PDF fill colors.
    pub fn rgb(&self) -> (f32, f32, f32) {
        match self {
            Self::Gray => (0x6b as f32 / 255.0, 0x72 as f32 / 255.0, 0x80 as f32 / 255.0),
            Self::Red => (0xef as f32 / 255.0, 0x44 as f32 / 255.0, 0x44 as f32 / 255.0),
            Self::Blue => (0x3b as f32 / 255.0, 0x82 as f32 / 255.0, 0xf6 as f32 / 255.0),
            Self::Black => (0.0, 0.0, 0.0),
        }
    }
}

/// User-editable watermark settings.
///
/// Persisted as JSON by the config store and loaded as the default for every
/// subsequent export until changed. A missing or malformed record falls back
/// to `Default::default()` — there is no schema versioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    pub enabled: bool,
    pub text: String,
    /// Opacity in percent (0..=100).
    pub opacity: u8,
    /// Font size in px.
    pub font_size: f32,
    /// Rotation in degrees (-90..=90).
    pub rotation: f32,
    pub position: WatermarkPosition,
    pub repeat: WatermarkRepeat,
    pub color: WatermarkColor,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            text: "CONFIDENTIAL".into(),
            opacity: 30,
            font_size: 48.0,
            rotation: -45.0,
            position: WatermarkPosition::Center,
            repeat: WatermarkRepeat::Diagonal,
            color: WatermarkColor::Gray,
        }
    }
}

/// Page margins in pt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Page geometry and base typography for one export call.
///
/// Immutable per export; not persisted by the engine itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Page width in pt.
    pub page_width: f32,
    /// Page height in pt.
    pub page_height: f32,
    pub margins: Margins,
    pub font_family: String,
    /// Body font size in pt.
    pub font_size: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        // A4 portrait in pt, with the 20mm margins used for printed output.
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margins: Margins::uniform(56.7),
            font_family: "Helvetica".into(),
            font_size: 12.0,
        }
    }
}

impl StyleConfig {
    /// Width of the content area between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right
    }
}

/// One semantic block extracted from the input HTML.
///
/// Produced once per export by the HTML walker; consumed read-only by the
/// PDF paginator and the Word packager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentBlock {
    /// Heading level 1..=3. Deeper headings are classified as `Other`.
    Heading { level: u8, text: String },
    Paragraph { text: String },
    /// `ordinal` is set only when the parent list is ordered (1-based).
    ListItem { ordinal: Option<u32>, text: String },
    Quote { text: String },
    Rule,
    Other { text: String },
}

impl DocumentBlock {
    /// Plain-text content of the block (empty for `Rule`).
    pub fn text(&self) -> &str {
        match self {
            Self::Heading { text, .. }
            | Self::Paragraph { text }
            | Self::ListItem { text, .. }
            | Self::Quote { text }
            | Self::Other { text } => text,
            Self::Rule => "",
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Word,
    Pdf,
}

impl ExportFormat {
    /// File extension for the suggested output filename.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Word => "docx",
            Self::Pdf => "pdf",
        }
    }
}

/// Outcome of one successful export.
///
/// Ownership transfers to the caller, who triggers the download and then
/// discards it.
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub export_time_ms: u64,
    pub file_size_bytes: u64,
    /// Page count of the paginated output. The Word path reports 0 because
    /// page flow is delegated to the word processor's own reflow.
    pub page_count: usize,
    pub format: ExportFormat,
}

/// One unit of work submitted to the batch orchestrator.
#[derive(Debug, Clone)]
pub struct BatchExportItem {
    pub id: String,
    pub html: String,
    pub filename: String,
    pub format: ExportFormat,
    /// Overrides the stored watermark config for this item when set.
    pub watermark: Option<WatermarkConfig>,
}

impl BatchExportItem {
    /// Create an item with a generated id.
    pub fn new(html: impl Into<String>, filename: impl Into<String>, format: ExportFormat) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            html: html.into(),
            filename: filename.into(),
            format,
            watermark: None,
        }
    }
}

/// Per-item outcome of a batch export.
///
/// Results are produced in the same order items were submitted; partial
/// failure is normal.
#[derive(Debug, Clone)]
pub struct BatchExportResult {
    pub id: String,
    pub success: bool,
    pub bytes: Option<Vec<u8>>,
    pub filename: Option<String>,
    pub error: Option<String>,
    pub export_time_ms: Option<u64>,
}
