// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export coordinator — the single entry point per output format.
//
// Owns progress reporting, the read-once watermark config snapshot, error
// translation, and file delivery. Document generation is CPU-bound and runs
// through `tokio::task::spawn_blocking`. The coordinator performs no
// retries; retry, if any, is the caller's responsibility.

use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use sigil_core::error::{Result, SigilError};
use sigil_core::types::{ExportFormat, ExportResult, StyleConfig, WatermarkConfig};
use sigil_document::{HtmlWalker, PdfPaginator, WordPackager};
use tracing::{info, instrument, warn};

use crate::delivery::FileDelivery;
use crate::progress::{ProgressFn, ProgressStage};
use crate::store::ConfigRepository;

/// Fallback document name when the caller provides no usable title.
const FALLBACK_NAME: &str = "document";

/// Coordinates one export at a time from HTML to a delivered file.
#[derive(Clone)]
pub struct ExportCoordinator {
    config_store: Arc<dyn ConfigRepository>,
    delivery: Arc<dyn FileDelivery>,
    progress: Option<ProgressFn>,
}

impl ExportCoordinator {
    pub fn new(config_store: Arc<dyn ConfigRepository>, delivery: Arc<dyn FileDelivery>) -> Self {
        Self {
            config_store,
            delivery,
            progress: None,
        }
    }

    /// Attach a progress observer. Stages are advisory UI feedback only.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Export to the word-processor package format and deliver the file.
    pub async fn export_word(
        &self,
        html: &str,
        style: &StyleConfig,
        title: &str,
    ) -> Result<ExportResult> {
        let filename = build_filename(title, ExportFormat::Word.extension());
        self.export_inner(ExportFormat::Word, html, style, title, filename, None, true)
            .await
    }

    /// Export to the paginated PDF format and deliver the file.
    pub async fn export_pdf(
        &self,
        html: &str,
        style: &StyleConfig,
        title: &str,
    ) -> Result<ExportResult> {
        let filename = build_filename(title, ExportFormat::Pdf.extension());
        self.export_inner(ExportFormat::Pdf, html, style, title, filename, None, true)
            .await
    }

    /// Shared export pipeline.
    ///
    /// `deliver = false` skips the save step so the batch orchestrator can
    /// collect bytes and bundle them itself.
    #[instrument(skip_all, fields(format = ?format, html_len = html.len()))]
    pub(crate) async fn export_inner(
        &self,
        format: ExportFormat,
        html: &str,
        style: &StyleConfig,
        title: &str,
        filename: String,
        watermark_override: Option<WatermarkConfig>,
        deliver: bool,
    ) -> Result<ExportResult> {
        let started = Instant::now();

        // Validation happens before any writer or delivery work.
        if html.trim().is_empty() {
            warn!("export rejected: empty HTML input");
            return Err(SigilError::Validation("document HTML is empty".into()));
        }

        self.stage(ProgressStage::Preparing);
        // Read-once snapshot: a config change made by the user during a
        // long batch does not affect in-flight items.
        let watermark = match watermark_override {
            Some(cfg) => cfg,
            None => self.config_store.load(),
        };

        self.stage(ProgressStage::Converting);
        let blocks = HtmlWalker::walk(html)?;

        self.stage(ProgressStage::Generating);
        let style = style.clone();
        let owned_title = title.to_owned();
        let (bytes, page_count) = tokio::task::spawn_blocking(move || match format {
            ExportFormat::Pdf => {
                PdfPaginator::new(&style, &watermark).render(&blocks, &owned_title)
            }
            ExportFormat::Word => WordPackager::new(&style, &watermark)
                .package(&blocks, &owned_title)
                // Page flow is delegated to the word processor's reflow, so
                // the Word path has no page count of its own.
                .map(|bytes| (bytes, 0)),
        })
        .await
        .map_err(|e| SigilError::FormatWriter(format!("generation task failed: {e}")))??;

        self.stage(ProgressStage::Delivering);
        if deliver {
            self.delivery.save(&filename, &bytes)?;
        }

        self.stage(ProgressStage::Done);
        let export_time_ms = started.elapsed().as_millis() as u64;
        info!(filename, export_time_ms, page_count, "export finished");

        Ok(ExportResult {
            file_size_bytes: bytes.len() as u64,
            bytes,
            filename,
            export_time_ms,
            page_count,
            format,
        })
    }

    pub(crate) fn delivery(&self) -> Arc<dyn FileDelivery> {
        Arc::clone(&self.delivery)
    }

    fn stage(&self, stage: ProgressStage) {
        if let Some(progress) = &self.progress {
            progress(stage);
        }
    }
}

/// Suggested filename: `{title|fallback}_{YYYY-MM-DD}.{ext}`.
pub(crate) fn build_filename(title: &str, extension: &str) -> String {
    let name = sanitize_name(title);
    let date = Local::now().format("%Y-%m-%d");
    format!("{name}_{date}.{extension}")
}

/// Strip path separators and control characters from a provided name.
pub(crate) fn sanitize_name(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() {
        FALLBACK_NAME.into()
    } else {
        cleaned
    }
}
