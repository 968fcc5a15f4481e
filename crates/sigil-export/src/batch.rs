// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch orchestrator — sequential multi-document export.
//
// Items run strictly one at a time and in submission order. A failed item
// never aborts the batch; it is recorded and the run moves on. Delivery is
// deferred until the end: a single surviving file is saved as-is, two or
// more are bundled into one zip archive, and an all-failure run delivers
// nothing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::Local;
use sigil_core::error::{Result, SigilError};
use sigil_core::types::{BatchExportItem, BatchExportResult, StyleConfig};
use tracing::{info, instrument, warn};

use crate::archive;
use crate::coordinator::{ExportCoordinator, sanitize_name};
use crate::progress::BatchProgressFn;

/// Runs batches of export items through a shared [`ExportCoordinator`].
pub struct BatchOrchestrator {
    coordinator: ExportCoordinator,
    style: StyleConfig,
    busy: AtomicBool,
}

impl BatchOrchestrator {
    pub fn new(coordinator: ExportCoordinator, style: StyleConfig) -> Self {
        Self {
            coordinator,
            style,
            busy: AtomicBool::new(false),
        }
    }

    /// Whether a batch run is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Export every item sequentially, then deliver the combined output.
    ///
    /// Only one run may be active at a time; a second concurrent call fails
    /// fast with [`SigilError::BatchBusy`] without touching any item.
    #[instrument(skip_all, fields(items = items.len()))]
    pub async fn run(
        &self,
        items: &[BatchExportItem],
        progress: Option<BatchProgressFn>,
    ) -> Result<Vec<BatchExportResult>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SigilError::BatchBusy);
        }

        let outcome = self.run_inner(items, progress).await;
        self.busy.store(false, Ordering::Release);
        outcome
    }

    async fn run_inner(
        &self,
        items: &[BatchExportItem],
        progress: Option<BatchProgressFn>,
    ) -> Result<Vec<BatchExportResult>> {
        let total = items.len();
        let mut results = Vec::with_capacity(total);

        for (index, item) in items.iter().enumerate() {
            let started = Instant::now();
            // Item names are caller input; strip path separators before they
            // become delivery paths or zip entry names.
            let filename =
                ensure_extension(&sanitize_name(&item.filename), item.format.extension());

            let attempt = self
                .coordinator
                .export_inner(
                    item.format,
                    &item.html,
                    &self.style,
                    &item.filename,
                    filename,
                    item.watermark.clone(),
                    false,
                )
                .await;

            let result = match attempt {
                Ok(export) => BatchExportResult {
                    id: item.id.clone(),
                    success: true,
                    bytes: Some(export.bytes),
                    filename: Some(export.filename),
                    error: None,
                    export_time_ms: Some(export.export_time_ms),
                },
                Err(err) => {
                    warn!(id = %item.id, %err, "batch item failed");
                    BatchExportResult {
                        id: item.id.clone(),
                        success: false,
                        bytes: None,
                        filename: None,
                        error: Some(err.to_string()),
                        export_time_ms: Some(started.elapsed().as_millis() as u64),
                    }
                }
            };
            results.push(result);

            if let Some(progress) = &progress {
                let percent = (index + 1) as f32 / total as f32 * 100.0;
                progress(percent, &item.filename);
            }
        }

        self.deliver(&results)?;
        Ok(results)
    }

    /// Delivery rule: one survivor ships alone, several ship zipped,
    /// none ships nothing.
    fn deliver(&self, results: &[BatchExportResult]) -> Result<()> {
        let succeeded: Vec<(String, Vec<u8>)> = results
            .iter()
            .filter(|r| r.success)
            .filter_map(|r| Some((r.filename.clone()?, r.bytes.clone()?)))
            .collect();

        match succeeded.len() {
            0 => {
                warn!("batch produced no successful exports, nothing delivered");
                Ok(())
            }
            1 => {
                let (filename, bytes) = &succeeded[0];
                self.coordinator.delivery().save(filename, bytes)
            }
            n => {
                let archive_name =
                    format!("batch_export_{}.zip", Local::now().format("%Y-%m-%d"));
                let bytes = archive::bundle(&succeeded)?;
                info!(files = n, archive_name, "batch bundled into archive");
                self.coordinator.delivery().save(&archive_name, &bytes)
            }
        }
    }
}

/// Append the format extension unless the name already carries it.
fn ensure_extension(filename: &str, extension: &str) -> String {
    let suffix = format!(".{extension}");
    if filename.to_ascii_lowercase().ends_with(&suffix) {
        filename.to_owned()
    } else {
        format!("{filename}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::Arc;

    use crate::delivery::MemoryDelivery;
    use crate::store::MemoryConfigStore;
    use sigil_core::types::ExportFormat;

    fn orchestrator(delivery: Arc<MemoryDelivery>) -> BatchOrchestrator {
        let coordinator =
            ExportCoordinator::new(Arc::new(MemoryConfigStore::default()), delivery);
        BatchOrchestrator::new(coordinator, StyleConfig::default())
    }

    fn item(name: &str, html: &str, format: ExportFormat) -> BatchExportItem {
        BatchExportItem::new(html, name, format)
    }

    #[tokio::test]
    async fn one_failure_does_not_halt_and_single_survivor_ships_alone() {
        let delivery = Arc::new(MemoryDelivery::new());
        let orchestrator = orchestrator(Arc::clone(&delivery));

        let items = vec![
            item("ok", "<p>fine</p>", ExportFormat::Pdf),
            item("bad", "   ", ExportFormat::Pdf),
        ];
        let results = orchestrator.run(&items, None).await.expect("run");

        assert_eq!(results.len(), 2);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert!(results[1].error.as_deref().expect("error").contains("empty"));

        let saved = delivery.saved();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].0.ends_with(".pdf"));
        assert!(saved[0].1.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn two_successes_are_zipped_into_one_archive() {
        let delivery = Arc::new(MemoryDelivery::new());
        let orchestrator = orchestrator(Arc::clone(&delivery));

        let items = vec![
            item("alpha", "<p>a</p>", ExportFormat::Pdf),
            item("beta", "<p>b</p>", ExportFormat::Word),
        ];
        orchestrator.run(&items, None).await.expect("run");

        let saved = delivery.saved();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].0.starts_with("batch_export_"));
        assert!(saved[0].0.ends_with(".zip"));

        let mut archive =
            zip::ZipArchive::new(Cursor::new(saved[0].1.clone())).expect("open zip");
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).expect("entry").name().to_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().any(|n| n.starts_with("alpha") && n.ends_with(".pdf")));
        assert!(names.iter().any(|n| n.starts_with("beta") && n.ends_with(".docx")));
    }

    #[tokio::test]
    async fn item_names_with_path_separators_stay_inside_the_delivery_dir() {
        let root = tempfile::tempdir().expect("tempdir");
        let export_dir = root.path().join("exports");
        let delivery: Arc<dyn crate::delivery::FileDelivery> =
            Arc::new(crate::delivery::DiskDelivery::new(&export_dir));
        let coordinator =
            ExportCoordinator::new(Arc::new(MemoryConfigStore::default()), delivery);
        let orchestrator = BatchOrchestrator::new(coordinator, StyleConfig::default());

        let items = vec![item("../escape", "<p>x</p>", ExportFormat::Pdf)];
        let results = orchestrator.run(&items, None).await.expect("run");
        assert!(results[0].success);

        assert!(export_dir.join(".._escape.pdf").is_file());
        assert!(!root.path().join("escape.pdf").exists());
    }

    #[tokio::test]
    async fn all_failures_deliver_nothing() {
        let delivery = Arc::new(MemoryDelivery::new());
        let orchestrator = orchestrator(Arc::clone(&delivery));

        let items = vec![
            item("a", "", ExportFormat::Pdf),
            item("b", "  ", ExportFormat::Word),
        ];
        let results = orchestrator.run(&items, None).await.expect("run");

        assert!(results.iter().all(|r| !r.success));
        assert_eq!(delivery.save_count(), 0);
    }

    #[tokio::test]
    async fn results_preserve_submission_order() {
        let delivery = Arc::new(MemoryDelivery::new());
        let orchestrator = orchestrator(Arc::clone(&delivery));

        let items = vec![
            item("first", "<p>1</p>", ExportFormat::Pdf),
            item("second", "", ExportFormat::Pdf),
            item("third", "<p>3</p>", ExportFormat::Word),
        ];
        let results = orchestrator.run(&items, None).await.expect("run");

        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        let expected: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn progress_reports_each_completed_item() {
        let delivery = Arc::new(MemoryDelivery::new());
        let orchestrator = orchestrator(delivery);

        let seen: Arc<std::sync::Mutex<Vec<(u32, String)>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let progress: BatchProgressFn = Arc::new(move |percent, label| {
            sink.lock()
                .expect("progress lock")
                .push((percent.round() as u32, label.to_owned()));
        });

        let items = vec![
            item("one", "<p>1</p>", ExportFormat::Pdf),
            item("two", "<p>2</p>", ExportFormat::Pdf),
        ];
        orchestrator.run(&items, Some(progress)).await.expect("run");

        assert_eq!(
            *seen.lock().expect("progress lock"),
            vec![(50, "one".to_owned()), (100, "two".to_owned())]
        );
    }

    #[tokio::test]
    async fn second_concurrent_run_is_rejected() {
        let delivery = Arc::new(MemoryDelivery::new());
        let orchestrator = Arc::new(orchestrator(delivery));

        orchestrator.busy.store(true, Ordering::Release);
        let err = orchestrator
            .run(&[item("x", "<p>x</p>", ExportFormat::Pdf)], None)
            .await
            .expect_err("busy run must be rejected");
        assert!(matches!(err, SigilError::BatchBusy));

        orchestrator.busy.store(false, Ordering::Release);
        assert!(!orchestrator.is_busy());
        orchestrator
            .run(&[item("x", "<p>x</p>", ExportFormat::Pdf)], None)
            .await
            .expect("run succeeds once free");
    }

    #[test]
    fn extension_is_appended_only_when_missing() {
        assert_eq!(ensure_extension("report", "pdf"), "report.pdf");
        assert_eq!(ensure_extension("report.pdf", "pdf"), "report.pdf");
        assert_eq!(ensure_extension("Report.PDF", "pdf"), "Report.PDF");
    }
}
