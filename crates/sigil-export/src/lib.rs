// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sigil-export — Export orchestration for the Sigil engine.
//
// Provides the per-format export coordinator (progress reporting, error
// translation, file delivery), the sequential batch orchestrator with
// archive bundling, and the watermark config repository.

pub mod archive;
pub mod batch;
pub mod coordinator;
pub mod delivery;
pub mod progress;
pub mod store;

pub use batch::BatchOrchestrator;
pub use coordinator::ExportCoordinator;
pub use delivery::{DiskDelivery, FileDelivery, MemoryDelivery};
pub use progress::ProgressStage;
pub use store::{ConfigRepository, FileConfigStore, MemoryConfigStore};
