// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// sigil-document — Document engine for the Sigil exporter.
//
// Provides the HTML block walker, the deterministic watermark planner, the
// paginating PDF renderer (printpdf 0.8), and the Word-HTML packager with
// its MHTML envelope writer.

pub mod pdf;
pub mod walker;
pub mod watermark;
pub mod word;

// Re-export the primary entry points so callers can use
// `sigil_document::PdfPaginator` etc.
pub use pdf::paginator::PdfPaginator;
pub use walker::HtmlWalker;
pub use watermark::{WatermarkInstruction, WatermarkPlanner};
pub use word::packager::WordPackager;
