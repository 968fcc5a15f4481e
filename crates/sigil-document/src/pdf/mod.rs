// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — paginating renderer and glyph fallback for the builtin-font
// character set.

pub mod glyphs;
pub mod paginator;

pub use paginator::PdfPaginator;
