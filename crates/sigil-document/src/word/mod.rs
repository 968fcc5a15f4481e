// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word module — Word-HTML packaging and the MHTML envelope writer.

pub mod envelope;
pub mod packager;

pub use packager::WordPackager;
