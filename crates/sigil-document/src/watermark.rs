// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Watermark placement planner.
//
// Pure geometry: a `WatermarkConfig` plus a page size produces an ordered
// list of placement instructions. The same plan drives the on-screen
// preview, the PDF renderer, and the Word packager, so the function must be
// fully deterministic — no randomness, no time dependency.
//
// The tiling counts (25 for diagonal, 35 for grid) and their offset
// formulas are contractual output-parity constants, not derived from page
// size. Tests pin the exact numbers.

use sigil_core::types::{WatermarkColor, WatermarkConfig, WatermarkPosition, WatermarkRepeat};
use tracing::debug;

/// One piece of watermark text to draw on a page.
///
/// Coordinates are top-origin (y grows downward, like CSS); the PDF
/// renderer flips them into bottom-origin page space.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkInstruction {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Resolved opacity in the 0..1 range.
    pub opacity: f32,
    pub color: WatermarkColor,
}

/// Plans watermark placements for a page of known size.
pub struct WatermarkPlanner;

impl WatermarkPlanner {
    /// Produce the ordered placement list for one page.
    ///
    /// Returns an empty list when the watermark is disabled.
    pub fn plan(cfg: &WatermarkConfig, page_w: f32, page_h: f32) -> Vec<WatermarkInstruction> {
        if !cfg.enabled {
            return Vec::new();
        }

        let anchors: Vec<(f32, f32)> = match cfg.repeat {
            WatermarkRepeat::None => vec![single_anchor(cfg.position, page_w, page_h)],
            WatermarkRepeat::Diagonal => diagonal_anchors(page_w, page_h),
            WatermarkRepeat::Grid => grid_anchors(page_w, page_h),
        };

        // Persisted configs are not schema-checked; an out-of-range opacity
        // must not push the resolved value past fully opaque.
        let opacity = f32::from(cfg.opacity.min(100)) / 100.0;
        let instructions: Vec<WatermarkInstruction> = anchors
            .into_iter()
            .map(|(x, y)| WatermarkInstruction {
                text: cfg.text.clone(),
                x,
                y,
                rotation: cfg.rotation,
                opacity,
                color: cfg.color,
            })
            .collect();

        debug!(
            repeat = ?cfg.repeat,
            count = instructions.len(),
            "watermark plan computed"
        );
        instructions
    }
}

/// Anchor for the non-repeating mode: page center, or a corner inset by 10%
/// of the page size from the relevant edges.
fn single_anchor(position: WatermarkPosition, w: f32, h: f32) -> (f32, f32) {
    match position {
        WatermarkPosition::Center => (w * 0.5, h * 0.5),
        WatermarkPosition::TopLeft => (w * 0.10, h * 0.10),
        WatermarkPosition::TopRight => (w * 0.90, h * 0.10),
        WatermarkPosition::BottomLeft => (w * 0.10, h * 0.90),
        WatermarkPosition::BottomRight => (w * 0.90, h * 0.90),
    }
}

/// 5x5 virtual grid centred on the page — always exactly 25 anchors.
///
/// Row offsets step 20% of the height, column offsets 25% of the width.
fn diagonal_anchors(w: f32, h: f32) -> Vec<(f32, f32)> {
    let mut anchors = Vec::with_capacity(25);
    for i in -2i32..=2 {
        for j in -2i32..=2 {
            let x = w * (0.5 + j as f32 * 0.25);
            let y = h * (0.5 + i as f32 * 0.20);
            anchors.push((x, y));
        }
    }
    anchors
}

/// 7-column x 5-row grid — always exactly 35 anchors.
fn grid_anchors(w: f32, h: f32) -> Vec<(f32, f32)> {
    let mut anchors = Vec::with_capacity(35);
    for row in 0u32..5 {
        for col in 0u32..7 {
            let x = w * (0.10 + col as f32 * 0.13);
            let y = h * (0.10 + row as f32 * 0.15);
            anchors.push((x, y));
        }
    }
    anchors
}
