// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress reporting for exports.
//
// Stages form a monotonically increasing sequence with one fixed percentage
// per milestone. Progress is advisory UI feedback only — it carries no
// backpressure or cancellation semantics.

use std::sync::Arc;

/// The four export milestones plus completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProgressStage {
    /// Request validated, config snapshot taken.
    Preparing,
    /// HTML converted into the block list.
    Converting,
    /// Format writer producing the output bytes.
    Generating,
    /// File handed to delivery.
    Delivering,
    Done,
}

impl ProgressStage {
    /// Fixed percentage reported for this stage.
    pub fn percent(&self) -> u8 {
        match self {
            Self::Preparing => 0,
            Self::Converting => 20,
            Self::Generating => 60,
            Self::Delivering => 90,
            Self::Done => 100,
        }
    }
}

/// Observer for single-export progress.
pub type ProgressFn = Arc<dyn Fn(ProgressStage) + Send + Sync>;

/// Observer for batch progress: `(overall_percent, current_item_label)`.
pub type BatchProgressFn = Arc<dyn Fn(f32, &str) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_match_fixed_milestones() {
        assert_eq!(ProgressStage::Preparing.percent(), 0);
        assert_eq!(ProgressStage::Converting.percent(), 20);
        assert_eq!(ProgressStage::Generating.percent(), 60);
        assert_eq!(ProgressStage::Delivering.percent(), 90);
        assert_eq!(ProgressStage::Done.percent(), 100);
    }

    #[test]
    fn stages_are_strictly_ordered() {
        let stages = [
            ProgressStage::Preparing,
            ProgressStage::Converting,
            ProgressStage::Generating,
            ProgressStage::Delivering,
            ProgressStage::Done,
        ];
        for pair in stages.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].percent() < pair[1].percent());
        }
    }
}
