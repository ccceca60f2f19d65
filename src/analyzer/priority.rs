//! Release urgency levels and the resolver that escalates them.
use log::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    analyzer::{change::ChangeRecord, labels::LabelOracle},
    config::PriorityConfig,
    error::Result,
};

/// Upgrade urgency of a release, ordered from least to most urgent.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl PriorityLevel {
    /// Every level in ascending order.
    pub const ALL: [PriorityLevel; 4] = [
        PriorityLevel::Low,
        PriorityLevel::Medium,
        PriorityLevel::High,
        PriorityLevel::Critical,
    ];
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriorityLevel::Low => "low",
            PriorityLevel::Medium => "medium",
            PriorityLevel::High => "high",
            PriorityLevel::Critical => "critical",
        };
        write!(f, "{name}")
    }
}

/// Outcome of a priority scan over one repository's changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityResolution {
    pub level: PriorityLevel,
    /// Changes that justify `level`, i.e. those seen since the last
    /// escalation.
    pub change_ids: Vec<String>,
}

/// Accumulator threaded through the scan. `None` sits below `Low` so the
/// first change is checked against every level.
#[derive(Debug, Default)]
struct ScanState {
    cursor: Option<PriorityLevel>,
    change_ids: Vec<String>,
}

impl ScanState {
    /// Only levels at or above the cursor are queried for a change. A change
    /// matching the cursor level joins the justification list, a change
    /// matching a higher level replaces it.
    fn advance(
        mut self,
        change: &ChangeRecord,
        oracle: &dyn LabelOracle,
        config: &PriorityConfig,
    ) -> Result<Self> {
        let start = self.cursor;
        let levels =
            PriorityLevel::ALL.into_iter().filter(|l| Some(*l) >= start);

        for level in levels {
            if !oracle.has_label(change, &config.get(level).label)? {
                continue;
            }

            if Some(level) == self.cursor {
                self.change_ids.push(change.id.clone());
            } else if Some(level) > self.cursor {
                debug!("{} escalates priority to {level}", change.id);
                self.change_ids = vec![change.id.clone()];
                self.cursor = Some(level);
            }
        }

        Ok(self)
    }
}

/// Scans changes in order and returns the highest priority found together
/// with the changes justifying it.
pub fn resolve(
    changes: &[ChangeRecord],
    oracle: &dyn LabelOracle,
    config: &PriorityConfig,
) -> Result<PriorityResolution> {
    let state = changes
        .iter()
        .try_fold(ScanState::default(), |state, change| {
            state.advance(change, oracle, config)
        })?;

    Ok(PriorityResolution {
        level: state.cursor.unwrap_or_default(),
        change_ids: state.change_ids,
    })
}
