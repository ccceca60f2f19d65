//! Change analysis: priority resolution, audience categorization and
//! composition of the release body.
//!
//! Each repository is analyzed on its own with [`analyze`]. The two
//! resulting [`RepositoryAnalysis`] values are merged only when the body is
//! composed.

use log::*;

use crate::{
    analyzer::{
        category::{Category, Partition, RuleSet},
        change::ChangeRecord,
        labels::LabelOracle,
        priority::{PriorityLevel, PriorityResolution},
    },
    config::Config,
    error::Result,
};

pub mod category;
pub mod change;
pub mod composer;
pub mod labels;
pub mod priority;

/// Analysis output for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryAnalysis {
    pub priority: PriorityResolution,
    pub partition: Partition,
}

impl RepositoryAnalysis {
    pub fn final_priority(&self) -> PriorityLevel {
        self.priority.level
    }

    pub fn justifying_change_ids(&self) -> &[String] {
        &self.priority.change_ids
    }

    pub fn bucket(&self, category: Category) -> &[ChangeRecord] {
        self.partition.bucket(category)
    }

    pub fn general_changes(&self) -> &[ChangeRecord] {
        &self.partition.general
    }
}

/// Runs the priority scan and the category partition over one repository's
/// changes. Silenced changes still take part in the priority scan.
pub fn analyze(
    changes: &[ChangeRecord],
    oracle: &dyn LabelOracle,
    config: &Config,
    rule_set: RuleSet,
) -> Result<RepositoryAnalysis> {
    let priority = priority::resolve(changes, oracle, &config.priority)?;
    let partition =
        category::partition(changes, oracle, &config.labels, rule_set)?;

    info!(
        "analyzed {} changes ({:?}): priority {}, {} silenced",
        changes.len(),
        rule_set,
        priority.level,
        partition.silenced.len()
    );

    Ok(RepositoryAnalysis {
        priority,
        partition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{StaticLabels, change, ids};

    #[test]
    fn silenced_change_still_escalates_priority() {
        let changes = vec![change("a", 1), change("b", 2)];
        let oracle = StaticLabels::default()
            .with(1, &["B0-silent", "C9-critical"])
            .with(2, &["C3-medium"]);

        let analysis =
            analyze(&changes, &oracle, &Config::default(), RuleSet::Primary)
                .unwrap();

        assert_eq!(analysis.final_priority(), PriorityLevel::Critical);
        assert_eq!(analysis.justifying_change_ids(), &["#1".to_string()]);
        assert_eq!(ids(analysis.general_changes()), vec!["#2"]);
    }

    #[test]
    fn every_primary_change_lands_in_exactly_one_place() {
        let changes: Vec<ChangeRecord> =
            (1..=6).map(|n| change("change", n)).collect();
        let oracle = StaticLabels::default()
            .with(1, &["B0-silent"])
            .with(2, &["B7-runtimenoteworthy"])
            .with(3, &["B0-silent", "B7-runtimenoteworthy"])
            .with(5, &["B7-runtimenoteworthy", "C1-low"]);

        let analysis =
            analyze(&changes, &oracle, &Config::default(), RuleSet::Primary)
                .unwrap();

        let runtime = ids(analysis.bucket(Category::Runtime));
        let general = ids(analysis.general_changes());
        let silenced = &analysis.partition.silenced;

        for change in &changes {
            let placements = [
                runtime.contains(&change.id.as_str()),
                general.contains(&change.id.as_str()),
                silenced.contains(&change.id),
            ];
            assert_eq!(placements.iter().filter(|p| **p).count(), 1);
        }
    }
}
