//! Audience categories and the partitioner that routes changes into them.
use log::*;
use std::collections::BTreeMap;

use crate::{
    analyzer::{change::ChangeRecord, labels::LabelOracle},
    config::LabelConfig,
    error::Result,
};

/// Audience-facing release note sections, in the order they are checked and
/// rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Runtime,
    Client,
    Api,
}

impl Category {
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Runtime => "Runtime",
            Category::Client => "Client",
            Category::Api => "API",
        }
    }
}

/// Categorization rules for one side of the release.
///
/// The primary repository only singles out runtime changes and lists
/// everything else under general changes. The dependency repository
/// recognizes every category, lets a change appear in several of them and
/// drops changes that match none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    Primary,
    Dependency,
}

impl RuleSet {
    pub fn categories(&self) -> &'static [Category] {
        match self {
            RuleSet::Primary => &[Category::Runtime],
            RuleSet::Dependency => {
                &[Category::Runtime, Category::Client, Category::Api]
            }
        }
    }

    fn keeps_uncategorized(&self) -> bool {
        matches!(self, RuleSet::Primary)
    }
}

/// Changes of one repository routed into release note sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub categorized: BTreeMap<Category, Vec<ChangeRecord>>,
    pub general: Vec<ChangeRecord>,
    /// Ids of changes removed by the silent label
    pub silenced: Vec<String>,
}

impl Partition {
    /// Changes in a category bucket, empty when none matched.
    pub fn bucket(&self, category: Category) -> &[ChangeRecord] {
        self.categorized
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Routes each change into the buckets its labels select. Silenced changes
/// are never queried for categories.
pub fn partition(
    changes: &[ChangeRecord],
    oracle: &dyn LabelOracle,
    labels: &LabelConfig,
    rule_set: RuleSet,
) -> Result<Partition> {
    let mut result = Partition::default();

    for change in changes {
        if oracle.has_label(change, &labels.silent)? {
            debug!("change {} is silenced", change.id);
            result.silenced.push(change.id.clone());
            continue;
        }

        let mut matched = false;

        for category in rule_set.categories() {
            if oracle.has_label(change, labels.category(*category))? {
                result
                    .categorized
                    .entry(*category)
                    .or_default()
                    .push(change.clone());
                matched = true;
            }
        }

        if !matched && rule_set.keeps_uncategorized() {
            result.general.push(change.clone());
        }
    }

    Ok(result)
}
