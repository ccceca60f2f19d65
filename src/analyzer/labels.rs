//! Label lookups for changes.
use futures::{StreamExt, TryStreamExt, stream};
use log::*;
use std::collections::{HashMap, HashSet};

use crate::{
    analyzer::change::ChangeRecord,
    error::{HeraldError, Result},
    forge::manager::ForgeManager,
};

/// Maximum number of label requests in flight at once.
const LABEL_LOOKUP_CONCURRENCY: usize = 8;

/// Answers whether a named label is attached to a change.
#[cfg_attr(test, mockall::automock)]
pub trait LabelOracle {
    fn has_label(&self, change: &ChangeRecord, label: &str) -> Result<bool>;
}

/// Labels of every change in a range, fetched ahead of the analysis pass.
#[derive(Debug, Default, Clone)]
pub struct ChangeLabels {
    labels: HashMap<u64, HashSet<String>>,
}

impl ChangeLabels {
    /// Fetches labels for all changes concurrently. Results are collected in
    /// input order and any failed lookup fails the whole fetch.
    pub async fn fetch(
        forge: &ForgeManager,
        changes: &[ChangeRecord],
    ) -> Result<Self> {
        info!(
            "fetching labels for {} changes in {}",
            changes.len(),
            forge.repo_path()
        );

        let lookups = changes.iter().map(|change| async move {
            forge
                .get_labels(change.number)
                .await
                .map(|labels| (change.number, labels))
                .map_err(|err| HeraldError::lookup(&change.id, err.to_string()))
        });

        let fetched: Vec<(u64, Vec<String>)> = stream::iter(lookups)
            .buffered(LABEL_LOOKUP_CONCURRENCY)
            .try_collect()
            .await?;

        let labels = fetched
            .into_iter()
            .map(|(number, labels)| (number, labels.into_iter().collect()))
            .collect();

        Ok(Self { labels })
    }
}

impl LabelOracle for ChangeLabels {
    fn has_label(&self, change: &ChangeRecord, label: &str) -> Result<bool> {
        let labels = self.labels.get(&change.number).ok_or_else(|| {
            HeraldError::lookup(&change.id, "labels were never fetched")
        })?;

        Ok(labels.contains(label))
    }
}
