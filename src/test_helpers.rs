//! Common test helper functions shared across test modules.
//!
//! This module provides reusable fixtures for changes, label oracles and
//! mocked forges.
use secrecy::SecretString;
use std::collections::{HashMap, HashSet};

use crate::{
    analyzer::{change::ChangeRecord, labels::LabelOracle},
    cli::RangeArgs,
    error::Result,
    forge::{config::RemoteConfig, manager::ForgeManager, traits::MockForge},
};

/// Creates a test RemoteConfig for `test/repo` on github.com.
pub fn create_test_remote_config() -> RemoteConfig {
    remote_config("test", "repo")
}

fn remote_config(owner: &str, repo: &str) -> RemoteConfig {
    RemoteConfig {
        host: "github.com".to_string(),
        scheme: "https".to_string(),
        owner: owner.to_string(),
        repo: repo.to_string(),
        path: format!("{owner}/{repo}"),
        token: SecretString::from("test-token".to_string()),
        dry_run: false,
    }
}

/// Wraps a mock forge for `test/repo` in a ForgeManager.
pub fn manager_with(mock: MockForge) -> ForgeManager {
    manager_with_path(mock, "test", "repo")
}

/// Wraps a mock forge for `owner/repo` in a ForgeManager.
pub fn manager_with_path(
    mut mock: MockForge,
    owner: &str,
    repo: &str,
) -> ForgeManager {
    let config = remote_config(owner, repo);
    mock.expect_remote_config()
        .returning(move || config.clone());
    ForgeManager::new(Box::new(mock))
}

/// Release range `v0.9.2..v0.9.3` with an optional explicit dependency
/// range.
pub fn range_args(dependency: Option<(&str, &str)>) -> RangeArgs {
    RangeArgs {
        from: "v0.9.2".into(),
        to: "v0.9.3".into(),
        dependency_from: dependency.map(|(from, _)| from.to_string()),
        dependency_to: dependency.map(|(_, to)| to.to_string()),
    }
}

/// Creates a change whose summary is `title (#number)`.
pub fn change(title: &str, number: u64) -> ChangeRecord {
    ChangeRecord {
        raw_text: format!("{title} (#{number})"),
        id: format!("#{number}"),
        number,
    }
}

/// Identifiers of the given changes, in order.
pub fn ids(changes: &[ChangeRecord]) -> Vec<&str> {
    changes.iter().map(|c| c.id.as_str()).collect()
}

/// In-memory label oracle. Changes without labels answer `false`.
#[derive(Debug, Default)]
pub struct StaticLabels {
    labels: HashMap<u64, HashSet<String>>,
}

impl StaticLabels {
    pub fn with(mut self, number: u64, labels: &[&str]) -> Self {
        self.labels
            .entry(number)
            .or_default()
            .extend(labels.iter().map(|l| l.to_string()));
        self
    }
}

impl LabelOracle for StaticLabels {
    fn has_label(&self, change: &ChangeRecord, label: &str) -> Result<bool> {
        Ok(self
            .labels
            .get(&change.number)
            .is_some_and(|labels| labels.contains(label)))
    }
}
