//! Configuration loading and parsing for `herald.toml` files.
//!
//! Every section falls back to defaults matching the label scheme used by
//! the Polkadot and Substrate repositories, so an empty or missing file is a
//! valid configuration.
use log::*;
use serde::Deserialize;
use std::{collections::HashSet, path::Path};
use tokio::fs;

use crate::{
    analyzer::{category::Category, priority::PriorityLevel},
    error::{HeraldError, Result},
};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "herald.toml";

/// Default title template for the draft release.
pub const DEFAULT_TITLE_TEMPLATE: &str = "{{ name }} {{ version }}";

/// Default body template for the draft release.
pub const DEFAULT_BODY_TEMPLATE: &str = "{{ notes }}";

/// Names of the labels that silence or categorize a change.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LabelConfig {
    pub silent: String,
    pub runtime: String,
    pub client: String,
    pub api: String,
}

impl LabelConfig {
    /// Label name that routes a change into `category`.
    pub fn category(&self, category: Category) -> &str {
        match category {
            Category::Runtime => &self.runtime,
            Category::Client => &self.client,
            Category::Api => &self.api,
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            silent: "B0-silent".into(),
            runtime: "B7-runtimenoteworthy".into(),
            client: "B5-clientnoteworthy".into(),
            api: "B3-apinoteworthy".into(),
        }
    }
}

/// Label and banner text for one priority level.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PriorityRule {
    pub label: String,
    pub description: String,
}

impl PriorityRule {
    fn new(label: &str, description: &str) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Priority labels and descriptions, one per level.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PriorityConfig {
    pub low: PriorityRule,
    pub medium: PriorityRule,
    pub high: PriorityRule,
    pub critical: PriorityRule,
}

impl PriorityConfig {
    pub fn get(&self, level: PriorityLevel) -> &PriorityRule {
        match level {
            PriorityLevel::Low => &self.low,
            PriorityLevel::Medium => &self.medium,
            PriorityLevel::High => &self.high,
            PriorityLevel::Critical => &self.critical,
        }
    }
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            low: PriorityRule::new(
                "C1-low",
                "Upgrade priority: **Low** (upgrade at your convenience)",
            ),
            medium: PriorityRule::new(
                "C3-medium",
                "Upgrade priority: **Medium** (timely upgrade recommended)",
            ),
            high: PriorityRule::new(
                "C7-high",
                "Upgrade priority:❗ **HIGH** ❗ Please upgrade your node as soon as possible",
            ),
            critical: PriorityRule::new(
                "C9-critical",
                "Upgrade priority: ❗❗ **URGENT** ❗❗ PLEASE UPGRADE IMMEDIATELY",
            ),
        }
    }
}

/// Settings for the primary repository.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PrimaryConfig {
    /// Display name used in the release title. Falls back to the repository
    /// name.
    pub name: Option<String>,
    /// Summary prefixes of changes that never reach the release notes.
    pub excluded_prefixes: Vec<String>,
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            name: None,
            excluded_prefixes: vec!["[contracts]".into(), "contracts:".into()],
        }
    }
}

/// Settings for the dependency repository.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DependencyConfig {
    /// Prefix for dependency change ids in the priority banner. Falls back
    /// to the dependency repository path.
    pub name: Option<String>,
    /// Joins `name` and the change number in the priority banner.
    pub separator: String,
    /// Heading above the dependency sections of the body.
    pub heading: String,
    /// Lockfile in the primary repository that pins the dependency.
    pub lockfile: String,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            name: None,
            separator: "#".into(),
            heading: "Dependency changes".into(),
            lockfile: "Cargo.lock".into(),
        }
    }
}

/// Draft release settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Tera template for the release title.
    pub title: String,
    /// Tera template for the release body.
    pub body: String,
    /// Refuse to publish when the release tag is not a verified signed tag.
    pub require_signed_tag: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE_TEMPLATE.into(),
            body: DEFAULT_BODY_TEMPLATE.into(),
            require_signed_tag: true,
        }
    }
}

/// Matrix room that receives the release announcement.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChatConfig {
    pub homeserver: String,
    /// No announcement is posted when unset.
    pub room_id: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            homeserver: "https://matrix.org".into(),
            room_id: None,
        }
    }
}

/// Root configuration structure for `herald.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub labels: LabelConfig,
    pub priority: PriorityConfig,
    pub primary: PrimaryConfig,
    pub dependency: DependencyConfig,
    pub release: ReleaseConfig,
    pub chat: ChatConfig,
}

impl Config {
    /// Parses and validates configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`, using defaults when the file does
    /// not exist.
    pub async fn load(path: &Path) -> Result<Self> {
        if !fs::try_exists(path).await? {
            info!(
                "no configuration found at {}: using default",
                path.display()
            );
            return Ok(Config::default());
        }

        debug!("loading configuration from {}", path.display());
        let content = fs::read_to_string(path).await?;

        Self::parse(&content)
    }

    /// Every label must be set, and no label may mean two things.
    fn validate(&self) -> Result<()> {
        let mut labels = vec![
            ("labels.silent", self.labels.silent.as_str()),
            ("labels.runtime", self.labels.runtime.as_str()),
            ("labels.client", self.labels.client.as_str()),
            ("labels.api", self.labels.api.as_str()),
        ];

        for level in PriorityLevel::ALL {
            let rule = self.priority.get(level);
            if rule.description.is_empty() {
                return Err(HeraldError::invalid_config(format!(
                    "priority.{level}.description must not be empty"
                )));
            }
            labels.push(("priority", rule.label.as_str()));
        }

        let mut seen = HashSet::new();

        for (field, label) in labels {
            if label.is_empty() {
                return Err(HeraldError::invalid_config(format!(
                    "{field} label must not be empty"
                )));
            }
            if !seen.insert(label) {
                return Err(HeraldError::invalid_config(format!(
                    "label {label} is configured more than once"
                )));
            }
        }

        Ok(())
    }
}
