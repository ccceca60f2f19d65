//! Merges the primary and dependency analyses into one release body.
use serde::Serialize;

use crate::{
    analyzer::{
        RepositoryAnalysis,
        category::RuleSet,
        change::ChangeRecord,
        priority::PriorityLevel,
    },
    config::Config,
};

/// Composed release body with its priority banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseBody {
    /// Highest priority across both repositories
    pub priority: PriorityLevel,
    /// Priority description, followed by the justifying changes unless the
    /// release is low priority
    pub banner: String,
    /// Ordered change sections without the banner
    pub sections: String,
    /// Banner, a blank line, then the sections
    pub text: String,
}

/// Builds the release body from both analyses. Sections with no changes are
/// left out, and the dependency heading only appears when one of its
/// subsections does.
pub fn compose(
    primary: &RepositoryAnalysis,
    dependency: &RepositoryAnalysis,
    dependency_name: &str,
    config: &Config,
) -> ReleaseBody {
    let priority = primary.final_priority().max(dependency.final_priority());
    let banner =
        banner(priority, primary, dependency, dependency_name, config);
    let sections = sections(primary, dependency, config);
    let text = format!("{banner}\n\n{sections}");

    ReleaseBody {
        priority,
        banner,
        sections,
        text,
    }
}

fn banner(
    priority: PriorityLevel,
    primary: &RepositoryAnalysis,
    dependency: &RepositoryAnalysis,
    dependency_name: &str,
    config: &Config,
) -> String {
    let description = config.priority.get(priority).description.clone();

    if priority == PriorityLevel::Low {
        return description;
    }

    let dependency_ids =
        dependency.justifying_change_ids().iter().map(|id| {
            format!(
                "{dependency_name}{}{}",
                config.dependency.separator,
                id.trim_start_matches('#')
            )
        });

    let ids: Vec<String> = primary
        .justifying_change_ids()
        .iter()
        .cloned()
        .chain(dependency_ids)
        .collect();

    format!("{description} {}", ids.join(" "))
}

fn sections(
    primary: &RepositoryAnalysis,
    dependency: &RepositoryAnalysis,
    config: &Config,
) -> String {
    let mut sections = vec![];

    if !primary.general_changes().is_empty() {
        sections.push(list(primary.general_changes()));
    }

    for category in RuleSet::Primary.categories() {
        let changes = primary.bucket(*category);
        if !changes.is_empty() {
            sections.push(format!(
                "## {}\n\n{}",
                category.heading(),
                list(changes)
            ));
        }
    }

    let dependency_sections: Vec<String> = RuleSet::Dependency
        .categories()
        .iter()
        .filter(|category| !dependency.bucket(**category).is_empty())
        .map(|category| {
            format!(
                "### {}\n\n{}",
                category.heading(),
                list(dependency.bucket(*category))
            )
        })
        .collect();

    if !dependency_sections.is_empty() {
        sections.push(format!("## {}", config.dependency.heading));
        sections.extend(dependency_sections);
    }

    sections.join("\n\n")
}

fn list(changes: &[ChangeRecord]) -> String {
    changes
        .iter()
        .map(|change| format!("* {}", change.summary()))
        .collect::<Vec<String>>()
        .join("\n")
}
