//! Common functionality shared between release commands
use log::*;
use serde::Serialize;

use crate::{
    analyzer::{
        self,
        category::RuleSet,
        change::{ChangeRecord, filter_excluded},
        composer::{self, ReleaseBody},
        labels::ChangeLabels,
    },
    cli::RangeArgs,
    config::Config,
    error::{HeraldError, Result},
    forge::{manager::ForgeManager, request::GetFileContentRequest},
    lockfile,
    render::{self, ReleaseContext, RenderedRelease},
};

/// Everything needed to publish or display a release.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedRelease {
    pub tag: String,
    pub prerelease: bool,
    pub context: ReleaseContext,
    pub rendered: RenderedRelease,
    pub body: ReleaseBody,
}

/// Fails when the release tag is not a verified signed tag and signed tags
/// are required. Only warns otherwise.
pub async fn verify_release_tag(
    forge: &ForgeManager,
    tag: &str,
    config: &Config,
) -> Result<()> {
    let verification = forge.get_tag_verification(tag).await?;

    if verification.verified {
        info!("tag {tag} has a verified signature");
        return Ok(());
    }

    let reason = verification.reason.unwrap_or_else(|| "unsigned".into());

    if config.release.require_signed_tag {
        error!("tag {tag} failed signature verification: {reason}");
        return Err(HeraldError::UnsignedTag(tag.to_string()));
    }

    warn!("tag {tag} failed signature verification: {reason}");
    Ok(())
}

async fn pinned_dependency_commit(
    primary: &ForgeManager,
    dependency_path: &str,
    lockfile_path: &str,
    git_ref: &str,
) -> Result<String> {
    let content = primary
        .get_file_content(GetFileContentRequest {
            git_ref: Some(git_ref.to_string()),
            path: lockfile_path.to_string(),
        })
        .await?
        .ok_or_else(|| {
            HeraldError::invalid_config(format!(
                "{lockfile_path} not found in {} at {git_ref}",
                primary.repo_path()
            ))
        })?;

    lockfile::pinned_commit(&content, dependency_path)?.ok_or_else(|| {
        HeraldError::invalid_config(format!(
            "{lockfile_path} at {git_ref} does not pin {dependency_path}"
        ))
    })
}

/// Dependency refs for the release, taken from the arguments or from the
/// commits the primary repository's lockfile pins at each end of its range.
pub async fn resolve_dependency_range(
    primary: &ForgeManager,
    dependency: &ForgeManager,
    range: &RangeArgs,
    config: &Config,
) -> Result<(String, String)> {
    if let Some(explicit) = range.dependency_range()? {
        return Ok(explicit);
    }

    let lockfile_path = &config.dependency.lockfile;
    let dependency_path = dependency.repo_path();

    let from = pinned_dependency_commit(
        primary,
        dependency_path,
        lockfile_path,
        &range.from,
    )
    .await?;
    let to = pinned_dependency_commit(
        primary,
        dependency_path,
        lockfile_path,
        &range.to,
    )
    .await?;

    info!("{dependency_path} range from {lockfile_path}: {from}..{to}");

    Ok((from, to))
}

/// Builds the release notes for `range` from both repositories. Nothing is
/// composed unless both repositories were analyzed successfully.
pub async fn prepare_release(
    primary: &ForgeManager,
    dependency: &ForgeManager,
    range: &RangeArgs,
    config: &Config,
) -> Result<PreparedRelease> {
    verify_release_tag(primary, &range.to, config).await?;

    let (dependency_from, dependency_to) =
        resolve_dependency_range(primary, dependency, range, config).await?;

    let primary_changes: Vec<ChangeRecord> = filter_excluded(
        primary.changes_between(&range.from, &range.to).await?,
        &config.primary.excluded_prefixes,
    );
    let dependency_changes = dependency
        .changes_between(&dependency_from, &dependency_to)
        .await?;

    let (primary_labels, dependency_labels) = tokio::try_join!(
        ChangeLabels::fetch(primary, &primary_changes),
        ChangeLabels::fetch(dependency, &dependency_changes),
    )?;

    let primary_analysis = analyzer::analyze(
        &primary_changes,
        &primary_labels,
        config,
        RuleSet::Primary,
    )?;
    let dependency_analysis = analyzer::analyze(
        &dependency_changes,
        &dependency_labels,
        config,
        RuleSet::Dependency,
    )?;

    let dependency_name = config
        .dependency
        .name
        .as_deref()
        .unwrap_or_else(|| dependency.repo_path());

    let body = composer::compose(
        &primary_analysis,
        &dependency_analysis,
        dependency_name,
        config,
    );

    info!("release {} has {} priority", range.to, body.priority);

    let context = ReleaseContext {
        name: config
            .primary
            .name
            .clone()
            .unwrap_or_else(|| primary.remote_config().repo),
        version: range.to.clone(),
        tag: range.to.clone(),
        priority: body.priority,
        banner: body.banner.clone(),
        notes: body.text.clone(),
    };

    let rendered = render::render_release(&config.release, &context)?;

    Ok(PreparedRelease {
        tag: range.to.clone(),
        prerelease: render::is_prerelease(&range.to),
        context,
        rendered,
        body,
    })
}
