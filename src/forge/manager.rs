//! Manager that wraps forge implementations
use log::*;

use crate::{
    analyzer::change::{ChangeRecord, parse_changes},
    error::{HeraldError, Result},
    forge::{
        config::RemoteConfig,
        request::{
            CreateReleaseRequest, GetFileContentRequest, RangeRequest,
            TagVerification,
        },
        traits::Forge,
    },
};

pub struct ForgeManager {
    forge: Box<dyn Forge>,
    remote_config: RemoteConfig,
}

impl ForgeManager {
    pub fn new(forge: Box<dyn Forge>) -> Self {
        let remote_config = forge.remote_config();
        Self {
            forge,
            remote_config,
        }
    }

    pub fn remote_config(&self) -> RemoteConfig {
        self.remote_config.clone()
    }

    /// Repository path in `owner/name` form.
    pub fn repo_path(&self) -> &str {
        &self.remote_config.path
    }

    /// Merged changes between two refs in log order. Commits without a
    /// trailing change id are dropped.
    pub async fn changes_between(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Vec<ChangeRecord>> {
        debug!("getting changes for {} from {from} to {to}", self.repo_path());

        let summaries = self
            .forge
            .get_commit_summaries(RangeRequest {
                from: from.to_string(),
                to: to.to_string(),
            })
            .await?;

        let changes = parse_changes(summaries);

        info!(
            "found {} merged changes in {} between {from} and {to}",
            changes.len(),
            self.repo_path()
        );

        Ok(changes)
    }

    pub async fn get_labels(&self, number: u64) -> Result<Vec<String>> {
        self.forge.get_labels(number).await
    }

    pub async fn get_file_content(
        &self,
        req: GetFileContentRequest,
    ) -> Result<Option<String>> {
        self.forge.get_file_content(req).await
    }

    pub async fn get_tag_verification(
        &self,
        tag: &str,
    ) -> Result<TagVerification> {
        self.forge.get_tag_verification(tag).await
    }

    /// Creates the draft release, classifying any failure as a publish
    /// failure.
    pub async fn create_draft_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<String> {
        if self.remote_config.dry_run {
            warn!("dry_run: would create draft release: req: {:#?}", req);
            return Ok(format!(
                "{}/releases/tag/{}",
                self.remote_config.web_url(),
                req.tag
            ));
        }

        self.forge
            .create_draft_release(req)
            .await
            .map_err(|err| match err {
                HeraldError::PublishFailure(_) => err,
                other => HeraldError::publish(other.to_string()),
            })
    }
}
