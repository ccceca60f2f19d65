//! Traits related to remote git forges
use async_trait::async_trait;

use crate::{
    error::Result,
    forge::{
        config::RemoteConfig,
        request::{
            CreateReleaseRequest, GetFileContentRequest, RangeRequest,
            TagVerification,
        },
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Forge: Send + Sync {
    fn remote_config(&self) -> RemoteConfig;
    /// First line of every commit message in the range, in log order
    /// (newest first).
    async fn get_commit_summaries(
        &self,
        req: RangeRequest,
    ) -> Result<Vec<String>>;
    /// Names of the labels attached to a pull request.
    async fn get_labels(&self, number: u64) -> Result<Vec<String>>;
    async fn get_file_content(
        &self,
        req: GetFileContentRequest,
    ) -> Result<Option<String>>;
    async fn get_tag_verification(&self, tag: &str) -> Result<TagVerification>;
    /// Creates a draft release and returns its web URL.
    async fn create_draft_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<String>;
}
