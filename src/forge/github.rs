//! Implements the Forge trait for Github
use async_trait::async_trait;
use log::*;
use octocrab::Octocrab;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{
    error::{HeraldError, Result},
    forge::{
        config::{DEFAULT_PAGE_SIZE, RemoteConfig},
        request::{
            CreateReleaseRequest, GetFileContentRequest, RangeRequest,
            TagVerification,
        },
        traits::Forge,
    },
};

#[derive(Debug, Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

#[derive(Debug, Deserialize)]
struct CompareCommitDetail {
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct CompareCommit {
    pub sha: String,
    pub commit: CompareCommitDetail,
}

#[derive(Debug, Deserialize)]
struct CompareResponse {
    pub total_commits: u64,
    pub commits: Vec<CompareCommit>,
}

#[derive(Debug, Deserialize)]
struct IssueLabel {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    pub sha: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    pub object: RefObject,
}

#[derive(Debug, Deserialize)]
struct Verification {
    pub verified: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitTag {
    pub verification: Option<Verification>,
}

/// Status code of a failed GitHub API call, if the API answered at all.
fn github_status(err: &octocrab::Error) -> Option<StatusCode> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code),
        _ => None,
    }
}

/// Compare answers 404 for unknown refs and 422 for unrelated histories.
fn is_unresolvable_range(status: Option<StatusCode>) -> bool {
    matches!(
        status,
        Some(StatusCode::NOT_FOUND) | Some(StatusCode::UNPROCESSABLE_ENTITY)
    )
}

/// Whether every commit of the comparison has been collected. An empty page
/// also ends the walk.
fn compare_complete(fetched: usize, collected: usize, total: u64) -> bool {
    fetched == 0 || collected as u64 >= total
}

/// First message line of each commit, newest first. Compare lists commits
/// oldest first.
fn summaries_in_log_order(commits: Vec<CompareCommit>) -> Vec<String> {
    commits
        .into_iter()
        .rev()
        .map(|commit| {
            let summary = commit
                .commit
                .message
                .lines()
                .next()
                .unwrap_or_default()
                .to_string();
            trace!("{}: {summary}", commit.sha);
            summary
        })
        .collect()
}

/// Sha of the tag object behind a ref. Lightweight tags point straight at a
/// commit and have none.
fn annotated_tag_sha(git_ref: GitRef) -> Option<String> {
    (git_ref.object.kind == "tag").then_some(git_ref.object.sha)
}

fn tag_verification(git_tag: GitTag) -> TagVerification {
    let verification = git_tag.verification.unwrap_or(Verification {
        verified: false,
        reason: Some("unsigned".into()),
    });

    TagVerification {
        annotated: true,
        verified: verification.verified,
        reason: verification.reason,
    }
}

/// GitHub forge implementation using Octocrab for API interactions with
/// commit history, labels, tags and releases.
pub struct Github {
    config: RemoteConfig,
    base_uri: String,
    instance: Octocrab,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL configuration.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_uri = if config.host == "github.com" {
            format!("{}://api.{}", config.scheme, config.host)
        } else {
            // GitHub Enterprise serves the API under /api/v3
            format!("{}://{}/api/v3", config.scheme, config.host)
        };

        let instance = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(base_uri.clone())?
            .build()?;

        Ok(Self {
            config,
            base_uri,
            instance,
        })
    }

    fn repo_endpoint(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{suffix}",
            self.base_uri, self.config.owner, self.config.repo
        )
    }

    fn range_error(&self, req: &RangeRequest, reason: String) -> HeraldError {
        HeraldError::range(&self.config.path, &req.from, &req.to, reason)
    }

    async fn compare_page(
        &self,
        req: &RangeRequest,
        page: u32,
    ) -> Result<CompareResponse> {
        let endpoint =
            self.repo_endpoint(&format!("compare/{}...{}", req.from, req.to));
        let params = PageParams {
            per_page: DEFAULT_PAGE_SIZE,
            page,
        };

        self.instance
            .get(endpoint, Some(&params))
            .await
            .map_err(|err| {
                if is_unresolvable_range(github_status(&err)) {
                    self.range_error(req, err.to_string())
                } else {
                    err.into()
                }
            })
    }
}

#[async_trait]
impl Forge for Github {
    fn remote_config(&self) -> RemoteConfig {
        self.config.clone()
    }

    async fn get_commit_summaries(
        &self,
        req: RangeRequest,
    ) -> Result<Vec<String>> {
        let mut commits: Vec<CompareCommit> = vec![];
        let mut page = 1;

        loop {
            let response = self.compare_page(&req, page).await?;
            let fetched = response.commits.len();
            commits.extend(response.commits);

            debug!(
                "fetched {} of {} commits for {}...{}",
                commits.len(),
                response.total_commits,
                req.from,
                req.to
            );

            if compare_complete(fetched, commits.len(), response.total_commits)
            {
                break;
            }

            page += 1;
        }

        info!(
            "found {} commits between {} and {} in {}",
            commits.len(),
            req.from,
            req.to,
            self.config.path
        );

        Ok(summaries_in_log_order(commits))
    }

    async fn get_labels(&self, number: u64) -> Result<Vec<String>> {
        let endpoint = self.repo_endpoint(&format!("issues/{number}/labels"));
        let params = PageParams {
            per_page: DEFAULT_PAGE_SIZE,
            page: 1,
        };

        let labels: Vec<IssueLabel> =
            self.instance.get(endpoint, Some(&params)).await?;

        Ok(labels.into_iter().map(|label| label.name).collect())
    }

    async fn get_file_content(
        &self,
        req: GetFileContentRequest,
    ) -> Result<Option<String>> {
        let repos = self.instance.repos(&self.config.owner, &self.config.repo);
        let mut builder = repos.get_content().path(&req.path);

        if let Some(git_ref) = &req.git_ref {
            builder = builder.r#ref(git_ref);
        }

        match builder.send().await {
            Err(err) if github_status(&err) == Some(StatusCode::NOT_FOUND) => {
                info!("no file found for path: {}", req.path);
                Ok(None)
            }
            Err(err) => {
                let msg = format!(
                    "encountered error getting file contents for path: {}: {err}",
                    req.path
                );
                error!("{msg}");
                Err(HeraldError::forge(msg))
            }
            Ok(mut data) => {
                let items = data.take_items();

                if items.is_empty() {
                    info!("no file found for path: {}", req.path);
                    return Ok(None);
                }

                match items[0].decoded_content() {
                    Some(content) => Ok(Some(content)),
                    None => Err(HeraldError::forge(format!(
                        "failed to decode file content for path: {}",
                        req.path
                    ))),
                }
            }
        }
    }

    async fn get_tag_verification(&self, tag: &str) -> Result<TagVerification> {
        let endpoint = self.repo_endpoint(&format!("git/ref/tags/{tag}"));

        let git_ref: GitRef = self
            .instance
            .get(endpoint, None::<&()>)
            .await
            .map_err(|err| match github_status(&err) {
                Some(StatusCode::NOT_FOUND) => HeraldError::range(
                    &self.config.path,
                    tag,
                    tag,
                    format!("tag {tag} does not exist"),
                ),
                _ => err.into(),
            })?;

        let Some(sha) = annotated_tag_sha(git_ref) else {
            debug!("{tag} is a lightweight tag");
            return Ok(TagVerification::default());
        };

        let endpoint = self.repo_endpoint(&format!("git/tags/{sha}"));
        let git_tag: GitTag = self.instance.get(endpoint, None::<&()>).await?;

        Ok(tag_verification(git_tag))
    }

    async fn create_draft_release(
        &self,
        req: CreateReleaseRequest,
    ) -> Result<String> {
        info!("creating draft release {} for tag {}", req.title, req.tag);

        let release = self
            .instance
            .repos(&self.config.owner, &self.config.repo)
            .releases()
            .create(&req.tag)
            .name(&req.title)
            .body(&req.body)
            .draft(true)
            .prerelease(req.prerelease)
            .send()
            .await?;

        Ok(release.html_url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compare_commit(sha: &str, message: &str) -> CompareCommit {
        serde_json::from_value(json!({
            "sha": sha,
            "commit": { "message": message, "author": { "name": "dev" } },
            "url": "https://api.github.com/repos/o/r/commits/x"
        }))
        .unwrap()
    }

    #[test]
    fn summaries_are_first_lines_newest_first() {
        let commits = vec![
            compare_commit("a1", "Oldest change (#1)\n\nlong description"),
            compare_commit("b2", "Merge branch 'release'"),
            compare_commit("c3", "Newest change (#3)"),
        ];

        assert_eq!(
            summaries_in_log_order(commits),
            vec![
                "Newest change (#3)",
                "Merge branch 'release'",
                "Oldest change (#1)",
            ]
        );
    }

    #[test]
    fn empty_message_yields_empty_summary() {
        let summaries = summaries_in_log_order(vec![compare_commit("a", "")]);
        assert_eq!(summaries, vec![""]);
    }

    #[test]
    fn compare_response_parses_github_payload() {
        let response: CompareResponse = serde_json::from_value(json!({
            "status": "ahead",
            "total_commits": 250,
            "commits": [{
                "sha": "abc",
                "commit": { "message": "Fix (#1)" }
            }]
        }))
        .unwrap();

        assert_eq!(response.total_commits, 250);
        assert_eq!(response.commits[0].commit.message, "Fix (#1)");
    }

    #[test]
    fn pagination_stops_when_all_commits_collected() {
        assert!(!compare_complete(100, 100, 250));
        assert!(!compare_complete(100, 200, 250));
        assert!(compare_complete(50, 250, 250));
        assert!(compare_complete(0, 200, 250));
        assert!(compare_complete(0, 0, 0));
    }

    #[test]
    fn missing_refs_are_unresolvable_ranges() {
        assert!(is_unresolvable_range(Some(StatusCode::NOT_FOUND)));
        assert!(is_unresolvable_range(Some(StatusCode::UNPROCESSABLE_ENTITY)));
        assert!(!is_unresolvable_range(Some(StatusCode::UNAUTHORIZED)));
        assert!(!is_unresolvable_range(None));
    }

    #[test]
    fn lightweight_tag_has_no_tag_object() {
        let git_ref: GitRef = serde_json::from_value(json!({
            "ref": "refs/tags/v0.9.3",
            "object": { "sha": "c0ffee", "type": "commit" }
        }))
        .unwrap();

        assert_eq!(annotated_tag_sha(git_ref), None);
    }

    #[test]
    fn annotated_tag_resolves_tag_object() {
        let git_ref: GitRef = serde_json::from_value(json!({
            "ref": "refs/tags/v0.9.3",
            "object": { "sha": "7a9", "type": "tag" }
        }))
        .unwrap();

        assert_eq!(annotated_tag_sha(git_ref).as_deref(), Some("7a9"));
    }

    #[test]
    fn tag_verification_reads_signature_state() {
        let signed: GitTag = serde_json::from_value(json!({
            "tag": "v0.9.3",
            "verification": { "verified": true, "reason": "valid" }
        }))
        .unwrap();
        let verification = tag_verification(signed);
        assert!(verification.annotated);
        assert!(verification.verified);

        let unsigned: GitTag =
            serde_json::from_value(json!({ "tag": "v0.9.3" })).unwrap();
        let verification = tag_verification(unsigned);
        assert!(verification.annotated);
        assert!(!verification.verified);
        assert_eq!(verification.reason.as_deref(), Some("unsigned"));
    }
}
