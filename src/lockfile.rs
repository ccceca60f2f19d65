//! Finds the dependency commit pinned in a `Cargo.lock`.
use log::*;
use serde::Deserialize;
use url::Url;

use crate::error::Result;

#[derive(Debug, Deserialize)]
struct LockedPackage {
    name: String,
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Lockfile {
    #[serde(default, rename = "package")]
    packages: Vec<LockedPackage>,
}

/// Repository path (`owner/name`) and commit of a git package source such as
/// `git+https://github.com/owner/name?branch=master#<sha>`.
fn git_source(source: &str) -> Option<(String, String)> {
    let url = Url::parse(source.strip_prefix("git+")?).ok()?;
    let commit = url.fragment()?.to_string();
    let path = url
        .path()
        .trim_start_matches('/')
        .trim_end_matches('/')
        .trim_end_matches(".git")
        .to_lowercase();

    Some((path, commit))
}

/// Returns the commit every package from `repo_path` is pinned to, or `None`
/// when the lockfile has no git package from that repository.
pub fn pinned_commit(content: &str, repo_path: &str) -> Result<Option<String>> {
    let lockfile: Lockfile = toml::from_str(content)?;
    let repo_path = repo_path.to_lowercase();

    let pinned = lockfile.packages.iter().find_map(|package| {
        let (path, commit) = git_source(package.source.as_deref()?)?;
        if path == repo_path {
            debug!("{} pins {repo_path} at {commit}", package.name);
            Some(commit)
        } else {
            None
        }
    });

    Ok(pinned)
}
