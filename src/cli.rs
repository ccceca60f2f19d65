//! CLI argument parsing and forge remote configuration.
use clap::{Parser, Subcommand};
use git_url_parse::GitUrl;
use secrecy::SecretString;
use std::env;

use crate::{
    config::DEFAULT_CONFIG_FILE,
    error::{HeraldError, Result},
    forge::config::RemoteConfig,
};

/// Global CLI arguments for repository configuration and debugging.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "", global = true)]
    /// Primary GitHub repository URL (https://github.com/owner/repo).
    pub repo: String,

    #[arg(long, default_value = "", global = true)]
    /// Dependency GitHub repository URL whose changes are included.
    pub dependency_repo: String,

    #[arg(long, default_value = "", global = true)]
    /// GitHub personal access token. Falls back to GITHUB_TOKEN env var.
    pub github_token: String,

    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    /// Path to the herald configuration file.
    pub config: String,

    #[arg(long, default_value_t = false, global = true)]
    /// Log the release and chat message instead of publishing them.
    pub dry_run: bool,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Release points of both repositories.
#[derive(clap::Args, Debug, Clone)]
pub struct RangeArgs {
    #[arg(long)]
    /// Previous release tag of the primary repository.
    pub from: String,

    #[arg(long)]
    /// Tag of the release being published.
    pub to: String,

    #[arg(long)]
    /// Dependency ref at the previous release. Read from the primary
    /// repository's lockfile when omitted.
    pub dependency_from: Option<String>,

    #[arg(long)]
    /// Dependency ref at this release. Read from the primary repository's
    /// lockfile when omitted.
    pub dependency_to: Option<String>,
}

impl RangeArgs {
    /// Explicit dependency range, if one was given. Both ends must be set
    /// together.
    pub fn dependency_range(&self) -> Result<Option<(String, String)>> {
        match (&self.dependency_from, &self.dependency_to) {
            (Some(from), Some(to)) => Ok(Some((from.clone(), to.clone()))),
            (None, None) => Ok(None),
            _ => Err(HeraldError::invalid_args(
                "--dependency-from and --dependency-to must be used together",
            )),
        }
    }
}

/// Release operation subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compose release notes, publish a draft release and announce it.
    Release {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(long, default_value = "")]
        /// Matrix access token. Falls back to MATRIX_ACCESS_TOKEN env var.
        matrix_token: String,
    },

    /// Compose release notes and print them without publishing.
    Show {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(long)]
        /// Write output to a file instead of stdout.
        out_file: Option<String>,

        #[arg(long, default_value_t = false)]
        /// Print the composed release as JSON.
        json: bool,
    },
}

impl Args {
    /// Remote configuration of the primary repository.
    pub fn primary_remote(&self) -> Result<RemoteConfig> {
        if self.repo.is_empty() {
            return Err(HeraldError::invalid_args("must set --repo"));
        }
        get_github_remote(&self.repo, &self.github_token, self.dry_run)
    }

    /// Remote configuration of the dependency repository.
    pub fn dependency_remote(&self) -> Result<RemoteConfig> {
        if self.dependency_repo.is_empty() {
            return Err(HeraldError::invalid_args("must set --dependency-repo"));
        }
        get_github_remote(
            &self.dependency_repo,
            &self.github_token,
            self.dry_run,
        )
    }
}

/// Resolves a secret from the flag value or an environment variable.
pub fn token_or_env(value: &str, env_var: &str) -> Option<SecretString> {
    let mut token = value.to_string();

    if token.is_empty()
        && let Ok(env_var_token) = env::var(env_var)
    {
        token = env_var_token;
    }

    if token.is_empty() {
        None
    } else {
        Some(SecretString::from(token))
    }
}

/// Validate repository URL uses HTTP or HTTPS scheme.
fn validate_scheme(scheme: git_url_parse::Scheme) -> Result<()> {
    match scheme {
        git_url_parse::Scheme::Http => Ok(()),
        git_url_parse::Scheme::Https => Ok(()),
        _ => Err(HeraldError::invalid_args(
            "only http and https schemes are supported for repo urls",
        )),
    }
}

/// Configure GitHub remote with URL parsing and token resolution.
pub fn get_github_remote(
    github_repo: &str,
    github_token: &str,
    dry_run: bool,
) -> Result<RemoteConfig> {
    let parsed = GitUrl::parse(github_repo)?;

    validate_scheme(parsed.scheme)?;

    let mut token = github_token.to_string();

    if token.is_empty()
        && let Some(parsed_token) = parsed.token
    {
        token = parsed_token;
    }

    let token = token_or_env(&token, "GITHUB_TOKEN")
        .ok_or_else(|| HeraldError::invalid_args("must set github token"))?;

    let host = parsed.host.ok_or_else(|| {
        HeraldError::invalid_args("unable to parse host from github repo")
    })?;

    let owner = parsed.owner.ok_or_else(|| {
        HeraldError::invalid_args("unable to parse owner from github repo")
    })?;

    Ok(RemoteConfig {
        host,
        scheme: parsed.scheme.to_string(),
        path: format!("{owner}/{}", parsed.name),
        owner,
        repo: parsed.name,
        token,
        dry_run,
    })
}
