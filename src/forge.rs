//! Interface to the forge hosting both repositories.
//!
//! Provides token-based access to merged change summaries, change labels,
//! tag signatures, repository files and draft releases through a common
//! trait, with a GitHub implementation.

/// Connection and authentication settings for a forge repository.
pub mod config;

/// GitHub API client implementation for GitHub.com and Enterprise.
pub mod github;

/// Wrapper adding dry-run handling and error classification on top of a
/// forge implementation.
pub mod manager;

/// Request and response types shared by forge implementations.
pub mod request;

/// Common traits for forge platform abstraction.
pub mod traits;
