//! Command execution for release-herald.
//!
//! Both commands run the same pipeline: verify the release tag, resolve the
//! dependency range, fetch changes and labels from both repositories,
//! analyze each repository and compose one release body.
//!
//! - **release**: publishes the composed body as a draft release on the
//!   primary repository and announces it in the configured chat room
//! - **show**: prints the composed release, or writes it to a file,
//!   without publishing anything

/// Release preparation shared by all commands.
pub mod common;

/// Draft release publication and chat announcement.
pub mod release;

/// Prints the composed release without publishing it.
pub mod show;
