//! Request and response types exchanged with forge implementations.

#[derive(Debug, Clone, PartialEq, Eq)]
/// Range of history between two refs, `from` exclusive and `to` inclusive.
pub struct RangeRequest {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to read a file at a given ref.
pub struct GetFileContentRequest {
    /// Branch, tag or sha. Default branch when `None`.
    pub git_ref: Option<String>,
    /// Relative path to the file starting from repo root
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create a draft release for an existing tag.
pub struct CreateReleaseRequest {
    pub tag: String,
    pub title: String,
    pub body: String,
    pub prerelease: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Signature state of a tag as reported by the forge.
pub struct TagVerification {
    /// Lightweight tags carry no signature at all.
    pub annotated: bool,
    pub verified: bool,
    /// Forge supplied reason when the signature is not verified
    pub reason: Option<String>,
}
