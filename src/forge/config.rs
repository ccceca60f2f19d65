//! Configuration for forge repository connections.
use secrecy::SecretString;

/// Page size used for paginated forge queries.
pub const DEFAULT_PAGE_SIZE: u8 = 100;

/// Remote repository connection configuration for authenticating and
/// interacting with the forge.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Remote forge host (e.g., "github.com").
    pub host: String,
    /// URL scheme (http or https).
    pub scheme: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Full repository path (owner/name).
    pub path: String,
    /// Access token for authentication.
    pub token: SecretString,
    /// Log mutating operations instead of performing them.
    pub dry_run: bool,
}

impl RemoteConfig {
    /// Web URL of the repository, e.g. `https://github.com/owner/repo`.
    pub fn web_url(&self) -> String {
        format!("{}://{}/{}", self.scheme, self.host, self.path)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "".to_string(),
            scheme: "".to_string(),
            owner: "".to_string(),
            repo: "".to_string(),
            path: "".to_string(),
            token: SecretString::from("".to_string()),
            dry_run: false,
        }
    }
}
