//! Provider-agnostic repository record.

use serde::{Deserialize, Serialize};

/// One branch of one discovered repository.
///
/// A repository with N branches yields N records that share `organization`,
/// `repository`, `url` and `labels` and differ in `branch` and `sha`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Owning account or organization login.
    pub organization: String,

    /// Repository name.
    pub repository: String,

    /// Clone URL, SSH or HTTPS form depending on the requested protocol.
    pub url: String,

    /// Branch name.
    pub branch: String,

    /// Commit the branch currently points to.
    pub sha: String,

    /// Repository topics, in the order the provider returned them.
    pub labels: Vec<String>,
}

impl Repository {
    /// Returns the repository name in "organization/repository" format.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.organization, self.repository)
    }
}
