//! The capability every SCM backend implements.

use crate::error::ScmError;
use crate::repository::Repository;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

/// Discovers repositories and answers path-existence queries for one account scope.
///
/// Consumers should depend on this trait rather than on a concrete backend.
#[async_trait]
pub trait ScmProvider: Send + Sync {
    /// Lists every repository (and, depending on configuration, every branch) visible
    /// to the provider, one [`Repository`] per (repository, branch) pair.
    ///
    /// `clone_protocol` selects the URL form: `""` or `"ssh"` for SSH, `"https"` for
    /// HTTPS.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError`] if the protocol is unknown or any remote call fails. No
    /// partial results are returned.
    async fn list_repos(&self, clone_protocol: &str) -> Result<Vec<Repository>, ScmError>;

    /// Checks whether `path` exists in `repo` at the ref named by `repo.branch`.
    ///
    /// # Errors
    ///
    /// A missing path is `Ok(false)`. Any other remote failure is an error and must
    /// not be read as "path absent".
    async fn repo_has_path(&self, repo: &Repository, path: &str) -> Result<bool, ScmError>;
}

/// Transport scheme used to form a repository's clone URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloneProtocol {
    /// `git@host:owner/repo.git` form.
    #[default]
    Ssh,
    /// `https://host/owner/repo.git` form.
    Https,
}

impl CloneProtocol {
    /// Returns the protocol name as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for CloneProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloneProtocol {
    type Err = ScmError;

    // Unspecified defaults to SSH.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "ssh" => Ok(Self::Ssh),
            "https" => Ok(Self::Https),
            other => Err(ScmError::UnsupportedProtocol {
                protocol: other.to_string(),
            }),
        }
    }
}
