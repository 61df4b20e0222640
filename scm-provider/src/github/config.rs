//! GitHub provider configuration.

use serde::Deserialize;
use std::fmt;

/// Environment variable read when no token is configured.
///
/// Mostly useful in tests, to avoid the anonymous rate limit.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Settings a [`GithubProvider`](super::GithubProvider) is built from.
///
/// Empty strings for the token or base URL are treated as unset.
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct GithubConfig {
    /// Organization whose repositories are listed.
    organization: String,
    /// Static personal access token.
    #[serde(default)]
    token: Option<String>,
    /// GitHub Enterprise base URL; the public API is used when unset.
    #[serde(default)]
    base_url: Option<String>,
    /// List every branch instead of only the default branch.
    #[serde(default)]
    all_branches: bool,
}

impl GithubConfig {
    /// Creates a configuration for an organization on the public GitHub API.
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            token: None,
            base_url: None,
            all_branches: false,
        }
    }

    /// Sets the token used to authenticate.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Targets a GitHub Enterprise instance.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets whether every branch is listed instead of only the default branch.
    pub fn with_all_branches(mut self, all_branches: bool) -> Self {
        self.all_branches = all_branches;
        self
    }

    /// Returns the organization name.
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Returns the explicitly configured token.
    pub fn token(&self) -> Option<&str> {
        non_empty(self.token.as_deref())
    }

    /// Returns the enterprise base URL.
    pub fn base_url(&self) -> Option<&str> {
        non_empty(self.base_url.as_deref())
    }

    /// Returns whether every branch is listed.
    pub fn all_branches(&self) -> bool {
        self.all_branches
    }

    /// Returns the token to authenticate with: the configured one, else [`TOKEN_ENV`].
    ///
    /// `None` means the client runs anonymously.
    pub fn resolved_token(&self) -> Option<String> {
        if let Some(token) = self.token() {
            return Some(token.to_string());
        }
        std::env::var(TOKEN_ENV).ok().filter(|token| !token.is_empty())
    }
}

impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("organization", &self.organization)
            .field("token", &self.token().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("all_branches", &self.all_branches)
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
