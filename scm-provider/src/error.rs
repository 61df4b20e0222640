//! Errors surfaced by SCM providers.

use crate::github::ApiError;
use thiserror::Error;

/// Errors that can occur while discovering repositories or probing their contents.
#[derive(Debug, Error)]
pub enum ScmError {
    /// The provider could not be constructed, e.g. the enterprise base URL is malformed.
    #[error("Invalid provider configuration for '{url}': {message}")]
    Configuration { url: String, message: String },

    /// The requested clone protocol is not one of `""`, `"ssh"` or `"https"`.
    #[error("Unknown clone protocol for GitHub: '{protocol}'")]
    UnsupportedProtocol { protocol: String },

    /// A remote call failed (network, authentication, rate limit, bad payload).
    #[error("Error {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: ApiError,
    },

    /// A paged listing reported a next page that does not advance past the current one.
    #[error("Error {context}: next page {next} does not follow page {current}")]
    Pagination {
        context: String,
        current: u32,
        next: u32,
    },

    /// The repository's default branch could not be resolved.
    #[error("Branch '{branch}' not found in {organization}/{repository}")]
    BranchNotFound {
        organization: String,
        repository: String,
        branch: String,
    },

    /// Branch resolution failed while listing repositories.
    #[error("Error listing branches for {organization}/{repository}: {source}")]
    BranchResolution {
        organization: String,
        repository: String,
        #[source]
        source: Box<ScmError>,
    },
}

impl ScmError {
    /// Wraps a remote failure with a description of what was being done.
    pub(crate) fn transport(context: impl Into<String>, source: ApiError) -> Self {
        Self::Transport {
            context: context.into(),
            source,
        }
    }

    /// Builds the error for a listing whose page cursor stopped advancing.
    pub(crate) fn pagination(context: impl Into<String>, current: u32, next: u32) -> Self {
        Self::Pagination {
            context: context.into(),
            current,
            next,
        }
    }
}
