//! GitHub client error types.

use thiserror::Error;

/// HTTP status GitHub uses for a missing resource.
const NOT_FOUND: u16 = 404;

/// Errors returned by a [`GithubApi`](super::GithubApi) call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Error reported by the octocrab client.
    #[error("GitHub API error: {0}")]
    GitHub(#[from] octocrab::Error),

    /// Non-success HTTP status with the response message.
    #[error("GitHub responded with {status}: {message}")]
    Status { status: u16, message: String },

    /// A `Link: rel="next"` header without a usable `page` parameter.
    #[error("GitHub returned a next page link without a page number: {link}")]
    InvalidNextLink { link: String },
}

impl ApiError {
    /// Returns the HTTP status of the failed response, when there was one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::GitHub(octocrab::Error::GitHub { source, .. }) => {
                Some(source.status_code.as_u16())
            }
            Self::Status { status, .. } => Some(*status),
            Self::GitHub(_) | Self::InvalidNextLink { .. } => None,
        }
    }

    /// Returns true if GitHub answered 404 Not Found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(NOT_FOUND)
    }
}
