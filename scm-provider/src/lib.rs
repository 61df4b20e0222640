#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod error;
pub mod github;
pub mod pagination;
pub mod provider;
pub mod repository;

pub use error::ScmError;
pub use github::{
    ApiError, GithubApi, GithubConfig, GithubProvider, OctocrabApi, PathProbe, RemoteBranch,
    RemoteRepository, TOKEN_ENV,
};
pub use pagination::{collect_pages, Page, PageError};
pub use provider::{CloneProtocol, ScmProvider};
pub use repository::Repository;
