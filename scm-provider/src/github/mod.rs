//! GitHub and GitHub Enterprise repository discovery.
//!
//! [`GithubProvider`] lists an organization's repositories, expands each one into
//! its default branch or all of its branches, and checks whether a path exists at a
//! given branch.

mod branches;
mod client;
mod config;
mod error;

pub use branches::list_branches;
pub use client::{
    enterprise_api_url, GithubApi, OctocrabApi, PathProbe, RemoteBranch, RemoteRepository,
    PUBLIC_API,
};
pub use config::{GithubConfig, TOKEN_ENV};
pub use error::ApiError;

use crate::error::ScmError;
use crate::pagination::{collect_pages, Page};
use crate::provider::{CloneProtocol, ScmProvider};
use crate::repository::Repository;
use async_trait::async_trait;
use tracing::{debug, info, info_span, Instrument};

/// [`ScmProvider`] for one GitHub organization.
///
/// Holds no mutable state; one provider can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct GithubProvider<A = OctocrabApi> {
    config: GithubConfig,
    api: A,
}

impl GithubProvider {
    /// Builds a provider backed by octocrab.
    ///
    /// The token falls back to [`TOKEN_ENV`] when none is configured; without either
    /// the client is anonymous. A configured base URL selects GitHub Enterprise.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::Configuration`] if the base URL is malformed.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, as octocrab spawns its HTTP
    /// service on the current runtime.
    pub fn new(config: GithubConfig) -> Result<Self, ScmError> {
        let token = config.resolved_token();
        debug!(
            organization = %config.organization(),
            authenticated = token.is_some(),
            api = config.base_url().unwrap_or(PUBLIC_API),
            all_branches = config.all_branches(),
            "Creating GitHub provider"
        );

        let api = OctocrabApi::new(token, config.base_url())?;
        Ok(Self { config, api })
    }
}

impl<A: GithubApi> GithubProvider<A> {
    /// Builds a provider over any [`GithubApi`] implementation.
    pub fn with_api(config: GithubConfig, api: A) -> Self {
        Self { config, api }
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &GithubConfig {
        &self.config
    }

    /// Returns the underlying API client.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetches one page of repositories and expands it into records.
    async fn list_repos_page(
        &self,
        page: u32,
        protocol: CloneProtocol,
    ) -> Result<Page<Repository>, ScmError> {
        let organization = self.config.organization();
        let remote = self
            .api
            .list_org_repos(organization, page)
            .await
            .map_err(|e| ScmError::transport(format!("listing repositories for {organization}"), e))?;
        debug!(page, count = remote.items.len(), "Fetched repository page");

        let mut records = Vec::new();
        for repository in &remote.items {
            records.extend(self.repository_records(repository, protocol).await?);
        }

        Ok(Page {
            items: records,
            next: remote.next,
        })
    }

    /// Builds one record per branch of `repository`.
    async fn repository_records(
        &self,
        repository: &RemoteRepository,
        protocol: CloneProtocol,
    ) -> Result<Vec<Repository>, ScmError> {
        let owner = repository
            .owner
            .as_deref()
            .unwrap_or(self.config.organization());
        let url = match protocol {
            CloneProtocol::Ssh => repository.ssh_url.clone(),
            CloneProtocol::Https => repository.clone_url.clone(),
        }
        .unwrap_or_default();

        let branches = list_branches(&self.api, owner, repository, self.config.all_branches())
            .await
            .map_err(|e| ScmError::BranchResolution {
                organization: owner.to_string(),
                repository: repository.name.clone(),
                source: Box::new(e),
            })?;

        Ok(branches
            .into_iter()
            .map(|branch| Repository {
                organization: owner.to_string(),
                repository: repository.name.clone(),
                url: url.clone(),
                branch: branch.name,
                sha: branch.sha,
                labels: repository.topics.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl<A: GithubApi> ScmProvider for GithubProvider<A> {
    async fn list_repos(&self, clone_protocol: &str) -> Result<Vec<Repository>, ScmError> {
        let protocol: CloneProtocol = clone_protocol.parse()?;
        let span = info_span!(
            "list_repos",
            organization = %self.config.organization(),
            clone_protocol = %protocol
        );

        async {
            info!("Listing repositories");
            let records = collect_pages(|page| self.list_repos_page(page, protocol))
                .await
                .map_err(|e| {
                    e.or_stalled(|current, next| {
                        ScmError::pagination(
                            format!("listing repositories for {}", self.config.organization()),
                            current,
                            next,
                        )
                    })
                })?;
            info!(count = records.len(), "Repository listing complete");
            Ok(records)
        }
        .instrument(span)
        .await
    }

    async fn repo_has_path(&self, repo: &Repository, path: &str) -> Result<bool, ScmError> {
        let probe = self
            .api
            .probe_path(&repo.organization, &repo.repository, path, &repo.branch)
            .await
            .map_err(|e| {
                ScmError::transport(
                    format!(
                        "reading '{path}' at '{}' in {}/{}",
                        repo.branch, repo.organization, repo.repository
                    ),
                    e,
                )
            })?;

        debug!(
            repo = %repo.full_name(),
            branch = %repo.branch,
            path,
            exists = probe.exists(),
            "Probed path"
        );
        Ok(probe.exists())
    }
}
