//! Access to the GitHub REST API.
//!
//! The provider talks to GitHub only through [`GithubApi`], which keeps the
//! listing and probing logic independent of the HTTP client. [`OctocrabApi`] is the
//! production implementation.

use super::error::ApiError;
use crate::error::ScmError;
use crate::pagination::{page_number, Page, PER_PAGE};
use async_trait::async_trait;
use octocrab::{models, Octocrab};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use std::fmt;
use tracing::debug;
use url::Url;

/// Public GitHub API endpoint.
pub const PUBLIC_API: &str = "https://api.github.com/";

/// Bytes escaped inside one route segment: the URL path set plus `/` and `%`.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Repository fields the provider needs from a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteRepository {
    /// Owner login.
    pub owner: Option<String>,
    /// Repository name.
    pub name: String,
    /// SSH clone URL.
    pub ssh_url: Option<String>,
    /// HTTPS clone URL.
    pub clone_url: Option<String>,
    /// Configured default branch.
    pub default_branch: Option<String>,
    /// Repository topics.
    pub topics: Vec<String>,
}

/// A branch and the commit it points to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteBranch {
    /// Branch name.
    pub name: String,
    /// Head commit SHA.
    pub sha: String,
}

/// Outcome of a content lookup that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathProbe {
    /// Content exists at the path (file, directory, symlink or submodule).
    Found,
    /// GitHub answered 404 for the path at that ref.
    Missing,
}

impl PathProbe {
    /// Returns true if the path exists.
    #[must_use]
    pub fn exists(self) -> bool {
        matches!(self, Self::Found)
    }
}

/// The GitHub calls repository discovery is built from.
///
/// Paged calls take the page number to fetch and report the next one in
/// [`Page::next`].
#[async_trait]
pub trait GithubApi: Send + Sync {
    /// Lists one page of an organization's repositories.
    async fn list_org_repos(
        &self,
        organization: &str,
        page: u32,
    ) -> Result<Page<RemoteRepository>, ApiError>;

    /// Fetches a single branch by name.
    async fn get_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<RemoteBranch, ApiError>;

    /// Lists one page of a repository's branches.
    async fn list_branches(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
    ) -> Result<Page<RemoteBranch>, ApiError>;

    /// Looks up content metadata for `path` at `reference`.
    ///
    /// A 404 is reported as [`PathProbe::Missing`], never as an error.
    async fn probe_path(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<PathProbe, ApiError>;
}

/// [`GithubApi`] backed by an [`Octocrab`] client.
#[derive(Clone)]
pub struct OctocrabApi {
    octocrab: Octocrab,
}

impl fmt::Debug for OctocrabApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OctocrabApi").finish_non_exhaustive()
    }
}

impl OctocrabApi {
    /// Builds a client for the public API or, with `base_url`, a GitHub Enterprise
    /// instance. Without a token the client is anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::Configuration`] if the base URL is malformed or the
    /// client cannot be built.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn new(token: Option<String>, base_url: Option<&str>) -> Result<Self, ScmError> {
        let configuration_error = |e: octocrab::Error| ScmError::Configuration {
            url: base_url.unwrap_or(PUBLIC_API).to_string(),
            message: e.to_string(),
        };

        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token);
        }
        if let Some(base_url) = base_url {
            let api = enterprise_api_url(base_url)?;
            debug!(api = %api, "Using GitHub Enterprise");
            builder = builder
                .base_uri(api.as_str())
                .map_err(configuration_error)?;
        }

        let octocrab = builder.build().map_err(configuration_error)?;
        Ok(Self { octocrab })
    }

    /// Wraps an already configured client.
    pub fn from_octocrab(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }
}

#[async_trait]
impl GithubApi for OctocrabApi {
    async fn list_org_repos(
        &self,
        organization: &str,
        page: u32,
    ) -> Result<Page<RemoteRepository>, ApiError> {
        let response = self
            .octocrab
            .orgs(organization)
            .list_repos()
            .per_page(PER_PAGE)
            .page(page)
            .send()
            .await?;
        into_page(response)
    }

    async fn get_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<RemoteBranch, ApiError> {
        let route = encoded_route(["repos", owner, repo, "branches", branch]);
        let branch: models::repos::Branch = self.octocrab.get(route, None::<&()>).await?;
        Ok(branch.into())
    }

    async fn list_branches(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
    ) -> Result<Page<RemoteBranch>, ApiError> {
        let response = self
            .octocrab
            .repos(owner, repo)
            .list_branches()
            .per_page(PER_PAGE)
            .page(page)
            .send()
            .await?;
        into_page(response)
    }

    async fn probe_path(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<PathProbe, ApiError> {
        let route = encoded_route(
            ["repos", owner, repo, "contents"]
                .into_iter()
                .chain(path.split('/').filter(|segment| !segment.is_empty())),
        );
        let query = ContentQuery { reference };
        let result: Result<serde_json::Value, _> =
            self.octocrab.get(route, Some(&query)).await;

        match result.map_err(ApiError::from) {
            Ok(_) => Ok(PathProbe::Found),
            Err(e) if e.is_not_found() => Ok(PathProbe::Missing),
            Err(e) => Err(e),
        }
    }
}

impl From<models::Repository> for RemoteRepository {
    fn from(repo: models::Repository) -> Self {
        Self {
            owner: repo.owner.map(|owner| owner.login),
            name: repo.name,
            ssh_url: repo.ssh_url,
            clone_url: repo.clone_url.map(|url| url.to_string()),
            default_branch: repo.default_branch,
            topics: repo.topics.unwrap_or_default(),
        }
    }
}

impl From<models::repos::Branch> for RemoteBranch {
    fn from(branch: models::repos::Branch) -> Self {
        Self {
            name: branch.name,
            sha: branch.commit.sha,
        }
    }
}

/// Query string of a contents lookup.
#[derive(Serialize)]
struct ContentQuery<'a> {
    #[serde(rename = "ref", skip_serializing_if = "str::is_empty")]
    reference: &'a str,
}

/// Joins raw segments into an absolute API route, percent-encoding each one.
///
/// A segment never contributes a `/` of its own, so a branch such as `feature/x`
/// stays one segment.
fn encoded_route<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments.into_iter().fold(String::new(), |mut route, segment| {
        route.push('/');
        route.extend(utf8_percent_encode(segment, SEGMENT));
        route
    })
}

/// Converts an octocrab page, turning its `next` link into a page number.
///
/// A next link without a usable page number is an error, so a listing is never cut
/// short silently.
fn into_page<T, U: From<T>>(page: octocrab::Page<T>) -> Result<Page<U>, ApiError> {
    let next = match page.next {
        Some(link) => {
            let link = link.to_string();
            Some(page_number(&link).ok_or(ApiError::InvalidNextLink { link })?)
        }
        None => None,
    };
    Ok(Page {
        items: page.items.into_iter().map(U::from).collect(),
        next,
    })
}

/// Path suffix of the REST API root on GitHub Enterprise.
const ENTERPRISE_API_PATH: &str = "api/v3/";

/// Derives the REST API root of a GitHub Enterprise instance from its base URL.
///
/// Both `https://ghe.example.com` and `https://ghe.example.com/api/v3/` yield
/// `https://ghe.example.com/api/v3/`.
///
/// # Errors
///
/// Returns [`ScmError::Configuration`] if the URL does not parse or is not http(s).
pub fn enterprise_api_url(base_url: &str) -> Result<Url, ScmError> {
    let invalid = |message: String| ScmError::Configuration {
        url: base_url.to_string(),
        message,
    };

    let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }

    let mut path = parsed.path().to_string();
    if !path.ends_with('/') {
        path.push('/');
    }
    if !path.ends_with(&format!("/{ENTERPRISE_API_PATH}")) {
        path.push_str(ENTERPRISE_API_PATH);
    }

    let mut api = parsed;
    api.set_path(&path);
    Ok(api)
}
