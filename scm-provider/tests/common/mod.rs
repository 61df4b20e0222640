//! In-memory stand-in for the GitHub API.

#![allow(dead_code)]


use async_trait::async_trait;
use scm_provider::{ApiError, GithubApi, Page, PathProbe, RemoteBranch, RemoteRepository};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const ORG: &str = "acme";

/// Branches per page, matching the provider's page size.
const BRANCH_PAGE_SIZE: usize = 100;

/// Simulated GitHub serving fixed repositories, branches and contents.
#[derive(Debug, Default)]
pub struct StubGithub {
    repo_pages: Vec<Vec<RemoteRepository>>,
    branches: HashMap<String, Vec<RemoteBranch>>,
    paths: HashSet<(String, String, String)>,
    failing_repo_pages: HashMap<u32, u16>,
    failing_branches: HashMap<String, u16>,
    failing_paths: HashMap<String, u16>,
    calls: Mutex<Vec<String>>,
}

impl StubGithub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `repos` as a single page.
    pub fn with_repos(self, repos: Vec<RemoteRepository>) -> Self {
        self.with_repo_pages(vec![repos])
    }

    /// Serves each entry as one page, in order.
    pub fn with_repo_pages(mut self, pages: Vec<Vec<RemoteRepository>>) -> Self {
        self.repo_pages = pages;
        self
    }

    pub fn with_branches(mut self, repo: &str, branches: Vec<RemoteBranch>) -> Self {
        self.branches.insert(repo.to_string(), branches);
        self
    }

    pub fn with_path(mut self, repo: &str, branch: &str, path: &str) -> Self {
        self.paths
            .insert((repo.to_string(), branch.to_string(), path.to_string()));
        self
    }

    pub fn failing_repo_page(mut self, page: u32, status: u16) -> Self {
        self.failing_repo_pages.insert(page, status);
        self
    }

    pub fn failing_branches(mut self, repo: &str, status: u16) -> Self {
        self.failing_branches.insert(repo.to_string(), status);
        self
    }

    pub fn failing_path(mut self, path: &str, status: u16) -> Self {
        self.failing_paths.insert(path.to_string(), status);
        self
    }

    /// Returns every call made so far, e.g. `"list_branches acme/widgets 1"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn status(status: u16) -> ApiError {
    let message = match status {
        404 => "Not Found",
        503 => "Service Unavailable",
        _ => "Error",
    };
    ApiError::Status {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl GithubApi for StubGithub {
    async fn list_org_repos(
        &self,
        organization: &str,
        page: u32,
    ) -> Result<Page<RemoteRepository>, ApiError> {
        self.record(format!("list_org_repos {organization} {page}"));
        if let Some(code) = self.failing_repo_pages.get(&page) {
            return Err(status(*code));
        }

        let index = page as usize - 1;
        let items = self.repo_pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.repo_pages.len()).then_some(page + 1);
        Ok(Page { items, next })
    }

    async fn get_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<RemoteBranch, ApiError> {
        self.record(format!("get_branch {owner}/{repo} {branch}"));
        if let Some(code) = self.failing_branches.get(repo) {
            return Err(status(*code));
        }

        self.branches
            .get(repo)
            .and_then(|branches| branches.iter().find(|b| b.name == branch))
            .cloned()
            .ok_or_else(|| status(404))
    }

    async fn list_branches(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
    ) -> Result<Page<RemoteBranch>, ApiError> {
        self.record(format!("list_branches {owner}/{repo} {page}"));
        if let Some(code) = self.failing_branches.get(repo) {
            return Err(status(*code));
        }

        let all = self.branches.get(repo).cloned().unwrap_or_default();
        let start = (page as usize - 1) * BRANCH_PAGE_SIZE;
        let items: Vec<_> = all.iter().skip(start).take(BRANCH_PAGE_SIZE).cloned().collect();
        let next = (start + BRANCH_PAGE_SIZE < all.len()).then_some(page + 1);
        Ok(Page { items, next })
    }

    async fn probe_path(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: &str,
    ) -> Result<PathProbe, ApiError> {
        self.record(format!("probe_path {owner}/{repo} {path}@{reference}"));
        if let Some(code) = self.failing_paths.get(path) {
            return Err(status(*code));
        }

        let key = (repo.to_string(), reference.to_string(), path.to_string());
        Ok(if self.paths.contains(&key) {
            PathProbe::Found
        } else {
            PathProbe::Missing
        })
    }
}

/// A repository owned by [`ORG`] with the given default branch and topics.
pub fn repo(name: &str, default_branch: &str, topics: &[&str]) -> RemoteRepository {
    RemoteRepository {
        owner: Some(ORG.to_string()),
        name: name.to_string(),
        ssh_url: Some(format!("git@github.com:{ORG}/{name}.git")),
        clone_url: Some(format!("https://github.com/{ORG}/{name}.git")),
        default_branch: Some(default_branch.to_string()),
        topics: topics.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn branch(name: &str, sha: &str) -> RemoteBranch {
    RemoteBranch {
        name: name.to_string(),
        sha: sha.to_string(),
    }
}
