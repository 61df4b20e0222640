//! Branch resolution for a discovered repository.

use super::client::{GithubApi, RemoteBranch, RemoteRepository};
use crate::error::ScmError;
use crate::pagination::collect_pages;
use tracing::debug;

/// Returns the branches of `repository` that should produce records.
///
/// Without `all_branches` only the configured default branch is fetched, and it must
/// exist. With `all_branches` every branch is listed in remote order; an empty
/// repository yields no branches.
///
/// # Errors
///
/// Returns [`ScmError::BranchNotFound`] if the default branch cannot be resolved,
/// [`ScmError::Pagination`] if the branch cursor stops advancing and
/// [`ScmError::Transport`] for any other remote failure.
pub async fn list_branches<A>(
    api: &A,
    owner: &str,
    repository: &RemoteRepository,
    all_branches: bool,
) -> Result<Vec<RemoteBranch>, ScmError>
where
    A: GithubApi + ?Sized,
{
    let name = repository.name.as_str();

    if !all_branches {
        return default_branch(api, owner, repository).await.map(|branch| vec![branch]);
    }

    let branches = collect_pages(|page| async move {
        debug!(repo = %name, page, "Fetching branch page");
        api.list_branches(owner, name, page)
            .await
            .map_err(|e| ScmError::transport(format!("listing branches of {owner}/{name}"), e))
    })
    .await
    .map_err(|e| {
        e.or_stalled(|current, next| {
            ScmError::pagination(format!("listing branches of {owner}/{name}"), current, next)
        })
    })?;

    debug!(repo = %name, count = branches.len(), "Listed branches");
    Ok(branches)
}

async fn default_branch<A>(
    api: &A,
    owner: &str,
    repository: &RemoteRepository,
) -> Result<RemoteBranch, ScmError>
where
    A: GithubApi + ?Sized,
{
    let not_found = |branch: &str| ScmError::BranchNotFound {
        organization: owner.to_string(),
        repository: repository.name.clone(),
        branch: branch.to_string(),
    };

    let branch = match repository.default_branch.as_deref() {
        Some(branch) if !branch.is_empty() => branch,
        _ => return Err(not_found("")),
    };

    match api.get_branch(owner, &repository.name, branch).await {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.is_not_found() => Err(not_found(branch)),
        Err(e) => Err(ScmError::transport(
            format!("fetching branch '{branch}' of {owner}/{}", repository.name),
            e,
        )),
    }
}
