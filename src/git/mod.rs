pub mod committer;
#[cfg(test)]
pub mod testing;

use self::committer::Committer;
use git2::{
    build::RepoBuilder, Commit, Cred, FetchOptions, IndexAddOption, Oid, PushOptions,
    RemoteCallbacks, Repository, Signature,
};
use std::path::Path;
use thiserror::Error;

const REMOTE_NAME: &str = "origin";
const TOKEN_USERNAME: &str = "x-access-token";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to clone {url}")]
    Clone {
        url: String,
        #[source]
        cause: git2::Error,
    },
    #[error("Failed to commit changes")]
    Commit {
        #[source]
        cause: git2::Error,
    },
    #[error("Failed to push {refspec}")]
    Push {
        refspec: String,
        #[source]
        cause: git2::Error,
    },
    #[error("HEAD does not point to a branch")]
    DetachedHead,
}

pub fn clone(
    url: &str,
    token: &str,
    branch: Option<&str>,
    into: &Path,
) -> Result<Repository, Error> {
    let mut fetch_options = FetchOptions::new();
    fetch_options.remote_callbacks(callbacks(token));

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);

    if let Some(branch) = branch {
        builder.branch(branch);
    }

    builder.clone(url, into).map_err(|cause| Error::Clone {
        url: url.to_owned(),
        cause,
    })
}

/// Returns `None` when the resulting tree is identical to HEAD's.
pub fn commit_all(
    repo: &Repository,
    message: &str,
    committer: &Committer,
) -> Result<Option<Oid>, Error> {
    let mut index = repo.index().map_err(commit_error)?;
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .map_err(commit_error)?;
    index.update_all(["*"].iter(), None).map_err(commit_error)?;
    index.write().map_err(commit_error)?;

    let tree_id = index.write_tree().map_err(commit_error)?;
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());

    if let Some(parent) = &parent {
        if parent.tree_id() == tree_id {
            return Ok(None);
        }
    }

    let tree = repo.find_tree(tree_id).map_err(commit_error)?;
    let signature = Signature::now(&committer.author, &committer.email).map_err(commit_error)?;
    let parents: Vec<&Commit> = parent.iter().collect();

    let oid = repo
        .commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )
        .map_err(commit_error)?;

    Ok(Some(oid))
}

pub fn push(repo: &Repository, token: &str) -> Result<String, Error> {
    let head = repo.head().map_err(|_| Error::DetachedHead)?;

    if !head.is_branch() {
        return Err(Error::DetachedHead);
    }

    let branch = head.shorthand().ok_or(Error::DetachedHead)?.to_owned();
    let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch);
    let push_error = |cause| Error::Push {
        refspec: refspec.to_owned(),
        cause,
    };

    let mut remote = repo.find_remote(REMOTE_NAME).map_err(push_error)?;

    let mut callbacks = callbacks(token);
    callbacks.push_update_reference(|reference, status| match status {
        Some(message) => Err(git2::Error::from_str(&format!(
            "{} rejected: {}",
            reference, message
        ))),
        None => Ok(()),
    });

    let mut options = PushOptions::new();
    options.remote_callbacks(callbacks);

    remote
        .push(&[refspec.as_str()], Some(&mut options))
        .map_err(push_error)?;

    Ok(branch)
}

fn callbacks(token: &str) -> RemoteCallbacks<'_> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempted = false;

    // libgit2 keeps asking while the server rejects the credential
    callbacks.credentials(move |_url, _username, _allowed| {
        if attempted {
            return Err(git2::Error::from_str("token rejected by remote"));
        }
        attempted = true;
        Cred::userpass_plaintext(TOKEN_USERNAME, token)
    });

    callbacks
}

fn commit_error(cause: git2::Error) -> Error {
    Error::Commit { cause }
}
