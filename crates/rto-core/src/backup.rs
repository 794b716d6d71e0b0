//! Git backup of a data directory.

use std::path::Path;

use chrono::Local;
use git2::{
    Cred, IndexAddOption, PushOptions, RemoteCallbacks, Repository, RepositoryInitOptions,
    Signature, Status, StatusOptions,
};
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};

const REMOTE: &str = "origin";
const BRANCH: &str = "main";

/// What happened during a backup, suitable for a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupOutcome {
    pub message: String,
    pub is_error: bool,
}

impl BackupOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    fn failed(err: DataError) -> Self {
        Self {
            message: err.to_string(),
            is_error: true,
        }
    }
}

/// Summary of the git state of a data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitStatus {
    pub is_repo: bool,
    pub has_remote: bool,
    pub modified: usize,
    pub untracked: usize,
    pub last_commit: Option<String>,
    pub clean: bool,
}

/// Result of staging and committing, before any push.
enum Committed {
    Created,
    UpToDate,
}

/// Commit everything in `dir`, pushing to `origin main` when a remote exists.
///
/// Initializes the repository on first use. A non-empty `remote` replaces any
/// existing `origin`.
pub fn perform(dir: &Path, remote: Option<&str>) -> BackupOutcome {
    let remote = remote.filter(|r| !r.is_empty());

    let repo = match open_or_init(dir) {
        Ok(repo) => repo,
        Err(e) => return BackupOutcome::failed(e),
    };

    if let Some(url) = remote {
        if let Err(e) = set_origin(&repo, url) {
            return BackupOutcome::failed(e);
        }
    }

    match commit_all(&repo) {
        Ok(Committed::Created) => {}
        Ok(Committed::UpToDate) => {
            debug!(dir = %dir.display(), "Backup already up to date");
            return BackupOutcome::ok("Nothing to commit, backup up to date");
        }
        Err(e) => return BackupOutcome::failed(e),
    }

    if !remote_exists(&repo) {
        info!(dir = %dir.display(), "Backup committed");
        return BackupOutcome::ok("Backup committed (no remote configured)");
    }

    match push(&repo) {
        Ok(()) => {
            info!(dir = %dir.display(), "Backup committed and pushed");
            BackupOutcome::ok("Backup committed and pushed")
        }
        Err(e) => {
            warn!(error = %e, "Backup push failed");
            BackupOutcome::ok(format!("Committed (push failed: {})", e))
        }
    }
}

/// Inspect `dir` without changing anything.
pub fn status(dir: &Path) -> GitStatus {
    let mut status = GitStatus::default();
    let repo = match open(dir) {
        Ok(Some(repo)) => repo,
        Ok(None) => return status,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "Could not open repository");
            return status;
        }
    };
    status.is_repo = true;
    status.has_remote = remote_exists(&repo);

    let mut opts = StatusOptions::new();
    opts.include_untracked(true).recurse_untracked_dirs(true);
    match repo.statuses(Some(&mut opts)) {
        Ok(entries) => {
            for entry in entries.iter() {
                let s = entry.status();
                if s.contains(Status::IGNORED) {
                    continue;
                }
                if s == Status::WT_NEW {
                    status.untracked += 1;
                } else {
                    status.modified += 1;
                }
            }
        }
        Err(e) => {
            debug!(error = %e, "Could not read repository status");
            return status;
        }
    }
    status.clean = status.modified == 0 && status.untracked == 0;

    status.last_commit = repo
        .head()
        .ok()
        .and_then(|head| head.peel_to_commit().ok())
        .and_then(|commit| commit.summary().map(str::to_string))
        .filter(|s| !s.is_empty());

    status
}

/// `backup: YYYY-MM-DD-HH-MM-SS-mmm`
fn commit_message() -> String {
    format!("backup: {}", Local::now().format("%Y-%m-%d-%H-%M-%S-%3f"))
}

/// Open `dir` as a repository. A directory that is not one gives `None`.
fn open(dir: &Path) -> Result<Option<Repository>> {
    match Repository::open(dir) {
        Ok(repo) => Ok(Some(repo)),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn open_or_init(dir: &Path) -> Result<Repository> {
    if let Some(repo) = open(dir)? {
        return Ok(repo);
    }
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head(BRANCH);
    let repo = Repository::init_opts(dir, &opts)?;
    info!(dir = %dir.display(), branch = BRANCH, "Initialized git repository");
    Ok(repo)
}

fn remote_exists(repo: &Repository) -> bool {
    repo.find_remote(REMOTE).is_ok()
}

fn set_origin(repo: &Repository, url: &str) -> Result<()> {
    if remote_exists(repo) {
        repo.remote_set_url(REMOTE, url)?;
    } else {
        repo.remote(REMOTE, url)?;
    }
    debug!(url, "Configured backup remote");
    Ok(())
}

/// Stage every change, deletions included, and commit when the tree moved.
fn commit_all(repo: &Repository) -> Result<Committed> {
    let mut index = repo.index()?;
    index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
    index.update_all(["*"], None)?;
    index.write()?;
    let tree_id = index.write_tree()?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => None,
        Err(e) if e.code() == git2::ErrorCode::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let unchanged = match &parent {
        Some(commit) => commit.tree_id() == tree_id,
        None => index.is_empty(),
    };
    if unchanged {
        return Ok(Committed::UpToDate);
    }

    let tree = repo.find_tree(tree_id)?;
    let signature = signature(repo)?;
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        &commit_message(),
        &tree,
        &parents,
    )?;
    Ok(Committed::Created)
}

/// The configured identity, or a local one when git has none.
fn signature(repo: &Repository) -> Result<Signature<'static>> {
    match repo.signature() {
        Ok(sig) => Ok(sig.to_owned()),
        Err(e) => {
            debug!(error = %e, "No git identity configured, using rto");
            Ok(Signature::now("rto", "rto@localhost")?)
        }
    }
}

fn push(repo: &Repository) -> Result<()> {
    let mut remote = repo.find_remote(REMOTE)?;
    let config = repo.config()?;

    // libgit2 retries the callback until it gives up, so ask the agent once.
    let mut tried_agent = false;
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |url, username, allowed| {
        if allowed.is_ssh_key() && !tried_agent {
            if let Some(user) = username {
                tried_agent = true;
                return Cred::ssh_key_from_agent(user);
            }
        }
        Cred::credential_helper(&config, url, username)
    });

    let mut opts = PushOptions::new();
    opts.remote_callbacks(callbacks);
    let refspec = format!("refs/heads/{0}:refs/heads/{0}", BRANCH);
    remote.push(&[refspec.as_str()], Some(&mut opts))?;
    Ok(())
}
