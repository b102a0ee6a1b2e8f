//! Development branch initialization.
//!
//! [BranchInitializer::initialize] runs a strictly linear sequence:
//!
//! ```text
//! Start → Validated → Preflighted → Synced → BranchCreated → Cleaned → ConfigUpdated → Committed
//! ```
//!
//! Each step is a precondition for the next and the first failure ends the
//! run. The only rollback is after a failed branch creation, which tries to
//! return to the branch (or detached commit) that was checked out at the
//! start. Once the branch exists it is never reverted: a failure later leaves
//! the operator on the new branch with the partial changes visible in the
//! working tree.

use std::fmt;

use crate::config::Config;
use crate::error::{InitError, Result, SyncStage};
use crate::git::Repository;
use crate::marker::{self, MarkerOutcome, MarkerRewrite};
use crate::notice::Notice;
use crate::signoff::{self, SignOff, SignOffSource};
use crate::version::VersionTag;
use crate::workspace::Workspace;

/// Progress through the initialization sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validated,
    Preflighted,
    Synced,
    BranchCreated,
    Cleaned,
    ConfigUpdated,
    Committed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validated => "validated",
            Stage::Preflighted => "preflighted",
            Stage::Synced => "synced",
            Stage::BranchCreated => "branch created",
            Stage::Cleaned => "cleaned",
            Stage::ConfigUpdated => "config updated",
            Stage::Committed => "committed",
        };
        write!(f, "{}", name)
    }
}

/// What happened to the stale directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    Removed,
    Absent,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub version: VersionTag,
    pub branch: String,
    /// Branch checked out before the run, `None` if HEAD was detached
    pub previous_branch: Option<String>,
    pub stale_directory: CleanupOutcome,
    pub marker: MarkerOutcome,
    pub sign_off: String,
    pub message: String,
    pub commit_id: String,
    pub notices: Vec<Notice>,
}

/// Where HEAD was when the run started.
struct StartPoint {
    branch: Option<String>,
    /// Set only for a detached HEAD
    commit: Option<String>,
}

/// Creates a development branch through explicit repository and workspace handles.
pub struct BranchInitializer<'a, R: Repository, W: Workspace> {
    repo: &'a R,
    workspace: &'a W,
    config: &'a Config,
}

/// Collaborator failure text without our own "Git operation failed" prefix.
fn reason(err: InitError) -> String {
    match err {
        InitError::Git(e) => e.message().to_string(),
        other => other.to_string(),
    }
}

fn enter(stage: Stage) {
    log::debug!("stage: {}", stage);
}

impl<'a, R: Repository, W: Workspace> BranchInitializer<'a, R, W> {
    pub fn new(repo: &'a R, workspace: &'a W, config: &'a Config) -> Self {
        BranchInitializer {
            repo,
            workspace,
            config,
        }
    }

    /// Create and commit the development branch `raw_name`.
    ///
    /// Nothing is read from or written to the repository until `raw_name` has
    /// been validated.
    ///
    /// # Arguments
    /// * `raw_name` - Branch name in the form `Major.Minor.Revision_Dev`
    ///
    /// # Returns
    /// * `Ok(Summary)` - The branch was created and committed
    /// * `Err(InitError)` - The step that failed; see the module docs for what
    ///   is left behind
    pub fn initialize(&self, raw_name: &str) -> Result<Summary> {
        let version = VersionTag::parse(raw_name)?;
        enter(Stage::Validated);

        self.preflight()?;
        enter(Stage::Preflighted);

        let start = self.sync_trunk()?;
        enter(Stage::Synced);

        self.create_branch(raw_name, &start)?;
        enter(Stage::BranchCreated);

        let mut notices = Vec::new();

        let stale_directory = self.remove_stale_directory()?;
        if stale_directory == CleanupOutcome::Absent {
            notices.push(Notice::StaleDirectoryAbsent {
                path: self.config.paths.stale_directory.display().to_string(),
            });
        }
        enter(Stage::Cleaned);

        let marker = self.update_marker()?;
        if marker == MarkerOutcome::AlreadyMigrated {
            notices.push(Notice::MarkerNotFound {
                file: self.config.paths.workflow_file.display().to_string(),
            });
        }
        enter(Stage::ConfigUpdated);

        let sign_off = self.resolve_sign_off();
        let template = self.config.paths.commit_template.display().to_string();
        match sign_off.source {
            SignOffSource::Template => {}
            SignOffSource::TemplateMissing => {
                notices.push(Notice::SignOffTemplateMissing { path: template })
            }
            SignOffSource::LineMissing => {
                notices.push(Notice::SignOffLineMissing { path: template })
            }
        }

        let message = signoff::commit_message(&version, &sign_off);
        let commit_id = self.commit(raw_name, &message)?;
        enter(Stage::Committed);

        Ok(Summary {
            version,
            branch: raw_name.to_string(),
            previous_branch: start.branch,
            stale_directory,
            marker,
            sign_off: sign_off.line,
            message,
            commit_id,
            notices,
        })
    }

    /// Require a repository root with no staged, unstaged or untracked changes.
    fn preflight(&self) -> Result<()> {
        if !self.repo.is_repository_root() {
            return Err(InitError::NotARepository {
                path: self.workspace.root().display().to_string(),
            });
        }

        let paths = self.repo.pending_changes()?;
        if !paths.is_empty() {
            return Err(InitError::DirtyWorkingTree { paths });
        }

        Ok(())
    }

    /// Check out the trunk and pull it. Returns where HEAD was before.
    fn sync_trunk(&self) -> Result<StartPoint> {
        let trunk = &self.config.repository.trunk_branch;
        let remote = &self.config.repository.remote;

        let sync_failed = |stage: SyncStage, err: InitError| InitError::SyncFailed {
            stage,
            branch: trunk.clone(),
            reason: reason(err),
        };

        let branch = self
            .repo
            .current_branch()
            .map_err(|e| sync_failed(SyncStage::Checkout, e))?;
        // A detached HEAD can only be found again by its commit
        let commit = match branch {
            Some(_) => None,
            None => self
                .repo
                .head_commit()
                .map_err(|e| sync_failed(SyncStage::Checkout, e))?,
        };

        self.repo
            .checkout(trunk)
            .map_err(|e| sync_failed(SyncStage::Checkout, e))?;
        self.repo
            .pull(remote, trunk)
            .map_err(|e| sync_failed(SyncStage::Pull, e))?;

        Ok(StartPoint { branch, commit })
    }

    fn create_branch(&self, name: &str, start: &StartPoint) -> Result<()> {
        let err = match self.repo.create_branch(name) {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };

        // Best effort: the create failure is what gets reported either way
        match (&start.branch, &start.commit) {
            (Some(branch), _) if *branch != self.config.repository.trunk_branch => {
                if let Err(restore) = self.repo.checkout(branch) {
                    log::warn!("could not restore branch '{}': {}", branch, restore);
                }
            }
            (Some(_), _) => {}
            (None, Some(commit)) => {
                if let Err(restore) = self.repo.checkout_detached(commit) {
                    log::warn!("could not restore detached HEAD at {}: {}", commit, restore);
                }
            }
            (None, None) => log::warn!("HEAD had no commit before the run; staying on the trunk"),
        }

        Err(InitError::BranchCreateFailed {
            branch: name.to_string(),
            reason: reason(err),
        })
    }

    /// Delete the stale output directory if it is present.
    pub fn remove_stale_directory(&self) -> Result<CleanupOutcome> {
        let path = &self.config.paths.stale_directory;
        if self.workspace.remove_dir_if_exists(path)? {
            log::info!("removed {}", path.display());
            Ok(CleanupOutcome::Removed)
        } else {
            Ok(CleanupOutcome::Absent)
        }
    }

    /// Switch the workflow's build variant marker from `CHECKED` to `PRELIMINARY`.
    ///
    /// The workflow file must exist. A file without the `CHECKED` marker is
    /// left untouched.
    pub fn update_marker(&self) -> Result<MarkerOutcome> {
        let path = &self.config.paths.workflow_file;
        let content =
            self.workspace
                .read_file(path)?
                .ok_or_else(|| InitError::ConfigFileMissing {
                    path: path.display().to_string(),
                })?;

        match marker::rewrite_marker(&content) {
            MarkerRewrite::Rewritten(updated) => {
                self.workspace.write_file(path, &updated)?;
                log::info!(
                    "set {} {} in {}",
                    marker::MARKER_KEY,
                    marker::PRELIMINARY,
                    path.display()
                );
                Ok(MarkerOutcome::Rewritten)
            }
            MarkerRewrite::Unchanged => Ok(MarkerOutcome::AlreadyMigrated),
        }
    }

    /// Read the commit template; an unreadable template counts as missing.
    fn resolve_sign_off(&self) -> SignOff {
        let path = &self.config.paths.commit_template;
        let template = match self.workspace.read_file(path) {
            Ok(template) => template,
            Err(e) => {
                log::warn!("cannot read commit template {}: {}", path.display(), e);
                None
            }
        };
        SignOff::from_template(template.as_deref())
    }

    fn commit(&self, branch: &str, message: &str) -> Result<String> {
        let commit_failed = |err: InitError| InitError::CommitFailed {
            branch: branch.to_string(),
            reason: reason(err),
        };

        self.repo.stage_all().map_err(commit_failed)?;
        self.repo.commit(message).map_err(commit_failed)
    }
}
