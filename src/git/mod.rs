//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! operations a development branch needs, so the initialization sequence can
//! run against a real repository or a recording mock.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A recording mock for testing
//!
//! # Usage
//!
//! ```rust
//! # use init_dev_branch::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> init_dev_branch::Result<()> {
//! if repo.pending_changes()?.is_empty() {
//!     repo.checkout("master")?;
//!     repo.pull("origin", "master")?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Version-control operations consumed by the branch initializer.
///
/// ## Error Handling
///
/// All fallible methods return [crate::error::Result<T>]. Implementations
/// surface collaborator failures as [crate::error::InitError::Git]; the
/// initializer maps them onto the step that was running.
///
/// ## Concurrency
///
/// A single run drives the repository serially. Two runs against the same
/// working tree are not coordinated.
pub trait Repository {
    /// Whether a repository root exists at the configured location.
    fn is_repository_root(&self) -> bool;

    /// Paths with staged, unstaged or untracked changes.
    ///
    /// An empty list means the working tree is clean. Ignored files are not
    /// reported.
    fn pending_changes(&self) -> Result<Vec<String>>;

    /// Short name of the checked-out branch, or `None` for a detached HEAD.
    fn current_branch(&self) -> Result<Option<String>>;

    /// Id of the commit HEAD points at, or `None` before the first commit.
    fn head_commit(&self) -> Result<Option<String>>;

    /// Switch the working tree to an existing local branch.
    fn checkout(&self, branch: &str) -> Result<()>;

    /// Check out `commit` with HEAD detached.
    fn checkout_detached(&self, commit: &str) -> Result<()>;

    /// Fetch `branch` from `remote` and merge it into the local branch of the
    /// same name, which must be checked out.
    fn pull(&self, remote: &str, branch: &str) -> Result<()>;

    /// Create `name` at HEAD and check it out. Fails if `name` already exists.
    fn create_branch(&self, name: &str) -> Result<()>;

    /// Stage every change in the working tree, deletions included.
    fn stage_all(&self) -> Result<()>;

    /// Commit the index onto HEAD and return the new commit id.
    fn commit(&self, message: &str) -> Result<String>;
}
