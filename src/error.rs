use std::fmt;

use thiserror::Error;

/// Which half of the trunk synchronisation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStage {
    Checkout,
    Pull,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStage::Checkout => write!(f, "checkout"),
            SyncStage::Pull => write!(f, "pull"),
        }
    }
}

/// Terminal failures of a branch initialization run.
///
/// Every variant is reported to the operator as-is; nothing is retried.
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Invalid branch name '{name}': expected format Major.Minor.Revision_Dev (e.g. 1.0.1_Dev)")]
    InvalidFormat { name: String },

    #[error("Not a git repository: {path}")]
    NotARepository { path: String },

    #[error("Working tree has {} pending change(s)", .paths.len())]
    DirtyWorkingTree { paths: Vec<String> },

    #[error("Failed to sync '{branch}' ({stage}): {reason}")]
    SyncFailed {
        stage: SyncStage,
        branch: String,
        reason: String,
    },

    #[error("Failed to create branch '{branch}': {reason}")]
    BranchCreateFailed { branch: String, reason: String },

    #[error("Configuration file missing: {path}")]
    ConfigFileMissing { path: String },

    #[error("Failed to commit on branch '{branch}': {reason}")]
    CommitFailed { branch: String, reason: String },

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in init-dev-branch
pub type Result<T> = std::result::Result<T, InitError>;

impl InitError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        InitError::Config(msg.into())
    }

    /// Operator guidance for the likely cause of this error.
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            InitError::InvalidFormat { .. } => vec![
                "Pass the branch name as Major.Minor.Revision_Dev, e.g. 1.0.1_Dev".to_string(),
            ],
            InitError::NotARepository { .. } => vec![
                "Run from the repository root, or pass it with --repo <PATH>".to_string(),
            ],
            InitError::DirtyWorkingTree { .. } => vec![
                "Commit pending changes: git add -A && git commit".to_string(),
                "Stash changes temporarily: git stash --include-untracked".to_string(),
            ],
            InitError::SyncFailed {
                stage: SyncStage::Checkout,
                branch,
                ..
            } => vec![format!(
                "Check that the local branch '{}' exists: git branch --list {}",
                branch, branch
            )],
            InitError::SyncFailed {
                stage: SyncStage::Pull,
                branch,
                ..
            } => vec![
                "Check network access and credentials: git remote -v".to_string(),
                format!(
                    "Reconcile a diverged '{}' manually, then run again",
                    branch
                ),
            ],
            InitError::BranchCreateFailed { branch, .. } => vec![
                format!("A branch named '{}' may already exist: git branch --list {}", branch, branch),
                format!("Delete it if it is stale: git branch -D {}", branch),
            ],
            InitError::ConfigFileMissing { path } => vec![
                format!("Restore '{}' on the trunk branch", path),
                "The new branch is left checked out; fix the file and commit manually".to_string(),
            ],
            InitError::CommitFailed { .. } => vec![
                "Set an identity: git config user.name and git config user.email".to_string(),
                "The new branch is left checked out; inspect with git status and commit manually"
                    .to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_format_mentions_expected_shape() {
        let err = InitError::InvalidFormat {
            name: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'abc'"));
        assert!(msg.contains("Major.Minor.Revision_Dev"));
    }

    #[test]
    fn test_dirty_tree_counts_paths() {
        let err = InitError::DirtyWorkingTree {
            paths: vec!["a.txt".to_string(), "b/c.txt".to_string()],
        };
        assert_eq!(err.to_string(), "Working tree has 2 pending change(s)");
    }

    #[test]
    fn test_sync_failed_names_stage() {
        let err = InitError::SyncFailed {
            stage: SyncStage::Pull,
            branch: "master".to_string(),
            reason: "remote hung up".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("(pull)"));
        assert!(msg.contains("remote hung up"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InitError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_git2() {
        let err: InitError = git2::Error::from_str("bad ref").into();
        assert_eq!(err.to_string(), "Git operation failed: bad ref");
    }

    #[test]
    fn test_every_variant_has_suggestions() {
        let errors = vec![
            InitError::InvalidFormat {
                name: "x".to_string(),
            },
            InitError::NotARepository {
                path: "/tmp".to_string(),
            },
            InitError::DirtyWorkingTree { paths: vec![] },
            InitError::SyncFailed {
                stage: SyncStage::Checkout,
                branch: "master".to_string(),
                reason: "x".to_string(),
            },
            InitError::BranchCreateFailed {
                branch: "1.0.0_Dev".to_string(),
                reason: "exists".to_string(),
            },
            InitError::ConfigFileMissing {
                path: "ci.yml".to_string(),
            },
            InitError::CommitFailed {
                branch: "1.0.0_Dev".to_string(),
                reason: "x".to_string(),
            },
            InitError::config("bad toml"),
        ];

        for err in errors {
            assert!(!err.recovery_suggestions().is_empty(), "{:?}", err);
        }
    }

    #[test]
    fn test_pull_suggestions_name_branch() {
        let err = InitError::SyncFailed {
            stage: SyncStage::Pull,
            branch: "trunk".to_string(),
            reason: "diverged".to_string(),
        };
        assert!(err
            .recovery_suggestions()
            .iter()
            .any(|s| s.contains("'trunk'")));
    }
}
