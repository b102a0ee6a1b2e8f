use crate::error::{InitError, Result};
use crate::git::Repository;
use std::cell::RefCell;
use std::collections::HashSet;

/// Operations a [MockRepository] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    PendingChanges,
    CurrentBranch,
    HeadCommit,
    Checkout,
    CheckoutDetached,
    Pull,
    CreateBranch,
    StageAll,
    Commit,
}

#[derive(Debug, Default)]
struct MockState {
    current: Option<String>,
    head_commit: Option<String>,
    branches: HashSet<String>,
    calls: Vec<String>,
    commits: Vec<String>,
}

/// HEAD commit of a fresh [MockRepository]
pub const INITIAL_COMMIT: &str = "00000000000000000000000000000000c0ffee00";

/// Mock repository for testing without actual git operations
///
/// Every trait call is recorded in order, queries included, so tests can
/// assert both what happened and what never happened.
pub struct MockRepository {
    is_root: bool,
    pending: Vec<String>,
    failures: HashSet<MockOp>,
    state: RefCell<MockState>,
}

impl MockRepository {
    /// A clean repository with `master` checked out
    pub fn new() -> Self {
        let mut branches = HashSet::new();
        branches.insert("master".to_string());

        MockRepository {
            is_root: true,
            pending: Vec::new(),
            failures: HashSet::new(),
            state: RefCell::new(MockState {
                current: Some("master".to_string()),
                head_commit: Some(INITIAL_COMMIT.to_string()),
                branches,
                ..MockState::default()
            }),
        }
    }

    /// A directory that is not a repository root
    pub fn not_a_repository() -> Self {
        MockRepository {
            is_root: false,
            ..Self::new()
        }
    }

    /// Add a local branch and check it out
    pub fn on_branch(self, branch: impl Into<String>) -> Self {
        let branch = branch.into();
        {
            let mut state = self.state.borrow_mut();
            state.branches.insert(branch.clone());
            state.current = Some(branch);
        }
        self
    }

    /// Detach HEAD at the current commit
    pub fn detached(self) -> Self {
        self.state.borrow_mut().current = None;
        self
    }

    /// Detach HEAD at `commit`
    pub fn detached_at(self, commit: impl Into<String>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.current = None;
            state.head_commit = Some(commit.into());
        }
        self
    }

    /// Add a local branch without checking it out
    pub fn with_branch(self, branch: impl Into<String>) -> Self {
        self.state.borrow_mut().branches.insert(branch.into());
        self
    }

    /// Report these paths as pending changes
    pub fn with_pending(mut self, paths: &[&str]) -> Self {
        self.pending = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Make an operation fail
    pub fn failing(mut self, op: MockOp) -> Self {
        self.failures.insert(op);
        self
    }

    /// Recorded calls, in order
    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    /// Messages of commits created through this mock
    pub fn commits(&self) -> Vec<String> {
        self.state.borrow().commits.clone()
    }

    /// Currently checked-out branch
    pub fn head(&self) -> Option<String> {
        self.state.borrow().current.clone()
    }

    /// Commit HEAD points at
    pub fn head_id(&self) -> Option<String> {
        self.state.borrow().head_commit.clone()
    }

    pub fn has_branch(&self, name: &str) -> bool {
        self.state.borrow().branches.contains(name)
    }

    fn record(&self, op: MockOp, call: String) -> Result<()> {
        self.state.borrow_mut().calls.push(call.clone());
        if self.failures.contains(&op) {
            return Err(InitError::Git(git2::Error::from_str(&format!(
                "mock failure: {}",
                call
            ))));
        }
        Ok(())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn is_repository_root(&self) -> bool {
        self.state.borrow_mut().calls.push("is_repository_root".to_string());
        self.is_root
    }

    fn pending_changes(&self) -> Result<Vec<String>> {
        self.record(MockOp::PendingChanges, "pending_changes".to_string())?;
        Ok(self.pending.clone())
    }

    fn current_branch(&self) -> Result<Option<String>> {
        self.record(MockOp::CurrentBranch, "current_branch".to_string())?;
        Ok(self.head())
    }

    fn head_commit(&self) -> Result<Option<String>> {
        self.record(MockOp::HeadCommit, "head_commit".to_string())?;
        Ok(self.head_id())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record(MockOp::Checkout, format!("checkout {}", branch))?;
        let mut state = self.state.borrow_mut();
        if !state.branches.contains(branch) {
            return Err(InitError::Git(git2::Error::from_str(&format!(
                "branch '{}' not found",
                branch
            ))));
        }
        state.current = Some(branch.to_string());
        Ok(())
    }

    fn checkout_detached(&self, commit: &str) -> Result<()> {
        self.record(MockOp::CheckoutDetached, format!("checkout_detached {}", commit))?;
        let mut state = self.state.borrow_mut();
        state.current = None;
        state.head_commit = Some(commit.to_string());
        Ok(())
    }

    fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(MockOp::Pull, format!("pull {} {}", remote, branch))
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.record(MockOp::CreateBranch, format!("create_branch {}", name))?;
        let mut state = self.state.borrow_mut();
        if !state.branches.insert(name.to_string()) {
            return Err(InitError::Git(git2::Error::from_str(&format!(
                "a branch named '{}' already exists",
                name
            ))));
        }
        state.current = Some(name.to_string());
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        self.record(MockOp::StageAll, "stage_all".to_string())
    }

    fn commit(&self, message: &str) -> Result<String> {
        self.record(MockOp::Commit, "commit".to_string())?;
        let mut state = self.state.borrow_mut();
        state.commits.push(message.to_string());
        let id = format!("{:040x}", state.commits.len());
        state.head_commit = Some(id.clone());
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.is_repository_root());
        assert!(repo.pending_changes().unwrap().is_empty());
        assert_eq!(repo.current_branch().unwrap(), Some("master".to_string()));
    }

    #[test]
    fn test_mock_records_calls_in_order() {
        let repo = MockRepository::new();
        repo.checkout("master").unwrap();
        repo.pull("origin", "master").unwrap();
        repo.create_branch("1.0.0_Dev").unwrap();

        assert_eq!(
            repo.calls(),
            vec!["checkout master", "pull origin master", "create_branch 1.0.0_Dev"]
        );
        assert_eq!(repo.head(), Some("1.0.0_Dev".to_string()));
    }

    #[test]
    fn test_mock_rejects_duplicate_branch() {
        let repo = MockRepository::new().with_branch("1.0.0_Dev");
        assert!(repo.create_branch("1.0.0_Dev").is_err());
        assert_eq!(repo.head(), Some("master".to_string()));
    }

    #[test]
    fn test_mock_checkout_unknown_branch() {
        let repo = MockRepository::new();
        assert!(repo.checkout("main").is_err());
    }

    #[test]
    fn test_mock_detached_checkout() {
        let repo = MockRepository::new().detached_at("abc123");
        assert_eq!(repo.current_branch().unwrap(), None);
        assert_eq!(repo.head_commit().unwrap(), Some("abc123".to_string()));

        repo.checkout("master").unwrap();
        repo.checkout_detached("abc123").unwrap();
        assert_eq!(repo.head(), None);
        assert_eq!(repo.head_id(), Some("abc123".to_string()));
    }

    #[test]
    fn test_mock_failure_injection() {
        let repo = MockRepository::new().failing(MockOp::Pull);
        let err = repo.pull("origin", "master").unwrap_err();
        assert!(err.to_string().contains("mock failure: pull origin master"));
    }

    #[test]
    fn test_mock_commit_ids_are_distinct() {
        let repo = MockRepository::new();
        let first = repo.commit("one").unwrap();
        let second = repo.commit("two").unwrap();
        assert_ne!(first, second);
        assert_eq!(first.len(), 40);
        assert_eq!(repo.commits(), vec!["one", "two"]);
        assert_eq!(repo.head_id(), Some(second));
    }
}
