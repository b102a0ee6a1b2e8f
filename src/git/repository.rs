use crate::error::{InitError, Result};
use git2::build::CheckoutBuilder;
use git2::{
    BranchType, Cred, CredentialType, ErrorCode, FetchOptions, IndexAddOption, Oid, RemoteCallbacks,
    Repository as Git2Repo, Status, StatusOptions,
};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    root: PathBuf,
    repo: Option<Git2Repo>,
}

impl Git2Repository {
    /// Open the repository whose working tree root is `path`.
    ///
    /// Parent directories are not searched and bare repositories are rejected.
    /// A failed open is not an error here; it is reported through
    /// [super::Repository::is_repository_root] so that the caller decides when
    /// to check.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let root = path.as_ref().to_path_buf();
        let repo = match Git2Repo::open(&root) {
            Ok(repo) if !repo.is_bare() => Some(repo),
            Ok(_) => {
                log::debug!("{} is a bare repository", root.display());
                None
            }
            Err(e) => {
                log::debug!("cannot open repository at {}: {}", root.display(), e);
                None
            }
        };

        Git2Repository { root, repo }
    }

    fn repo(&self) -> Result<&Git2Repo> {
        self.repo.as_ref().ok_or_else(|| InitError::NotARepository {
            path: self.root.display().to_string(),
        })
    }
}

/// Credential callbacks for fetching over SSH or HTTPS.
///
/// Tries the usual key files under `~/.ssh`, then the SSH agent, then the
/// default credential helper.
fn credential_callbacks() -> RemoteCallbacks<'static> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        Cred::default()
    });
    callbacks
}

impl super::Repository for Git2Repository {
    fn is_repository_root(&self) -> bool {
        self.repo.is_some()
    }

    fn pending_changes(&self) -> Result<Vec<String>> {
        let repo = self.repo()?;

        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = repo.statuses(Some(&mut options))?;

        Ok(statuses
            .iter()
            .filter(|entry| entry.status() != Status::CURRENT)
            .filter_map(|entry| entry.path().map(|p| p.to_string()))
            .collect())
    }

    fn current_branch(&self) -> Result<Option<String>> {
        let repo = self.repo()?;

        match repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(|s| s.to_string())),
            Ok(_) => Ok(None),
            // No commits yet: HEAD still names the branch it will create
            Err(e) if e.code() == ErrorCode::UnbornBranch => {
                let head = repo.find_reference("HEAD")?;
                Ok(head
                    .symbolic_target()
                    .and_then(|target| target.strip_prefix("refs/heads/"))
                    .map(|s| s.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn head_commit(&self) -> Result<Option<String>> {
        let repo = self.repo()?;

        match repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?.id().to_string())),
            Err(e) if e.code() == ErrorCode::UnbornBranch => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        let repo = self.repo()?;

        let reference = repo.find_branch(branch, BranchType::Local)?.into_reference();
        let ref_name = reference
            .name()
            .ok_or_else(|| git2::Error::from_str("branch reference name is not valid UTF-8"))?
            .to_string();
        let commit = reference.peel_to_commit()?;

        repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
        repo.set_head(&ref_name)?;

        log::info!("checked out {}", branch);
        Ok(())
    }

    fn checkout_detached(&self, commit: &str) -> Result<()> {
        let repo = self.repo()?;

        let commit = repo.find_commit(Oid::from_str(commit)?)?;
        repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().safe()))?;
        repo.set_head_detached(commit.id())?;

        log::info!("checked out {} (detached)", commit.id());
        Ok(())
    }

    fn pull(&self, remote: &str, branch: &str) -> Result<()> {
        let repo = self.repo()?;

        let mut remote_handle = repo.find_remote(remote)?;
        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(credential_callbacks());

        let refspec = format!("+refs/heads/{}:refs/remotes/{}/{}", branch, remote, branch);
        remote_handle.fetch(&[refspec.as_str()], Some(&mut fetch_options), None)?;

        let tracking = repo.find_reference(&format!("refs/remotes/{}/{}", remote, branch))?;
        let incoming = repo.reference_to_annotated_commit(&tracking)?;
        let (analysis, _) = repo.merge_analysis(&[&incoming])?;

        if analysis.is_up_to_date() {
            log::info!("{} is up to date with {}/{}", branch, remote, branch);
            return Ok(());
        }

        if analysis.is_fast_forward() {
            let local_name = format!("refs/heads/{}", branch);
            let mut local = repo.find_reference(&local_name)?;
            local.set_target(
                incoming.id(),
                &format!("pull: fast-forward from {}/{}", remote, branch),
            )?;
            repo.set_head(&local_name)?;
            repo.checkout_head(Some(CheckoutBuilder::new().force()))?;

            log::info!("fast-forwarded {} to {}", branch, incoming.id());
            return Ok(());
        }

        Err(git2::Error::from_str(&format!(
            "local '{}' has diverged from '{}/{}' and cannot be fast-forwarded",
            branch, remote, branch
        ))
        .into())
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        let repo = self.repo()?;

        let head = repo.head()?.peel_to_commit()?;
        let branch = repo.branch(name, &head, false)?;
        let ref_name = branch
            .get()
            .name()
            .ok_or_else(|| git2::Error::from_str("branch reference name is not valid UTF-8"))?
            .to_string();

        // Same commit as HEAD, so the working tree needs no checkout
        repo.set_head(&ref_name)?;

        log::info!("created branch {} at {}", name, head.id());
        Ok(())
    }

    fn stage_all(&self) -> Result<()> {
        let repo = self.repo()?;

        let mut index = repo.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"], None)?;
        index.write()?;

        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let repo = self.repo()?;

        let signature = repo.signature()?;
        let tree_id = repo.index()?.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        let parent = repo.head()?.peel_to_commit()?;

        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        log::info!("committed {}", oid);
        Ok(oid.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use tempfile::TempDir;

    #[test]
    fn test_open_plain_directory_is_not_a_root() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repository::open(dir.path());
        assert!(!repo.is_repository_root());
        assert!(matches!(
            repo.pending_changes(),
            Err(InitError::NotARepository { .. })
        ));
    }

    #[test]
    fn test_open_subdirectory_is_not_a_root() {
        let dir = TempDir::new().unwrap();
        Git2Repo::init(dir.path()).unwrap();
        std::fs::create_dir(dir.path().join("hardware")).unwrap();

        assert!(!Git2Repository::open(dir.path().join("hardware")).is_repository_root());
        assert!(Git2Repository::open(dir.path()).is_repository_root());
    }

    #[test]
    fn test_unborn_head_reports_branch() {
        let dir = TempDir::new().unwrap();
        let mut opts = git2::RepositoryInitOptions::new();
        opts.initial_head("master");
        Git2Repo::init_opts(dir.path(), &opts).unwrap();

        let repo = Git2Repository::open(dir.path());
        assert_eq!(repo.current_branch().unwrap(), Some("master".to_string()));
        assert_eq!(repo.head_commit().unwrap(), None);
    }

    #[test]
    fn test_untracked_file_is_pending() {
        let dir = TempDir::new().unwrap();
        Git2Repo::init(dir.path()).unwrap();
        std::fs::create_dir(dir.path().join("production")).unwrap();
        std::fs::write(dir.path().join("production/board.zip"), "zip").unwrap();

        let repo = Git2Repository::open(dir.path());
        assert_eq!(
            repo.pending_changes().unwrap(),
            vec!["production/board.zip".to_string()]
        );
    }
}
