use crate::error::{NpmPublishError, Result};
use crate::scm::{SourceControl, LATEST_TAG};
use git2::{ObjectType, Oid, Repository as Git2Repo};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    path: PathBuf,
    repo: Mutex<Option<Git2Repo>>,
}

impl Git2Repository {
    /// Open or discover a git repository
    ///
    /// Fails when `path` is not inside a working tree.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path.as_ref())?;

        Ok(Git2Repository {
            path: path.as_ref().to_path_buf(),
            repo: Mutex::new(Some(repo)),
        })
    }

    /// Discover the repository on first query instead of up front
    ///
    /// Callers that never query (prealpha builds, a release build missing
    /// its tag) work outside a checkout; the first query fails there.
    pub fn lazy<P: AsRef<Path>>(path: P) -> Self {
        Git2Repository {
            path: path.as_ref().to_path_buf(),
            repo: Mutex::new(None),
        }
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            path: repo.path().to_path_buf(),
            repo: Mutex::new(Some(repo)),
        }
    }

    fn with_repo<T>(&self, f: impl FnOnce(&Git2Repo) -> Result<T>) -> Result<T> {
        let mut guard = self
            .repo
            .lock()
            .map_err(|_| NpmPublishError::Git(git2::Error::from_str("repository lock poisoned")))?;

        if guard.is_none() {
            log::debug!("discovering git repository from {}", self.path.display());
            *guard = Some(Git2Repo::discover(&self.path)?);
        }

        match guard.as_ref() {
            Some(repo) => f(repo),
            None => Err(NpmPublishError::Git(git2::Error::from_str(
                "could not find repository",
            ))),
        }
    }
}

impl SourceControl for Git2Repository {
    fn current_commit(&self) -> Result<String> {
        self.with_repo(|repo| {
            let commit = repo.head()?.peel_to_commit()?;

            Ok(commit.id().to_string())
        })
    }

    fn is_tagged_latest(&self, commit: &str) -> Result<bool> {
        self.with_repo(|repo| {
            let reference_name = format!("refs/tags/{}", LATEST_TAG);

            let tagged = match repo.find_reference(&reference_name) {
                Ok(reference) => reference.peel(ObjectType::Commit)?.id(),
                Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(false),
                Err(e) => return Err(e.into()),
            };

            let oid = Oid::from_str(commit)?;
            log::debug!("'{}' tag points at {}", LATEST_TAG, tagged);
            Ok(tagged == oid)
        })
    }
}
