use crate::error::{NpmPublishError, Result};
use crate::scm::SourceControl;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock repository for testing without actual git operations
#[derive(Debug, Default)]
pub struct MockRepository {
    head: Option<String>,
    latest: Option<String>,
    queries: AtomicUsize,
}

impl MockRepository {
    /// Create a mock repository with no commits (queries fail)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the checked-out commit
    pub fn with_head(mut self, commit: impl Into<String>) -> Self {
        self.head = Some(commit.into());
        self
    }

    /// Point the `latest` tag at a commit
    pub fn with_latest_tag(mut self, commit: impl Into<String>) -> Self {
        self.latest = Some(commit.into());
        self
    }

    /// Number of queries made against this repository
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

fn not_a_repository() -> NpmPublishError {
    NpmPublishError::Git(git2::Error::from_str("could not find repository"))
}

impl SourceControl for MockRepository {
    fn current_commit(&self) -> Result<String> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.head
            .clone()
            .ok_or_else(not_a_repository)
    }

    fn is_tagged_latest(&self, commit: &str) -> Result<bool> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.head.is_none() {
            return Err(not_a_repository());
        }
        Ok(self.latest.as_deref() == Some(commit))
    }
}
