//! Source-control queries
//!
//! Version resolution needs two read-only facts from the working tree: the
//! commit being built and whether that commit carries the `latest` tag.
//! These are abstracted behind the [SourceControl] trait with two
//! implementations:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: a mock implementation for testing
//!
//! ```rust
//! # use npm_publish::scm::SourceControl;
//! # fn example<S: SourceControl>(scm: &S) -> npm_publish::Result<()> {
//! let commit = scm.current_commit()?;
//! if scm.is_tagged_latest(&commit)? {
//!     println!("{} is the latest release", commit);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Name of the git tag marking the latest release
pub const LATEST_TAG: &str = "latest";

/// Read-only source-control queries
///
/// All implementors must be `Send + Sync`. Errors (for example, not being
/// inside a repository) are returned rather than defaulted.
pub trait SourceControl: Send + Sync {
    /// Full id of the commit currently checked out
    fn current_commit(&self) -> Result<String>;

    /// Whether `commit` is the commit the `latest` tag points to
    ///
    /// A missing `latest` tag yields `Ok(false)`.
    fn is_tagged_latest(&self, commit: &str) -> Result<bool>;
}
