//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git actions the
//! release workflow performs, allowing for multiple implementations
//! including the real git binary and a mock implementation for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [GitOps] trait, which names every git
//! action used by git-deploy. The concrete implementations include:
//!
//! - [cli::GitCli]: the real implementation, shelling out to `git`
//! - [mock::MockGit]: a scriptable implementation for testing
//!
//! Most code should depend on the [GitOps] trait rather than concrete
//! implementations to enable easy testing and flexibility.

pub mod cli;
pub mod mock;

pub use cli::GitCli;
pub use mock::MockGit;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Common git operation trait for abstraction
///
/// Operations are synchronous and block until the subprocess exits or its
/// timeout elapses. None of them retry; every failure propagates to the
/// caller already classified (see [crate::error::classify_git_failure]).
///
/// All implementors must be `Send + Sync` to allow safe sharing across
/// threads.
pub trait GitOps: Send + Sync {
    /// `git clone <url>` run inside `directory`.
    fn clone_repository(&self, url: &str, directory: &Path) -> Result<()>;

    /// The `origin` remote URL of `tree` (`git config --get remote.origin.url`).
    ///
    /// Fails with [crate::error::DeployError::InvalidGitRepository] when the
    /// directory does not hold a repository with an origin remote.
    fn remote_url(&self, tree: &Path) -> Result<String>;

    /// Absolute path of the top-level directory of the working tree
    /// (`git rev-parse --show-toplevel`).
    fn local_root_path(&self, tree: &Path) -> Result<PathBuf>;

    /// `git fetch origin`: refreshes remote refs without merging.
    fn fetch_origin(&self, tree: &Path) -> Result<()>;

    /// Fails with [crate::error::DeployError::DirtyWorkingTree] when
    /// `git status --porcelain` reports any tracked or untracked change.
    fn validate_working_tree(&self, tree: &Path) -> Result<()>;

    /// Short name of the branch HEAD points at (`git symbolic-ref -q HEAD`).
    fn current_branch(&self, tree: &Path) -> Result<String>;

    /// Checks out `branch`, detached-head advice suppressed.
    fn checkout_branch(&self, branch: &str, tree: &Path) -> Result<()>;

    /// `git describe` for whatever is currently checked out.
    fn describe(&self, tree: &Path) -> Result<String>;

    /// `git pull`.
    fn pull(&self, tree: &Path) -> Result<()>;

    /// Non-fast-forward merge of `source` into the current branch
    /// (`git merge --no-ff --no-edit <source>`).
    fn merge_branch(&self, source: &str, tree: &Path) -> Result<()>;

    /// `git merge --abort`; used exclusively for rollback.
    fn abort_merge(&self, tree: &Path) -> Result<()>;

    /// Creates or force-moves an annotated tag
    /// (`git tag -f -a <tag> -m <message>`).
    fn tag_branch(&self, tag: &str, tree: &Path, message: &str) -> Result<()>;

    /// `git push`.
    fn push(&self, tree: &Path) -> Result<()>;

    /// `git push --tags -f`; forced so a release candidate can be re-tagged.
    fn push_tags(&self, tree: &Path) -> Result<()>;

    /// Current `git describe` output for `branch`.
    ///
    /// Checks the branch out when it is not already current and restores the
    /// previously checked-out branch afterwards. The restore runs on the
    /// failure path too; the tree must never be left on the wrong branch
    /// because the describe step errored.
    fn current_tag(&self, branch: &str, tree: &Path) -> Result<String> {
        let original = self.current_branch(tree)?;

        if original == branch {
            return self.describe(tree);
        }

        self.checkout_branch(branch, tree)?;
        let described = self.describe(tree);
        let restored = self.checkout_branch(&original, tree);

        let tag = described?;
        restored?;

        Ok(tag)
    }
}
