use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::metadata::repo_name_from_url;
use crate::error::{DeployError, Result};

use super::GitOps;

/// Scriptable [GitOps] implementation for testing without real git.
///
/// Every operation is recorded in call order so tests can assert on the
/// exact command sequence, and failures can be staged: a dirty tree, a
/// conflicting merge source, or a branch whose describe step errors.
pub struct MockGit {
    state: Mutex<MockState>,
}

struct MockState {
    remote_urls: HashMap<PathBuf, String>,
    branch_tags: HashMap<String, String>,
    current_branch: String,
    dirty: bool,
    conflict_sources: Vec<String>,
    describe_failures: Vec<String>,
    calls: Vec<String>,
}

impl Default for MockState {
    fn default() -> Self {
        MockState {
            remote_urls: HashMap::new(),
            branch_tags: HashMap::new(),
            current_branch: "develop".to_string(),
            dirty: false,
            conflict_sources: Vec::new(),
            describe_failures: Vec::new(),
            calls: Vec::new(),
        }
    }
}

impl MockGit {
    pub fn new() -> Self {
        MockGit {
            state: Mutex::new(MockState::default()),
        }
    }

    /// Registers the origin URL reported for `tree`.
    pub fn with_remote_url(self, tree: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        self.lock().remote_urls.insert(tree.into(), url.into());
        self
    }

    /// Sets the `git describe` output for a branch.
    pub fn with_branch_tag(self, branch: impl Into<String>, tag: impl Into<String>) -> Self {
        self.lock().branch_tags.insert(branch.into(), tag.into());
        self
    }

    /// Sets the branch HEAD currently points at.
    pub fn with_current_branch(self, branch: impl Into<String>) -> Self {
        self.lock().current_branch = branch.into();
        self
    }

    /// Makes `validate_working_tree` fail.
    pub fn dirty(self) -> Self {
        self.lock().dirty = true;
        self
    }

    /// Makes merging `source` fail with a conflict.
    pub fn conflict_on_merge_of(self, source: impl Into<String>) -> Self {
        self.lock().conflict_sources.push(source.into());
        self
    }

    /// Makes `describe` fail while `branch` is checked out.
    pub fn fail_describe_on(self, branch: impl Into<String>) -> Self {
        self.lock().describe_failures.push(branch.into());
        self
    }

    /// Snapshot of the recorded operations, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: impl Into<String>) {
        self.lock().calls.push(call.into());
    }
}

impl Default for MockGit {
    fn default() -> Self {
        Self::new()
    }
}

impl GitOps for MockGit {
    fn clone_repository(&self, url: &str, directory: &Path) -> Result<()> {
        self.record(format!("clone {}", url));
        // A clone materializes the repository under <directory>/<name>.
        let tree = directory.join(repo_name_from_url(url));
        self.lock().remote_urls.insert(tree, url.to_string());
        Ok(())
    }

    fn remote_url(&self, tree: &Path) -> Result<String> {
        self.record(format!("remote-url {}", tree.display()));
        self.lock()
            .remote_urls
            .get(tree)
            .cloned()
            .ok_or_else(|| DeployError::InvalidGitRepository(tree.display().to_string()))
    }

    fn local_root_path(&self, tree: &Path) -> Result<PathBuf> {
        self.record("rev-parse");
        Ok(tree.to_path_buf())
    }

    fn fetch_origin(&self, _tree: &Path) -> Result<()> {
        self.record("fetch origin");
        Ok(())
    }

    fn validate_working_tree(&self, _tree: &Path) -> Result<()> {
        self.record("status");
        if self.lock().dirty {
            Err(DeployError::DirtyWorkingTree)
        } else {
            Ok(())
        }
    }

    fn current_branch(&self, _tree: &Path) -> Result<String> {
        self.record("symbolic-ref");
        Ok(self.lock().current_branch.clone())
    }

    fn checkout_branch(&self, branch: &str, _tree: &Path) -> Result<()> {
        self.record(format!("checkout {}", branch));
        self.lock().current_branch = branch.to_string();
        Ok(())
    }

    fn describe(&self, _tree: &Path) -> Result<String> {
        self.record("describe");
        let state = self.lock();
        let branch = state.current_branch.clone();

        if state.describe_failures.contains(&branch) {
            return Err(DeployError::process(
                "git describe",
                Some(128),
                "fatal: No names found, cannot describe anything.",
            ));
        }

        Ok(state.branch_tags.get(&branch).cloned().unwrap_or_default())
    }

    fn pull(&self, _tree: &Path) -> Result<()> {
        self.record("pull");
        Ok(())
    }

    fn merge_branch(&self, source: &str, _tree: &Path) -> Result<()> {
        self.record(format!("merge {}", source));
        if self.lock().conflict_sources.iter().any(|s| s == source) {
            Err(DeployError::MergeConflict)
        } else {
            Ok(())
        }
    }

    fn abort_merge(&self, _tree: &Path) -> Result<()> {
        self.record("merge --abort");
        Ok(())
    }

    fn tag_branch(&self, tag: &str, _tree: &Path, _message: &str) -> Result<()> {
        self.record(format!("tag {}", tag));
        Ok(())
    }

    fn push(&self, _tree: &Path) -> Result<()> {
        self.record("push");
        Ok(())
    }

    fn push_tags(&self, _tree: &Path) -> Result<()> {
        self.record("push --tags");
        Ok(())
    }
}
