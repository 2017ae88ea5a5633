use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{classify_git_failure, DeployError, Result};
use crate::process::{self, ExecOutput};

use super::GitOps;

/// Git operations backed by the `git` binary on `PATH`.
///
/// Each operation is a single subprocess invocation bound to a working
/// directory; non-zero exits are classified at this boundary into the
/// [DeployError] taxonomy.
pub struct GitCli {
    timeout: Duration,
}

impl GitCli {
    pub fn new() -> Self {
        GitCli {
            timeout: process::COMMAND_TIMEOUT,
        }
    }

    /// Override the per-command deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        GitCli { timeout }
    }

    fn git(&self, args: &[&str], tree: &Path) -> Result<ExecOutput> {
        let output = process::run_with_timeout("git", args, tree, self.timeout)?;

        if output.success {
            Ok(output)
        } else {
            Err(classify_git_failure(
                &process::command_line("git", args),
                output.code,
                &output.stdout,
                &output.stderr,
            ))
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitOps for GitCli {
    fn clone_repository(&self, url: &str, directory: &Path) -> Result<()> {
        self.git(&["clone", url], directory)?;
        Ok(())
    }

    fn remote_url(&self, tree: &Path) -> Result<String> {
        // `git config --get` exits 1 with empty stderr when the key is
        // absent; either way the directory does not hold the repository the
        // caller expects.
        let output = self
            .git(&["config", "--get", "remote.origin.url"], tree)
            .map_err(|err| match err {
                DeployError::Process { .. } => {
                    DeployError::InvalidGitRepository(tree.display().to_string())
                }
                other => other,
            })?;

        Ok(output.stdout)
    }

    fn local_root_path(&self, tree: &Path) -> Result<PathBuf> {
        let output = self.git(&["rev-parse", "--show-toplevel"], tree)?;
        Ok(PathBuf::from(output.stdout))
    }

    fn fetch_origin(&self, tree: &Path) -> Result<()> {
        self.git(&["fetch", "origin"], tree)?;
        Ok(())
    }

    fn validate_working_tree(&self, tree: &Path) -> Result<()> {
        let output = self.git(&["status", "--porcelain"], tree)?;

        if output.stdout.is_empty() {
            Ok(())
        } else {
            Err(DeployError::DirtyWorkingTree)
        }
    }

    fn current_branch(&self, tree: &Path) -> Result<String> {
        let output = self.git(&["symbolic-ref", "-q", "HEAD"], tree)?;
        // refs/heads/develop -> develop
        let name = output.stdout.rsplit('/').next().unwrap_or_default();
        Ok(name.to_string())
    }

    fn checkout_branch(&self, branch: &str, tree: &Path) -> Result<()> {
        self.git(
            &["-c", "advice.detachedHead=false", "checkout", "--quiet", branch],
            tree,
        )?;
        Ok(())
    }

    fn describe(&self, tree: &Path) -> Result<String> {
        Ok(self.git(&["describe"], tree)?.stdout)
    }

    fn pull(&self, tree: &Path) -> Result<()> {
        self.git(&["pull"], tree)?;
        Ok(())
    }

    fn merge_branch(&self, source: &str, tree: &Path) -> Result<()> {
        self.git(&["merge", "--no-ff", "--no-edit", source], tree)?;
        Ok(())
    }

    fn abort_merge(&self, tree: &Path) -> Result<()> {
        self.git(&["merge", "--abort"], tree)?;
        Ok(())
    }

    fn tag_branch(&self, tag: &str, tree: &Path, message: &str) -> Result<()> {
        self.git(&["tag", "-f", "-a", tag, "-m", message], tree)?;
        Ok(())
    }

    fn push(&self, tree: &Path) -> Result<()> {
        self.git(&["push"], tree)?;
        Ok(())
    }

    fn push_tags(&self, tree: &Path) -> Result<()> {
        self.git(&["push", "--tags", "-f"], tree)?;
        Ok(())
    }
}
