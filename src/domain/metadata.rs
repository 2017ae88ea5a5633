use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::git::GitOps;

use super::branch::Branch;

/// Everything the release workflow needs to know about the repository,
/// captured once per run and read-only afterwards.
#[derive(Debug, Clone)]
pub struct GitMetadata {
    /// Repository name derived from the remote URL.
    pub name: String,
    /// Remote origin URL.
    pub url: String,
    /// Top-level directory of the deployment working tree.
    pub working_tree: PathBuf,
    pub deploy_branch: Branch,
    pub main_branch: Branch,
}

impl GitMetadata {
    /// Builds the metadata from the live state of `tree`.
    ///
    /// The tree must be clean: collection fails with
    /// [crate::error::DeployError::DirtyWorkingTree] before any branch is
    /// checked out otherwise.
    pub fn collect(
        git: &dyn GitOps,
        tree: &Path,
        deploy_branch: &str,
        main_branch: &str,
    ) -> Result<Self> {
        let url = git.remote_url(tree)?;
        git.validate_working_tree(tree)?;
        let working_tree = git.local_root_path(tree)?;

        let deploy_branch = Branch::new(deploy_branch, git.current_tag(deploy_branch, tree)?);
        let main_branch = Branch::new(main_branch, git.current_tag(main_branch, tree)?);

        Ok(GitMetadata {
            name: repo_name_from_url(&url),
            url,
            working_tree,
            deploy_branch,
            main_branch,
        })
    }
}

/// Repository name from its remote URL: the basename with any trailing
/// `.git` stripped.
pub fn repo_name_from_url(url: &str) -> String {
    let base = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(url);
    let base = base.rsplit(':').next().unwrap_or(base);
    base.strip_suffix(".git").unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeployError;
    use crate::git::MockGit;

    #[test]
    fn test_repo_name_from_url() {
        assert_eq!(repo_name_from_url("https://example.com/org/demo.git"), "demo");
        assert_eq!(repo_name_from_url("https://example.com/org/demo"), "demo");
        assert_eq!(repo_name_from_url("git@example.com:org/demo.git"), "demo");
        assert_eq!(repo_name_from_url("git@example.com:demo.git"), "demo");
    }

    #[test]
    fn test_collect_builds_both_branches() {
        let tree = Path::new("/srv/deploy/demo");
        let mock = MockGit::new()
            .with_remote_url(tree, "https://example.com/org/demo.git")
            .with_current_branch("master")
            .with_branch_tag("develop", "1.3.0-rc.2")
            .with_branch_tag("master", "1.2.0");

        let metadata = GitMetadata::collect(&mock, tree, "develop", "master").unwrap();

        assert_eq!(metadata.name, "demo");
        assert_eq!(metadata.url, "https://example.com/org/demo.git");
        assert_eq!(metadata.working_tree, tree);
        assert_eq!(metadata.deploy_branch.tag, "1.3.0-rc.2");
        assert_eq!(metadata.main_branch.tag, "1.2.0");
        assert_eq!(metadata.deploy_branch.version.revision, "2");
        assert!(metadata.main_branch.version.is_final());
    }

    #[test]
    fn test_collect_dirty_tree_stops_before_any_checkout() {
        let tree = Path::new("/srv/deploy/demo");
        let mock = MockGit::new()
            .with_remote_url(tree, "https://example.com/org/demo.git")
            .dirty();

        let result = GitMetadata::collect(&mock, tree, "develop", "master");
        assert!(matches!(result, Err(DeployError::DirtyWorkingTree)));
        assert!(!mock.calls().iter().any(|c| c.starts_with("checkout")));
    }

    #[test]
    fn test_collect_restores_original_branch() {
        let tree = Path::new("/srv/deploy/demo");
        let mock = MockGit::new()
            .with_remote_url(tree, "https://example.com/org/demo.git")
            .with_current_branch("master")
            .with_branch_tag("develop", "1.3.0-rc.2")
            .with_branch_tag("master", "1.2.0");

        GitMetadata::collect(&mock, tree, "develop", "master").unwrap();
        assert_eq!(mock.current_branch(tree).unwrap(), "master");
    }
}
