//! Release workflow sequencing.
//!
//! [ReleaseWorkflow::run] drives one release from working-tree acquisition
//! through merge, tag, push and reconciliation. Steps are strictly ordered:
//! each depends on the tree state (checked-out branch, merge state) left by
//! the previous one. The only recovery anywhere is `merge --abort` on a
//! merge conflict; every other failure ends the run where it happened.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog;
use crate::changelog;
use crate::config::Config;
use crate::domain::metadata::repo_name_from_url;
use crate::domain::GitMetadata;
use crate::error::{DeployError, Result};
use crate::git::GitOps;
use crate::ui::{self, Prompter};

/// How a release run ended.
#[derive(Debug)]
pub enum Outcome {
    /// Main was tagged and pushed, and the release history was merged back
    /// into the deploy branch.
    Done { release_tag: String },
    /// Main was tagged and pushed, but propagating the release back into
    /// the deploy branch failed. The release itself stands.
    DoneReconcileFailed {
        release_tag: String,
        error: DeployError,
    },
    /// The operator declined; nothing of consequence was mutated.
    Aborted,
}

/// One release run against one deployment working tree.
pub struct ReleaseWorkflow<'a> {
    git: &'a dyn GitOps,
    config: &'a Config,
}

impl<'a> ReleaseWorkflow<'a> {
    pub fn new(git: &'a dyn GitOps, config: &'a Config) -> Self {
        ReleaseWorkflow { git, config }
    }

    /// Runs the whole release sequence.
    ///
    /// `source_tree` is the repository the command was invoked from; its
    /// origin URL decides which deployment working tree is used. The
    /// operator confirms the merge before anything is mutated.
    pub fn run(
        &self,
        source_tree: &Path,
        merge_branch: &str,
        main_branch: &str,
        prompt: &mut dyn Prompter,
    ) -> Result<Outcome> {
        ui::display_status("Initializing local deployment working tree");
        let Some(tree) = self.acquire_working_tree(source_tree, prompt)? else {
            return Ok(Outcome::Aborted);
        };

        ui::display_status("Fetching references and metadata from origin");
        self.git.fetch_origin(&tree)?;

        ui::display_status("Validating working tree");
        self.git.validate_working_tree(&tree)?;

        let metadata = GitMetadata::collect(self.git, &tree, merge_branch, main_branch)?;
        ui::display_repository_summary(&metadata);
        ui::display_branch_versions(&metadata);

        let changelog =
            changelog::release_excerpt(&metadata.working_tree.join(&self.config.changelog))?;
        ui::display_changelog(&changelog);

        let suggestion = metadata.main_branch.version.release_candidate_suggestion();
        let release_tag =
            prompt.ask("Please enter the tag reference for this release", &suggestion)?;

        let question = format!(
            "Do you want to merge \"{}\" into \"{}\" and reference it with tag \"{}\" \
             using the changelog above?",
            metadata.deploy_branch.name, metadata.main_branch.name, release_tag
        );
        if !prompt.confirm(&question, false)? {
            return Ok(Outcome::Aborted);
        }

        for po_file in &self.config.lc_message_catalogs {
            ui::display_status(&format!("Compiling message catalog \"{}\"", po_file));
            catalog::compile_message_catalog(po_file)?;
        }

        self.merge_and_tag(&metadata, &release_tag, &changelog.join("\n"))?;

        // The release stands once main is tagged and pushed; a reconcile
        // failure is reported, not rolled back.
        match self.reconcile(&metadata) {
            Ok(()) => Ok(Outcome::Done { release_tag }),
            Err(error) => Ok(Outcome::DoneReconcileFailed { release_tag, error }),
        }
    }

    /// Ensures a deployment working tree for the repository `source_tree`
    /// belongs to, under the configured base deploy path.
    ///
    /// An existing tree is reused when its origin URL matches. On a
    /// mismatch the operator decides whether to delete and re-clone;
    /// returns `None` when they decline.
    pub fn acquire_working_tree(
        &self,
        source_tree: &Path,
        prompt: &mut dyn Prompter,
    ) -> Result<Option<PathBuf>> {
        let url = self.git.remote_url(source_tree)?;
        let name = repo_name_from_url(&url);

        let base = PathBuf::from(&self.config.base_deploy_path);
        fs::create_dir_all(&base).map_err(|e| {
            DeployError::invalid_path(format!("Cannot create \"{}\": {}", base.display(), e))
        })?;
        let deploy_tree = base.join(&name);

        match self.git.remote_url(&deploy_tree) {
            Ok(existing) if existing == url => return Ok(Some(deploy_tree)),
            Ok(_) => {
                ui::display_warning(&format!(
                    "The deployment working tree \"{}\" contains the wrong repository.",
                    deploy_tree.display()
                ));
                if !prompt.confirm(
                    &format!("Would you like to delete \"{}\"?", deploy_tree.display()),
                    true,
                )? {
                    return Ok(None);
                }
                self.delete_tree(&deploy_tree)?;
            }
            Err(_) if deploy_tree.exists() => {
                // Present but not a usable repository; same decision.
                ui::display_warning(&format!(
                    "The deployment working tree \"{}\" is not a repository.",
                    deploy_tree.display()
                ));
                if !prompt.confirm(
                    &format!("Would you like to delete \"{}\"?", deploy_tree.display()),
                    true,
                )? {
                    return Ok(None);
                }
                self.delete_tree(&deploy_tree)?;
            }
            Err(_) => {}
        }

        ui::display_status(&format!(
            "Cloning \"{}\" to \"{}\"",
            url,
            deploy_tree.display()
        ));
        self.git.clone_repository(&url, &base)?;

        Ok(Some(deploy_tree))
    }

    /// The merge/tag/push sequence.
    ///
    /// On a merge conflict the merge is aborted and the conflict re-raised,
    /// leaving main at its pre-merge state. A failure after the merge (tag
    /// or push) is surfaced without undoing prior steps.
    pub fn merge_and_tag(
        &self,
        metadata: &GitMetadata,
        release_tag: &str,
        message: &str,
    ) -> Result<()> {
        let tree = metadata.working_tree.as_path();

        self.git.checkout_branch(&metadata.deploy_branch.name, tree)?;
        self.git.pull(tree)?;

        self.git.checkout_branch(&metadata.main_branch.name, tree)?;
        self.git.pull(tree)?;

        self.merge_or_abort(&metadata.deploy_branch.name, tree)?;

        self.git.tag_branch(release_tag, tree, message)?;
        self.git.push(tree)?;
        self.git.push_tags(tree)?;

        Ok(())
    }

    /// Propagates the release commit and tag history back into the deploy
    /// branch.
    pub fn reconcile(&self, metadata: &GitMetadata) -> Result<()> {
        let tree = metadata.working_tree.as_path();

        self.git.checkout_branch(&metadata.deploy_branch.name, tree)?;
        self.git.pull(tree)?;

        self.merge_or_abort(&metadata.main_branch.name, tree)?;
        self.git.push(tree)?;

        Ok(())
    }

    fn merge_or_abort(&self, source: &str, tree: &Path) -> Result<()> {
        match self.git.merge_branch(source, tree) {
            Err(DeployError::MergeConflict) => {
                ui::display_warning("Aborting git merge...");
                self.git.abort_merge(tree)?;
                Err(DeployError::MergeConflict)
            }
            other => other,
        }
    }

    fn delete_tree(&self, tree: &Path) -> Result<()> {
        fs::remove_dir_all(tree).map_err(|e| {
            DeployError::invalid_path(format!("Cannot delete \"{}\": {}", tree.display(), e))
        })
    }
}
