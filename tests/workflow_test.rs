// tests/workflow_test.rs
//
// Release workflow scenarios driven against the mock git layer: rollback on
// merge conflict, the dirty-tree gate, working-tree acquisition, and the
// reconcile asymmetry.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use git_deploy::config::Config;
use git_deploy::error::{DeployError, Result};
use git_deploy::git::MockGit;
use git_deploy::orchestration::{Outcome, ReleaseWorkflow};
use git_deploy::ui::Prompter;

/// Canned prompt answers, consumed in order; falls back to the default.
struct ScriptedPrompter {
    confirms: Vec<bool>,
    answers: Vec<String>,
}

impl ScriptedPrompter {
    fn new() -> Self {
        ScriptedPrompter {
            confirms: Vec::new(),
            answers: Vec::new(),
        }
    }

    fn confirming(mut self, answer: bool) -> Self {
        self.confirms.push(answer);
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, _question: &str, default: bool) -> Result<bool> {
        if self.confirms.is_empty() {
            Ok(default)
        } else {
            Ok(self.confirms.remove(0))
        }
    }

    fn ask(&mut self, _question: &str, default: &str) -> Result<String> {
        if self.answers.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(self.answers.remove(0))
        }
    }
}

const URL: &str = "https://example.com/org/demo.git";

/// Base deploy dir with a CHANGELOG inside the expected working tree.
fn deploy_base() -> (TempDir, PathBuf) {
    let base = TempDir::new().unwrap();
    let tree = base.path().join("demo");
    fs::create_dir_all(&tree).unwrap();
    fs::write(tree.join("CHANGELOG"), "1.3.0-rc.1\n- changes\n\nolder\n").unwrap();
    (base, tree)
}

fn config_for(base: &TempDir) -> Config {
    Config {
        base_deploy_path: base.path().to_string_lossy().into_owned(),
        ..Config::default()
    }
}

/// Mock primed so a run from `source` reuses the tree at `tree`.
fn primed_mock(source: &Path, tree: &Path) -> MockGit {
    MockGit::new()
        .with_remote_url(source, URL)
        .with_remote_url(tree, URL)
        .with_current_branch("master")
        .with_branch_tag("develop", "1.3.0-rc.1")
        .with_branch_tag("master", "1.2.0")
}

#[test]
fn test_full_run_merges_tags_and_reconciles() {
    let source = TempDir::new().unwrap();
    let (base, tree) = deploy_base();
    let config = config_for(&base);
    let mock = primed_mock(source.path(), &tree);

    let workflow = ReleaseWorkflow::new(&mock, &config);
    let mut prompt = ScriptedPrompter::new().confirming(true);

    let outcome = workflow
        .run(source.path(), "develop", "master", &mut prompt)
        .unwrap();

    match outcome {
        Outcome::Done { release_tag } => assert_eq!(release_tag, "1.3.0-rc.1"),
        other => panic!("expected Done, got {:?}", other),
    }

    let calls = mock.calls();
    assert!(!calls.iter().any(|c| c.starts_with("clone")));

    // Merge/tag/push on main, then the release merged back into develop.
    let sequence: Vec<&str> = calls
        .iter()
        .map(String::as_str)
        .filter(|c| {
            c.starts_with("checkout")
                || c.starts_with("merge")
                || c.starts_with("tag")
                || c.starts_with("push")
                || *c == "pull"
        })
        .collect();
    let expected = [
        "checkout develop",
        "pull",
        "checkout master",
        "pull",
        "merge develop",
        "tag 1.3.0-rc.1",
        "push",
        "push --tags",
        "checkout develop",
        "pull",
        "merge master",
        "push",
    ];
    assert_eq!(&sequence[sequence.len() - expected.len()..], &expected[..]);
}

#[test]
fn test_merge_conflict_rolls_back_and_stops() {
    let source = TempDir::new().unwrap();
    let (base, tree) = deploy_base();
    let config = config_for(&base);
    let mock = primed_mock(source.path(), &tree).conflict_on_merge_of("develop");

    let workflow = ReleaseWorkflow::new(&mock, &config);
    let mut prompt = ScriptedPrompter::new().confirming(true);

    let result = workflow.run(source.path(), "develop", "master", &mut prompt);
    assert!(matches!(result, Err(DeployError::MergeConflict)));

    let calls = mock.calls();
    let aborts = calls.iter().filter(|c| *c == "merge --abort").count();
    assert_eq!(aborts, 1);

    // Nothing is tagged or pushed after the rollback.
    let conflict_at = calls.iter().position(|c| c == "merge develop").unwrap();
    assert!(!calls[conflict_at..]
        .iter()
        .any(|c| c.starts_with("tag") || c.starts_with("push")));
}

#[test]
fn test_dirty_tree_stops_before_any_checkout() {
    let source = TempDir::new().unwrap();
    let (base, tree) = deploy_base();
    let config = config_for(&base);
    let mock = primed_mock(source.path(), &tree).dirty();

    let workflow = ReleaseWorkflow::new(&mock, &config);
    let mut prompt = ScriptedPrompter::new();

    let result = workflow.run(source.path(), "develop", "master", &mut prompt);
    assert!(matches!(result, Err(DeployError::DirtyWorkingTree)));

    let calls = mock.calls();
    assert!(!calls.iter().any(|c| c.starts_with("checkout")));
    assert!(!calls.iter().any(|c| c.starts_with("merge")));
}

#[test]
fn test_declining_the_merge_aborts_without_mutation() {
    let source = TempDir::new().unwrap();
    let (base, tree) = deploy_base();
    let config = config_for(&base);
    let mock = primed_mock(source.path(), &tree);

    let workflow = ReleaseWorkflow::new(&mock, &config);
    let mut prompt = ScriptedPrompter::new().confirming(false);

    let outcome = workflow
        .run(source.path(), "develop", "master", &mut prompt)
        .unwrap();
    assert!(matches!(outcome, Outcome::Aborted));

    let calls = mock.calls();
    assert!(!calls.iter().any(|c| c.starts_with("merge")));
    assert!(!calls.iter().any(|c| c.starts_with("tag")));
    assert!(!calls.iter().any(|c| c.starts_with("push")));
}

#[test]
fn test_reconcile_conflict_still_reports_release_done() {
    let source = TempDir::new().unwrap();
    let (base, tree) = deploy_base();
    let config = config_for(&base);
    let mock = primed_mock(source.path(), &tree).conflict_on_merge_of("master");

    let workflow = ReleaseWorkflow::new(&mock, &config);
    let mut prompt = ScriptedPrompter::new().confirming(true);

    let outcome = workflow
        .run(source.path(), "develop", "master", &mut prompt)
        .unwrap();

    match outcome {
        Outcome::DoneReconcileFailed { release_tag, error } => {
            assert_eq!(release_tag, "1.3.0-rc.1");
            assert!(matches!(error, DeployError::MergeConflict));
        }
        other => panic!("expected DoneReconcileFailed, got {:?}", other),
    }

    let calls = mock.calls();
    // The release itself went out...
    assert!(calls.iter().any(|c| c == "tag 1.3.0-rc.1"));
    assert!(calls.iter().any(|c| c == "push --tags"));
    // ...and the conflicted reconcile merge was aborted.
    assert_eq!(calls.iter().filter(|c| *c == "merge --abort").count(), 1);
}

#[test]
fn test_acquisition_reuses_matching_tree() {
    let source = TempDir::new().unwrap();
    let (base, tree) = deploy_base();
    let config = config_for(&base);
    let mock = primed_mock(source.path(), &tree);

    let workflow = ReleaseWorkflow::new(&mock, &config);
    let mut prompt = ScriptedPrompter::new();

    for _ in 0..2 {
        let acquired = workflow
            .acquire_working_tree(source.path(), &mut prompt)
            .unwrap();
        assert_eq!(acquired, Some(tree.clone()));
    }

    assert!(!mock.calls().iter().any(|c| c.starts_with("clone")));
}

#[test]
fn test_acquisition_clones_when_tree_is_missing() {
    let source = TempDir::new().unwrap();
    let base = TempDir::new().unwrap();
    let config = config_for(&base);
    let mock = MockGit::new().with_remote_url(source.path(), URL);

    let workflow = ReleaseWorkflow::new(&mock, &config);
    let mut prompt = ScriptedPrompter::new();

    let acquired = workflow
        .acquire_working_tree(source.path(), &mut prompt)
        .unwrap();
    assert_eq!(acquired, Some(base.path().join("demo")));
    assert!(mock
        .calls()
        .iter()
        .any(|c| c == &format!("clone {}", URL)));
}

#[test]
fn test_acquisition_prompts_before_replacing_mismatched_tree() {
    let source = TempDir::new().unwrap();
    let (base, tree) = deploy_base();
    let config = config_for(&base);
    let mock = MockGit::new()
        .with_remote_url(source.path(), URL)
        .with_remote_url(&tree, "https://example.com/other/project.git");

    let workflow = ReleaseWorkflow::new(&mock, &config);

    // Declined: nothing deleted, nothing cloned.
    let mut prompt = ScriptedPrompter::new().confirming(false);
    let acquired = workflow
        .acquire_working_tree(source.path(), &mut prompt)
        .unwrap();
    assert_eq!(acquired, None);
    assert!(tree.exists());
    assert!(!mock.calls().iter().any(|c| c.starts_with("clone")));

    // Accepted: the mismatched tree is removed and re-cloned.
    let mut prompt = ScriptedPrompter::new().confirming(true);
    let acquired = workflow
        .acquire_working_tree(source.path(), &mut prompt)
        .unwrap();
    assert_eq!(acquired, Some(tree.clone()));
    assert!(!tree.exists());
    assert!(mock.calls().iter().any(|c| c.starts_with("clone")));
}
