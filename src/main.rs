use anyhow::Result;
use clap::Parser;

use git_deploy::config;
use git_deploy::git::GitCli;
use git_deploy::orchestration::{Outcome, ReleaseWorkflow};
use git_deploy::ui::{self, AssumeDefaults, ConsolePrompter, Prompter};

#[derive(clap::Parser)]
#[command(
    name = "git-deploy",
    version,
    about = "Merge, tag and push a development branch as a release"
)]
struct Args {
    #[arg(help = "The branch to merge into the main branch")]
    merge_branch: Option<String>,

    #[arg(help = "The main/master branch to tag and release")]
    main_branch: Option<String>,

    #[arg(help = "The base deployment directory (not this working tree)")]
    deploy_path: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Skip confirmation prompts and accept suggestions")]
    force: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    // Console arguments override the configured defaults.
    if let Some(path) = args.deploy_path {
        config.base_deploy_path = path;
    }
    let merge_branch = args
        .merge_branch
        .unwrap_or_else(|| config.defaults.merge_branch.clone());
    let main_branch = args
        .main_branch
        .unwrap_or_else(|| config.defaults.main_branch.clone());

    let git = GitCli::new();
    let workflow = ReleaseWorkflow::new(&git, &config);

    let mut console = ConsolePrompter;
    let mut assume = AssumeDefaults;
    let prompt: &mut dyn Prompter = if args.force { &mut assume } else { &mut console };

    let source_tree = std::env::current_dir()?;

    match workflow.run(&source_tree, &merge_branch, &main_branch, prompt) {
        Ok(Outcome::Done { release_tag }) => {
            ui::display_success(&format!(
                "Release {} merged, tagged and pushed.",
                release_tag
            ));
        }
        Ok(Outcome::DoneReconcileFailed { release_tag, error }) => {
            ui::display_success(&format!("Release {} tagged and pushed.", release_tag));
            ui::display_warning(&format!(
                "Merging the release back into \"{}\" failed: {}",
                merge_branch, error
            ));
        }
        Ok(Outcome::Aborted) => {
            ui::display_warning("Aborted by user.");
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }

    Ok(())
}
