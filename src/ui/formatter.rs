//! Pure display functions for console output.
//!
//! Everything here only formats and prints; no user input, no decisions.

use console::style;

use crate::domain::{Branch, GitMetadata};

/// Format and print an error message.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Format and print a warning.
pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Repository identity and the two branches of interest.
pub fn display_repository_summary(metadata: &GitMetadata) {
    println!("\n{}", style("Repository Summary").bold());
    println!("  {:<22}{}", "Repository Name", metadata.name);
    println!("  {:<22}{}", "Repository URL", metadata.url);
    println!("  {:<22}{}", "Working Tree", metadata.working_tree.display());
    println!(
        "  {:<22}{} ({})",
        "Deploy Branch (Tag)", metadata.deploy_branch.name, metadata.deploy_branch.tag
    );
    println!(
        "  {:<22}{} ({})",
        "Main Branch (Tag)", metadata.main_branch.name, metadata.main_branch.tag
    );
}

/// Parsed version fields of the deploy and main branches, one row each.
pub fn display_branch_versions(metadata: &GitMetadata) {
    println!("\n{}", style("Branch Version Summaries").bold());
    println!(
        "  {:<24}{:>6}{:>7}{:>7}  {:<7}{:<14}{:>9}",
        "Branch", "Major", "Minor", "Patch", "Type", "Descriptor", "Revision"
    );

    for (branch, role) in [
        (&metadata.deploy_branch, "Deploy"),
        (&metadata.main_branch, "Main"),
    ] {
        display_version_row(branch, role);
    }
    println!();
}

fn display_version_row(branch: &Branch, role: &str) {
    let version = &branch.version;
    println!(
        "  {:<24}{:>6}{:>7}{:>7}  {:<7}{:<14}{:>9}",
        format!("{} ({})", branch.name, role),
        version.major,
        version.minor,
        version.patch,
        version
            .release_type
            .map(|t| t.to_string())
            .unwrap_or_default(),
        version.descriptor,
        version.revision
    );
}

/// The changelog paragraph that will become the tag message.
pub fn display_changelog(lines: &[String]) {
    println!("{}", style("Changelog for Release").bold());
    for line in lines {
        println!("  {}", line);
    }
    println!();
}
