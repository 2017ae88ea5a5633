//! Changelog excerpt used as the release tag message.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{DeployError, Result};

/// At most this many leading bytes of the changelog are examined.
const EXCERPT_LIMIT: u64 = 4096;

/// Returns the changelog's first paragraph: every line up to the first
/// blank one.
pub fn release_excerpt(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|_| {
        DeployError::invalid_path(format!(
            "The changelog file \"{}\" does not exist or is not readable",
            path.display()
        ))
    })?;

    let mut head = Vec::new();
    file.take(EXCERPT_LIMIT).read_to_end(&mut head)?;
    let text = String::from_utf8_lossy(&head);

    let mut lines = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            break;
        }
        lines.push(line.to_string());
    }

    Ok(lines)
}
