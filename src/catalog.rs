//! Localized message catalog compilation (gettext `.po` to `.mo`).

use crate::error::{DeployError, Result};
use crate::process;

/// Compiles a message catalog with `msgfmt`, writing the `.mo` next to the
/// `.po`. Returns the path of the compiled catalog.
pub fn compile_message_catalog(po_file: &str) -> Result<String> {
    let mo_file = po_file.replace(".po", ".mo");
    let cwd = std::env::current_dir()?;

    let stderr = match process::run("msgfmt", &[po_file, "-o", &mo_file], &cwd) {
        Ok(output) if output.success => return Ok(mo_file),
        Ok(output) => output.stderr,
        Err(err) => err.to_string(),
    };

    Err(DeployError::CompileTranslation(stderr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_catalog_is_compile_failure() {
        // msgfmt missing entirely and msgfmt failing on a nonexistent file
        // both surface as CompileTranslation.
        let result = compile_message_catalog("/definitely/not/here/messages.po");
        assert!(matches!(result, Err(DeployError::CompileTranslation(_))));
    }
}
