//! # Scoped Write-and-Format
//!
//! Every file the build pipeline persists (metadata artifacts and the registry
//! source file) goes through the same path: format the full content in memory,
//! then write atomically via a temp file in the target directory plus rename.
//! The file on disk is either the complete formatted content or untouched,
//! never a partial write.
//!
//! The formatter itself is an external collaborator (in CI it is the repo's
//! lint/format toolchain); it is modeled as a trait so tests and embedders can
//! substitute their own pass.

use crate::errors::MetadataBuildError;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Shared formatting/linting pass applied to content before it is persisted.
/// Implementations must be deterministic: formatting already-formatted content
/// must be a no-op, or the pipeline's idempotence guarantees break.
pub trait SourceFormatter: Send + Sync {
    fn format(&self, path: &Path, contents: &str) -> anyhow::Result<String>;
}

/// Default formatter: normalizes line endings and guarantees a single trailing
/// newline. Stand-in for the repo's real lint/format pass.
#[derive(Debug, Default, Clone)]
pub struct DefaultFormatter;

impl SourceFormatter for DefaultFormatter {
    fn format(&self, _path: &Path, contents: &str) -> anyhow::Result<String> {
        let mut formatted = contents.replace("\r\n", "\n");
        while formatted.ends_with('\n') {
            formatted.pop();
        }
        formatted.push('\n');
        Ok(formatted)
    }
}

/// Formats `contents` and writes the result to `path` atomically. Parent
/// directories are created as needed.
pub fn write_and_format(
    path: &Path,
    contents: &str,
    formatter: &dyn SourceFormatter,
) -> Result<(), MetadataBuildError> {
    let formatted = formatter.format(path, contents)?;

    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    // Temp file in the same directory so the final rename stays on one
    // filesystem and is atomic.
    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(formatted.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_creates_parent_dirs_and_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c.json");
        write_and_format(&path, "{}", &DefaultFormatter).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[test]
    fn formatter_is_idempotent() {
        let formatter = DefaultFormatter;
        let once = formatter.format(Path::new("x"), "line\r\nline\n\n\n").unwrap();
        let twice = formatter.format(Path::new("x"), &once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once, "line\nline\n");
    }
}
