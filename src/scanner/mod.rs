//! Resume discovery.
//!
//! Lists the resume documents in a directory so the user can pick one
//! by number.

use crate::extract::is_supported;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// List supported resume files directly inside `dir`, sorted by file name.
pub fn list_resumes(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Resume directory not found: {}",
            dir.display()
        ));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry =
            entry.with_context(|| format!("Cannot read directory {}", dir.display()))?;
        let path = entry.path();

        if !entry.file_type().is_file() || is_hidden(path) {
            continue;
        }

        if is_supported(path) {
            files.push(path.to_path_buf());
        } else {
            debug!("Skipping unsupported file {}", path.display());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_resumes_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("zoe.pdf"), b"").unwrap();
        fs::write(dir.path().join("adam.docx"), b"").unwrap();
        fs::write(dir.path().join("notes.odt"), b"").unwrap();
        fs::write(dir.path().join(".hidden.pdf"), b"").unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();
        fs::write(dir.path().join("archive").join("old.pdf"), b"").unwrap();

        let files = list_resumes(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["adam.docx", "zoe.pdf"]);
    }

    #[test]
    fn test_list_resumes_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(list_resumes(&dir.path().join("nope")).is_err());
    }
}
