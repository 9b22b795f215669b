//! File pattern resolution using glob

use anyhow::{Context, Result};
use glob::glob;
use std::path::PathBuf;

/// Resolve file patterns to existing files, sorted and deduplicated
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let paths = glob(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;

        for path_result in paths {
            let path = path_result.with_context(|| format!("Error resolving pattern: {pattern}"))?;

            if path.is_file() {
                files.push(path);
            }
        }
    }

    if files.is_empty() {
        anyhow::bail!("No files found matching the provided patterns");
    }

    files.sort();
    files.dedup();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn pattern(dir: &TempDir, tail: &str) -> String {
        dir.path().join(tail).to_string_lossy().into_owned()
    }

    #[test]
    fn test_glob_matches_files_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.html"), "").unwrap();
        fs::write(dir.path().join("a.html"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("dir.html")).unwrap();

        let files = resolve_patterns(&[pattern(&dir, "*.html")]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.html", "b.html"]);
    }

    #[test]
    fn test_overlapping_patterns_dedup() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.html"), "").unwrap();

        let files =
            resolve_patterns(&[pattern(&dir, "*.html"), pattern(&dir, "a.html")]).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_no_matches_is_error() {
        let dir = TempDir::new().unwrap();
        let error = resolve_patterns(&[pattern(&dir, "*.html")]).unwrap_err();
        assert!(error.to_string().contains("No files found"));
    }

    #[test]
    fn test_invalid_pattern() {
        let error = resolve_patterns(&["[".to_string()]).unwrap_err();
        assert!(error.to_string().contains("Invalid glob pattern"));
    }
}
