//! File pattern resolution using glob

use crate::error::CliError;
use anyhow::{Context, Result};
use glob::glob;
use std::path::PathBuf;

/// Resolve file patterns to actual file paths.
///
/// Every pattern must match at least one file; a plain path that does not
/// exist is reported as not found.
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let paths =
            glob(pattern).map_err(|e| CliError::InvalidPattern(format!("{pattern} ({e})")))?;

        let before = files.len();
        for path_result in paths {
            let path =
                path_result.with_context(|| format!("Error resolving pattern: {}", pattern))?;

            if path.is_file() {
                files.push(path);
            }
        }

        if files.len() == before {
            return Err(CliError::FileNotFound(pattern.clone()).into());
        }
    }

    // Remove duplicates and sort
    files.sort();
    files.dedup();

    log::debug!("Resolved {} input file(s)", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn pattern(dir: &TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_plain_path() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();

        let files = resolve_patterns(&[pattern(&temp_dir, "a.txt")]).unwrap();
        assert_eq!(files, vec![temp_dir.path().join("a.txt")]);
    }

    #[test]
    fn test_glob_sorted_and_deduplicated() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.txt"), "b").unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(temp_dir.path().join("dir.txt")).unwrap();

        let files = resolve_patterns(&[
            pattern(&temp_dir, "*.txt"),
            pattern(&temp_dir, "a.txt"),
        ])
        .unwrap();
        assert_eq!(
            files,
            vec![temp_dir.path().join("a.txt"), temp_dir.path().join("b.txt")]
        );
    }

    #[test]
    fn test_missing_file() {
        let err = resolve_patterns(&["/nonexistent/input.txt".to_string()]).unwrap_err();
        match err.downcast_ref::<CliError>() {
            Some(CliError::FileNotFound(p)) => assert_eq!(p, "/nonexistent/input.txt"),
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_pattern() {
        let err = resolve_patterns(&["[invalid".to_string()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::InvalidPattern(_))
        ));
    }
}
