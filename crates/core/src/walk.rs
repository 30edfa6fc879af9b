//! File-tree walker (C7).

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, TextmendError};

pub const DEFAULT_EXCLUDE_DIRS: &[&str] =
    &[".git", ".svn", ".hg", "node_modules", "bin", "target", "dist", "build", "out", ".idea", ".vscode"];

pub const DEFAULT_EXTENSIONS: &[&str] =
    &[".txt", ".md", ".java", ".xml", ".properties", ".csv", ".html", ".js", ".ts", ".go"];

/// Configuration for one walk.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub recursive: bool,
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        WalkOptions {
            recursive: true,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Parses a CSV extension list, lower-casing and prefixing a leading `.` on
/// entries that lack one. An empty string yields no filter (all files pass).
pub fn parse_extensions(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let lower = s.to_ascii_lowercase();
            if lower.starts_with('.') {
                lower
            } else {
                format!(".{lower}")
            }
        })
        .collect()
}

/// Parses a CSV exclude-dirs list. An empty string falls back to
/// [`DEFAULT_EXCLUDE_DIRS`].
pub fn parse_exclude_dirs(csv: &str) -> Vec<String> {
    if csv.trim().is_empty() {
        return DEFAULT_EXCLUDE_DIRS.iter().map(|s| s.to_string()).collect();
    }
    csv.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

/// Rejects any path with an ascending (`..`) component.
fn reject_dotdot(path: &Path) -> Result<()> {
    use std::path::Component;
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(TextmendError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path contains '..'"),
        });
    }
    Ok(())
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => {
            let dotted = format!(".{}", ext.to_ascii_lowercase());
            extensions.iter().any(|e| e == &dotted)
        }
        None => false,
    }
}

/// Walks `root` depth-first, honoring `recursive`, the exclude-dir set and
/// the extension filter. Emits paths in OS-returned order; callers must not
/// depend on a deterministic order across platforms.
pub fn gather_files(root: &Path, options: &WalkOptions) -> Result<Vec<PathBuf>> {
    reject_dotdot(root)?;

    let max_depth = if options.recursive { usize::MAX } else { 1 };

    let mut files = Vec::new();
    let walker = WalkDir::new(root).max_depth(max_depth).into_iter().filter_entry(|entry| {
        if entry.file_type().is_dir() && entry.depth() > 0 {
            let name = entry.file_name().to_string_lossy();
            return !options.exclude_dirs.iter().any(|d| d == name.as_ref());
        }
        true
    });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
            TextmendError::io(path, e.into_io_error().unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk error")))
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if matches_extension(entry.path(), &options.extensions) {
            files.push(entry.path().to_path_buf());
        }
    }

    log::info!("found {} candidate file(s) under {}", files.len(), root.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn gathers_matching_extensions_recursively() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"x").unwrap();
        fs::write(dir.path().join("b.rs"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/c.txt"), b"x").unwrap();

        let options = WalkOptions {
            recursive: true,
            extensions: vec![".txt".to_string()],
            exclude_dirs: vec![],
        };
        let mut files = gather_files(dir.path(), &options).unwrap();
        files.sort();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn excludes_named_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("node_modules/skip.txt"), b"x").unwrap();
        fs::write(dir.path().join("keep.txt"), b"x").unwrap();

        let options = WalkOptions::default();
        let files = gather_files(dir.path(), &options).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.txt"));
    }

    #[test]
    fn non_recursive_walk_skips_subdirectories() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/deep.txt"), b"x").unwrap();
        fs::write(dir.path().join("top.txt"), b"x").unwrap();

        let options = WalkOptions { recursive: false, ..WalkOptions::default() };
        let files = gather_files(dir.path(), &options).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("top.txt"));
    }

    #[test]
    fn parse_extensions_normalizes_dots_and_case() {
        assert_eq!(parse_extensions("TXT, .Md,csv"), vec![".txt", ".md", ".csv"]);
    }

    #[test]
    fn parse_exclude_dirs_empty_falls_back_to_default() {
        assert_eq!(parse_exclude_dirs(""), DEFAULT_EXCLUDE_DIRS.to_vec());
    }
}
