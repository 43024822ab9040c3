//! File utility functions for listing and filtering files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

/// File pattern used when a directory is given without a wildcard.
pub const DEFAULT_FRAME_PATTERN: &str = "*.fit";

/// Errors from resolving a directory and file-name pattern to files.
#[derive(Debug, thiserror::Error)]
pub enum FileListError {
    #[error("Cannot read directory: {0}")]
    Directory(#[source] io::Error),
    #[error("Path is not valid UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),
    #[error("Invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("{0}")]
    Access(#[from] glob::GlobError),
}

/// Returns true if the string contains a glob wildcard (`*`, `?` or `[`).
pub fn has_wildcard(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Splits a path-or-pattern into the directory to scan and the file-name pattern.
///
/// Wildcards are only honored in the last path component. Input without a
/// wildcard is treated as a directory and paired with `default_pattern`.
pub fn split_pattern(input: &Path, default_pattern: &str) -> (PathBuf, String) {
    let file_part = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    match file_part {
        Some(name) if has_wildcard(&name) => {
            let dir = match input.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            (dir, name)
        }
        _ => (input.to_path_buf(), default_pattern.to_string()),
    }
}

/// Glob pattern for `pattern` inside `dir`. The directory is escaped so it is
/// matched literally.
pub fn glob_pattern(dir: &Path, pattern: &str) -> Result<String, FileListError> {
    let dir_str = dir
        .to_str()
        .ok_or_else(|| FileListError::NonUtf8Path(dir.to_path_buf()))?;
    Pattern::new(pattern)?;
    Ok(format!("{}/{}", Pattern::escape(dir_str), pattern))
}

/// Returns all regular files in `dir` whose names match the glob `pattern`,
/// sorted ascending by their full path string.
///
/// Matching is case-sensitive. A directory that cannot be read is an error,
/// as is any entry glob fails to access.
pub fn files_matching(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, FileListError> {
    fs::read_dir(dir).map_err(FileListError::Directory)?;

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let mut paths = Vec::new();
    for entry in glob::glob_with(&glob_pattern(dir, pattern)?, options)? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }

    sort_by_path_string(&mut paths);
    Ok(paths)
}

/// Sorts paths by byte-wise comparison of the whole path string.
///
/// This is plain string order: `f1`, `f10`, `f2`.
pub fn sort_by_path_string(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| {
        a.as_os_str()
            .as_encoded_bytes()
            .cmp(b.as_os_str().as_encoded_bytes())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_has_wildcard() {
        assert!(has_wildcard("*.fit"));
        assert!(has_wildcard("f?.fit"));
        assert!(has_wildcard("f[12].fit"));
        assert!(!has_wildcard("lights"));
    }

    #[test]
    fn test_split_pattern_directory() {
        let (dir, pattern) = split_pattern(Path::new("/data/lights"), DEFAULT_FRAME_PATTERN);
        assert_eq!(dir, PathBuf::from("/data/lights"));
        assert_eq!(pattern, "*.fit");
    }

    #[test]
    fn test_split_pattern_with_wildcard() {
        let (dir, pattern) = split_pattern(
            Path::new("/data/lights/a-wcs-reduced-*.fit"),
            DEFAULT_FRAME_PATTERN,
        );
        assert_eq!(dir, PathBuf::from("/data/lights"));
        assert_eq!(pattern, "a-wcs-reduced-*.fit");
    }

    #[test]
    fn test_split_pattern_bare_wildcard_uses_current_dir() {
        let (dir, pattern) = split_pattern(Path::new("*.fits"), DEFAULT_FRAME_PATTERN);
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(pattern, "*.fits");
    }

    #[test]
    fn test_glob_pattern_escapes_directory() {
        let pattern = glob_pattern(Path::new("/data/night[1]"), "*.fit").unwrap();
        assert_eq!(pattern, "/data/night[[]1[]]/*.fit");
    }

    #[test]
    fn test_glob_pattern_rejects_malformed_pattern() {
        let err = glob_pattern(Path::new("/data"), "f[.fit").unwrap_err();
        assert!(matches!(err, FileListError::Pattern(_)));
    }

    #[test]
    fn test_files_matching_sorts_as_strings() {
        let tmp = tempfile::tempdir().unwrap();
        touch(tmp.path(), "f2.fit");
        touch(tmp.path(), "f10.fit");
        touch(tmp.path(), "f1.fit");
        touch(tmp.path(), "notes.txt");
        fs::create_dir(tmp.path().join("sub.fit")).unwrap();

        let paths = files_matching(tmp.path(), "*.fit").unwrap();
        assert_eq!(names(&paths), vec!["f1.fit", "f10.fit", "f2.fit"]);
    }

    #[test]
    fn test_files_matching_character_class() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["f1.fit", "f2.fit", "f3.fit"] {
            touch(tmp.path(), name);
        }

        let paths = files_matching(tmp.path(), "f[12]*.fit").unwrap();
        assert_eq!(names(&paths), vec!["f1.fit", "f2.fit"]);
    }

    #[test]
    fn test_files_matching_question_mark_and_case() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["f1.fit", "f10.fit", "F2.fit"] {
            touch(tmp.path(), name);
        }

        let paths = files_matching(tmp.path(), "f?.fit").unwrap();
        assert_eq!(names(&paths), vec!["f1.fit"]);
    }

    #[test]
    fn test_files_matching_literal_bracket_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("night[1]");
        fs::create_dir(&dir).unwrap();
        touch(&dir, "f1.fit");

        let paths = files_matching(&dir, "*.fit").unwrap();
        assert_eq!(names(&paths), vec!["f1.fit"]);
    }

    #[test]
    fn test_files_matching_missing_dir_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = files_matching(&tmp.path().join("missing"), "*.fit").unwrap_err();
        assert!(matches!(err, FileListError::Directory(_)));
    }
}
