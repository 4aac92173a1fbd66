//! Path normalization and the path helpers used when resolving requests.
//!
//! Everything here except [`resolve`] is purely lexical and never touches
//! the filesystem.

use std::{
    io,
    path::{Component, Path, PathBuf},
};

/// Normalize an optional path-like value.
///
/// Redundant separators and `.` components are removed and a trailing
/// separator is dropped. An empty path becomes `.`. `None` stays `None`.
///
/// # Examples
///
/// ```
/// # use std::path::{Path, PathBuf};
/// # use dotrender::path::normalize;
/// assert_eq!(normalize(Some("out//./spam.gv")), Some(PathBuf::from("out/spam.gv")));
/// assert_eq!(normalize(None::<&Path>), None);
/// ```
pub fn normalize<P: AsRef<Path>>(path: Option<P>) -> Option<PathBuf> {
    path.map(|path| {
        let normalized: PathBuf = path.as_ref().components().collect();
        if normalized.as_os_str().is_empty() {
            PathBuf::from(Component::CurDir.as_os_str())
        } else {
            normalized
        }
    })
}

/// Returns the suffix of the final component including its leading dot.
///
/// The result is empty if the file name has no extension. A leading dot
/// alone (`.bashrc`) is not a suffix.
pub fn suffix(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy()),
        _ => String::new(),
    }
}

/// Returns the directory containing `path`, or `None` if `path` has no
/// directory component.
pub fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|parent| !parent.as_os_str().is_empty())
}

/// Returns the file name of `path` as a lossy string.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Returns the absolute form of `path` with symlinks resolved.
///
/// Unlike [`Path::canonicalize`], the path does not need to exist: the
/// longest existing prefix is canonicalized and the remaining components
/// are folded onto it lexically (`..` pops, `.` is dropped).
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined for a
/// relative path.
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;

    let mut existing = absolute.as_path();
    let mut missing = Vec::new();
    let mut resolved = loop {
        if let Ok(canonical) = existing.canonicalize() {
            break canonical;
        }
        match (existing.parent(), existing.components().next_back()) {
            (Some(parent), Some(component)) => {
                missing.push(component);
                existing = parent;
            }
            _ => break existing.to_path_buf(),
        }
    };

    for component in missing.into_iter().rev() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            other => resolved.push(other),
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_normalize_none() {
        assert_eq!(normalize(None::<PathBuf>), None);
    }

    #[test]
    fn test_normalize_collapses_separators_and_cur_dir() {
        assert_eq!(
            normalize(Some("doctest-output//./spam.gv/")),
            Some(PathBuf::from("doctest-output/spam.gv"))
        );
    }

    #[test]
    fn test_normalize_keeps_parent_components() {
        assert_eq!(
            normalize(Some("../out/spam.gv")),
            Some(PathBuf::from("../out/spam.gv"))
        );
    }

    #[test]
    fn test_normalize_empty_is_cur_dir() {
        assert_eq!(normalize(Some("")), Some(PathBuf::from(".")));
        assert_eq!(normalize(Some("./")), Some(PathBuf::from(".")));
    }

    #[test]
    fn test_suffix() {
        assert_eq!(suffix(Path::new("spam.pdf")), ".pdf");
        assert_eq!(suffix(Path::new("spam.gv.svg")), ".svg");
        assert_eq!(suffix(Path::new("spam")), "");
        assert_eq!(suffix(Path::new(".bashrc")), "");
        assert_eq!(suffix(Path::new("spam.")), "");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir(Path::new("spam.gv")), None);
        assert_eq!(parent_dir(Path::new("out/spam.gv")), Some(Path::new("out")));
    }

    #[test]
    fn test_resolve_nonexistent_keeps_tail() {
        let dir = tempdir().expect("Failed to create temp directory");
        let missing = dir.path().join("missing").join("spam.pdf");

        let resolved = resolve(&missing).expect("Failed to resolve");
        let base = dir.path().canonicalize().expect("Failed to canonicalize");

        assert_eq!(resolved, base.join("missing").join("spam.pdf"));
    }

    #[test]
    fn test_resolve_existing_matches_canonicalize() {
        let dir = tempdir().expect("Failed to create temp directory");
        let file = dir.path().join("spam.gv");
        fs::write(&file, "graph { spam }").expect("Failed to write");

        assert_eq!(
            resolve(&file).expect("Failed to resolve"),
            file.canonicalize().expect("Failed to canonicalize")
        );
    }

    #[test]
    fn test_resolve_folds_parent_after_missing_directory() {
        let dir = tempdir().expect("Failed to create temp directory");
        let base = dir.path().canonicalize().expect("Failed to canonicalize");

        let resolved = resolve(&dir.path().join("nosub").join("..").join("spam.gv"))
            .expect("Failed to resolve");
        assert_eq!(resolved, base.join("spam.gv"));

        let resolved = resolve(&dir.path().join("a").join(".").join("b").join("..").join("spam.gv"))
            .expect("Failed to resolve");
        assert_eq!(resolved, base.join("a").join("spam.gv"));
    }
}
