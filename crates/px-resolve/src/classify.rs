use std::path::{Path, PathBuf};

/// Recognize a requirement string that names a local project checkout rather than a PyPI-style
/// requirement specifier. The reference resolver accepts bare paths, `file://` URLs, and `-e
/// <path>` editable specs; this crate only needs to know "does this requirement name a directory
/// on disk that stage 1 must hand straight to the builder", so it checks the plainest of those
/// forms: a path (bare or `file://`-prefixed, optionally `-e `-prefixed) that exists and is a
/// directory.
pub fn local_project_path(requirement: &str) -> Option<PathBuf> {
    let candidate = requirement
        .strip_prefix("-e ")
        .unwrap_or(requirement)
        .trim();
    let candidate = candidate.strip_prefix("file://").unwrap_or(candidate);

    let path = Path::new(candidate);
    if path.is_dir() {
        Some(path.to_path_buf())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_bare_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            local_project_path(dir.path().to_str().unwrap()),
            Some(dir.path().to_path_buf())
        );
    }

    #[test]
    fn recognizes_editable_and_file_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let path_str = dir.path().to_str().unwrap();
        assert_eq!(
            local_project_path(&format!("-e {path_str}")),
            Some(dir.path().to_path_buf())
        );
        assert_eq!(
            local_project_path(&format!("file://{path_str}")),
            Some(dir.path().to_path_buf())
        );
    }

    #[test]
    fn ordinary_requirement_is_not_a_local_project() {
        assert_eq!(local_project_path("requests>=2,<3"), None);
    }
}
