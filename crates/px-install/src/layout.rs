use std::path::PathBuf;

/// The stash directory auxiliary wheel categories are re-rooted under, inside the install
/// chroot (§4.7, `InstallPaths`).
pub const STASH: &str = ".prefix";

/// The wheel-archive categories named by `{distribution}-{version}.data/<category>/...` entries,
/// per the binary distribution format. `Purelib`/`Platlib` are not represented here because they
/// extract straight to the chroot root, not under the stash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Headers,
    Scripts,
    Data,
}

impl Category {
    pub fn from_data_dir_name(name: &str) -> Option<Self> {
        match name {
            "headers" => Some(Category::Headers),
            "scripts" => Some(Category::Scripts),
            "data" => Some(Category::Data),
            _ => None,
        }
    }

    /// Where this category's files land under the chroot, relative to its root. Mirrors
    /// `pep_427.py`'s `InstallPaths` table: `scripts` → `.prefix/bin`, `data` → `.prefix` itself,
    /// `headers` → `.prefix/include/site/pythonX.Y/<project_name>`.
    pub fn destination(self, project_name: &str, python_tag: &str) -> PathBuf {
        match self {
            Category::Scripts => PathBuf::from(STASH).join("bin"),
            Category::Data => PathBuf::from(STASH),
            Category::Headers => PathBuf::from(STASH)
                .join("include")
                .join("site")
                .join(python_tag)
                .join(project_name),
        }
    }
}
