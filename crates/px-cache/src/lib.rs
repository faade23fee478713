use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

mod atomic;

pub use atomic::{enter, AtomicDirectoryHandle, LockStyle};

/// The kind of source a [`Cache::built_wheels_slot`] was built from, per §4.2: sdists and local
/// project checkouts live in separate subtrees even though they share the fingerprint/target.id
/// structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Sdist,
    LocalProject,
}

impl SourceKind {
    fn dirname(self) -> &'static str {
        match self {
            SourceKind::Sdist => "sdists",
            SourceKind::LocalProject => "local_projects",
        }
    }
}

/// The three cache tiers, rooted under a [`Cache`]'s root directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CacheBucket {
    /// Stage-1 output: per-target scratch, not atomically promoted.
    ResolvedDists,
    /// Stage-2 output: atomic, keyed by source kind, basename, fingerprint, and target.
    BuiltWheels,
    /// Stage-3 output: atomic, keyed by fingerprint and wheel basename only (target-agnostic).
    InstalledWheels,
}

impl CacheBucket {
    fn dirname(self) -> &'static str {
        match self {
            CacheBucket::ResolvedDists => "resolved_dists",
            CacheBucket::BuiltWheels => "built_wheels",
            CacheBucket::InstalledWheels => "installed_wheels",
        }
    }
}

impl fmt::Display for CacheBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dirname())
    }
}

/// The content-addressed cache backing the resolve/build/install pipeline.
///
/// Paths returned by this type are plain locations; callers populate `BuiltWheels` and
/// `InstalledWheels` entries through [`enter`] to get the atomic-promotion guarantee. The
/// `ResolvedDists` tier is per-invocation scratch and is handed to the external downloader
/// directly, with no atomicity guarantee of its own (see §4.2).
#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    /// A persistent cache rooted at `root`, creating it if necessary.
    pub fn at(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs_err::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// A fresh, temporary cache backing a single invocation that requested no persistent cache.
    pub fn temporary() -> io::Result<(Self, tempfile::TempDir)> {
        let dir = tempfile::tempdir()?;
        let cache = Self::at(dir.path())?;
        Ok((cache, dir))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket(&self, bucket: CacheBucket) -> PathBuf {
        self.root.join(bucket.dirname())
    }

    /// Stage-1 scratch directory for a single target's downloads.
    pub fn resolved_dists_dir(&self, target_id: &str) -> PathBuf {
        self.bucket(CacheBucket::ResolvedDists).join(target_id)
    }

    /// Stage-2 cache slot for a built-wheel [`AtomicDirectory`]: `built_wheels/<kind>/<basename>/<fingerprint>/<target.id>`.
    pub fn built_wheels_slot(
        &self,
        kind: SourceKind,
        basename: &str,
        fingerprint: &str,
        target_id: &str,
    ) -> PathBuf {
        self.bucket(CacheBucket::BuiltWheels)
            .join(kind.dirname())
            .join(basename)
            .join(fingerprint)
            .join(target_id)
    }

    /// Stage-3 cache slot for an installed-wheel [`AtomicDirectory`]: `installed_wheels/<fingerprint>/<basename>`.
    ///
    /// Deliberately not keyed by target: the produced chroot is target-agnostic by wheel
    /// filename, which is how stage 3 dedups installs across targets.
    pub fn installed_wheels_slot(&self, fingerprint: &str, basename: &str) -> PathBuf {
        self.bucket(CacheBucket::InstalledWheels)
            .join(fingerprint)
            .join(basename)
    }
}

/// Compute the content fingerprint of a single file (a source archive or a wheel).
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = fs_err::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex(&hasher.finalize()))
}

/// Compute a stable recursive fingerprint of a source directory: every regular file's relative
/// path and contents, visited in sorted order, excluding common transient/VCS noise so that
/// rebuilding without meaningful changes reuses the cache.
pub fn hash_dir(path: &Path) -> io::Result<String> {
    let mut relpaths = Vec::new();
    for entry in walkdir::WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relpath = entry.path().strip_prefix(path).unwrap_or(entry.path());
        if is_transient(relpath) {
            continue;
        }
        relpaths.push((relpath.to_path_buf(), entry.path().to_path_buf()));
    }
    relpaths.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Sha256::new();
    for (relpath, abspath) in relpaths {
        hasher.update(relpath.to_string_lossy().as_bytes());
        hasher.update(b"\0");
        let mut file = fs_err::File::open(&abspath)?;
        io::copy(&mut file, &mut hasher)?;
        hasher.update(b"\0");
    }
    Ok(hex(&hasher.finalize()))
}

fn is_transient(relpath: &Path) -> bool {
    relpath.components().any(|component| {
        matches!(
            component.as_os_str().to_str(),
            Some(".git") | Some(".hg") | Some("__pycache__") | Some(".pex")
        )
    }) || relpath.extension().and_then(|ext| ext.to_str()) == Some("pyc")
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
