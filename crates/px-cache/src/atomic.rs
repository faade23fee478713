use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

/// The style of advisory file lock used to guard an [`AtomicDirectory`] slot.
///
/// Both styles are released automatically when the owning process exits (the lock is held by
/// an open file descriptor, not a pid file), which is what makes the cache immune to stale-lock
/// recovery logic. The `fs2` crate backs both variants with the platform's native whole-file
/// advisory lock (`flock` on Unix, `LockFileEx` on Windows); true POSIX byte-range locking would
/// require an `unsafe` `fcntl` call this crate avoids, so the two styles are currently
/// equivalent in behavior. See `DESIGN.md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStyle {
    Posix,
    Bsd,
}

/// The `(work_dir, target_dir)` pair backing a single cache slot.
#[derive(Debug, Clone)]
struct AtomicDirectory {
    target_dir: PathBuf,
    work_dir: PathBuf,
}

impl AtomicDirectory {
    fn new(target_dir: PathBuf) -> Self {
        let mut work_dir = target_dir.clone().into_os_string();
        work_dir.push(".workdir");
        Self {
            target_dir,
            work_dir: PathBuf::from(work_dir),
        }
    }

    fn is_finalized(&self) -> bool {
        self.target_dir.exists()
    }

    fn lock_path(&self) -> PathBuf {
        let parent = self.target_dir.parent().unwrap_or_else(|| Path::new(""));
        let tail = self
            .target_dir
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("here");
        parent.join(format!(".{tail}.atomic_directory.lck"))
    }
}

/// A scoped, cross-process-exclusive handle on a cache slot.
///
/// Obtained via [`enter`]. If the target directory already existed (or was finalized by a
/// racing process while we waited on the lock), the handle is born `is_finalized() == true` and
/// the caller does no work: no `work_dir` is ever created. Otherwise the caller populates
/// [`AtomicDirectoryHandle::work_dir`] and must call [`AtomicDirectoryHandle::finalize`] to
/// atomically promote it; dropping the handle without finalizing removes the `work_dir`.
pub struct AtomicDirectoryHandle {
    atomic: AtomicDirectory,
    lock: Option<File>,
    finalized: bool,
    work_dir_created: bool,
}

impl AtomicDirectoryHandle {
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn target_dir(&self) -> &Path {
        &self.atomic.target_dir
    }

    /// The directory the caller should populate. Only meaningful when `!is_finalized()`.
    pub fn work_dir(&self) -> &Path {
        &self.atomic.work_dir
    }

    /// Atomically rename `work_dir` to `target_dir`.
    ///
    /// If another process won the race and `target_dir` already exists, `work_dir` is removed
    /// and the race-lost condition is swallowed, not surfaced as an error.
    pub fn finalize(mut self) -> io::Result<()> {
        if self.finalized {
            return Ok(());
        }

        match fs::rename(&self.atomic.work_dir, &self.atomic.target_dir) {
            Ok(()) => {
                self.finalized = true;
                Ok(())
            }
            Err(err) if is_destination_occupied(&err) => {
                debug!(
                    target_dir = %self.atomic.target_dir.display(),
                    "lost the atomic directory race; discarding work_dir"
                );
                fs::remove_dir_all(&self.atomic.work_dir).ok();
                self.finalized = true;
                Ok(())
            }
            Err(err) => {
                fs::remove_dir_all(&self.atomic.work_dir).ok();
                Err(err)
            }
        }
    }
}

impl Drop for AtomicDirectoryHandle {
    fn drop(&mut self) {
        if !self.finalized && self.work_dir_created {
            fs::remove_dir_all(&self.atomic.work_dir).ok();
        }
        if let Some(lock) = self.lock.take() {
            FileExt::unlock(&lock).ok();
        }
    }
}

/// Enter a cache slot at `target_dir`, acquiring an exclusive cross-process lock if the slot is
/// not already finalized.
///
/// Mirrors `pex.atomic_directory.atomic_directory`: double-checked locking around the
/// blocking, crash-safe file lock, so that at most one process ever populates a given
/// `work_dir` for a given `target_dir`.
pub fn enter(target_dir: impl Into<PathBuf>, lock_style: LockStyle) -> io::Result<AtomicDirectoryHandle> {
    let atomic = AtomicDirectory::new(target_dir.into());

    if atomic.is_finalized() {
        return Ok(AtomicDirectoryHandle {
            atomic,
            lock: None,
            finalized: true,
            work_dir_created: false,
        });
    }

    if let Some(parent) = atomic.target_dir.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let lock_file = OpenOptions::new()
        .create(true)
        .write(true)
        .open(atomic.lock_path())?;

    // N.B.: both styles currently resolve to the same whole-file advisory lock; see `LockStyle`.
    let _ = lock_style;
    FileExt::lock_exclusive(&lock_file)?;

    if atomic.is_finalized() {
        return Ok(AtomicDirectoryHandle {
            atomic,
            lock: Some(lock_file),
            finalized: true,
            work_dir_created: false,
        });
    }

    // Fails loudly if `work_dir` already exists: that would mean the lock invariant is broken.
    fs::create_dir(&atomic.work_dir)?;

    Ok(AtomicDirectoryHandle {
        atomic,
        lock: Some(lock_file),
        finalized: false,
        work_dir_created: true,
    })
}

/// Returns `true` if `err` is the "destination exists" or "destination not empty" `rename()`
/// failure that signals a lost atomic-promotion race, rather than a real error.
fn is_destination_occupied(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::AlreadyExists {
        return true;
    }
    match err.raw_os_error() {
        #[cfg(unix)]
        Some(39) => true, // ENOTEMPTY
        #[cfg(unix)]
        Some(17) => true, // EEXIST
        #[cfg(windows)]
        Some(145) => true, // ERROR_DIR_NOT_EMPTY
        #[cfg(windows)]
        Some(183) => true, // ERROR_ALREADY_EXISTS
        _ => false,
    }
}
