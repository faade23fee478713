use std::io;

/// The domain error kinds of §7. Everything other than a lost atomic-directory race propagates
/// unchanged to the caller; the race itself is handled inside `px-cache` and never surfaces here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Stage-1 failure: no valid resolution exists for some target.
    #[error("no resolution satisfies the given requirements for target {target}:\n{stderr}")]
    Unsatisfiable { target: String, stderr: String },

    /// Stage-2 or stage-3 failure: a required source cannot be built, or a wheel cannot be
    /// installed.
    #[error("could not translate {subject}:\n{stderr}")]
    Untranslateable { subject: String, stderr: String },

    /// Preflight failure: mutually exclusive options were specified together.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No locked resolve ranks against a given target.
    #[error("no locked resolve applies to target {target}")]
    LockSelection { target: String },

    /// `mkdir(work_dir)` failed for a `BuildResult` slot for a reason other than already-exists;
    /// the lock invariant is broken.
    #[error("build result cache slot for {subject} could not be locked")]
    BuildResultUnlockable {
        subject: String,
        #[source]
        source: io::Error,
    },

    /// As above, for an `InstallResult` slot.
    #[error("install result cache slot for {subject} could not be locked")]
    InstallResultUnlockable {
        subject: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
