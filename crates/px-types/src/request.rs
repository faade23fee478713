use std::path::{Path, PathBuf};

use px_tags::Target;

/// A stage-2 unit of work: build `source_path` (an sdist archive or a local project checkout)
/// into a wheel for `target`. `fingerprint` is the content fingerprint ([`px_cache::hash_file`]
/// or [`px_cache::hash_dir`]) used to key the built-wheels cache slot.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub target: Target,
    pub source_path: PathBuf,
    pub fingerprint: String,
}

impl BuildRequest {
    pub fn new(target: Target, source_path: impl Into<PathBuf>, fingerprint: impl Into<String>) -> Self {
        Self {
            target,
            source_path: source_path.into(),
            fingerprint: fingerprint.into(),
        }
    }
}

/// A stage-3 unit of work: install the wheel at `wheel_path` into a chroot for `target`.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub target: Target,
    pub wheel_path: PathBuf,
    pub fingerprint: String,
}

impl InstallRequest {
    pub fn new(target: Target, wheel_path: impl Into<PathBuf>, fingerprint: impl Into<String>) -> Self {
        Self {
            target,
            wheel_path: wheel_path.into(),
            fingerprint: fingerprint.into(),
        }
    }

    /// The wheel's filename, used as the `installed_wheels` cache slot's final path component.
    pub fn wheel_file(&self) -> &str {
        self.wheel_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }
}

/// One requirement as satisfied by the resolver, carrying the local filesystem location stage 1
/// handed off to stage 2 or stage 3 (§4.1).
#[derive(Debug, Clone)]
pub struct ResolvedDistribution {
    pub requirement: String,
    pub location: PathBuf,
}

impl ResolvedDistribution {
    pub fn new(requirement: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            requirement: requirement.into(),
            location: location.into(),
        }
    }

    pub fn location(&self) -> &Path {
        &self.location
    }
}
