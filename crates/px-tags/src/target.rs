use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::tag::TagSet;

/// The most-specific `(python_tag, abi_tag, platform_tag)` triple naming a target's platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformTriple {
    pub python_tag: String,
    pub abi_tag: String,
    pub platform_tag: String,
}

impl PlatformTriple {
    pub fn new(
        python_tag: impl Into<String>,
        abi_tag: impl Into<String>,
        platform_tag: impl Into<String>,
    ) -> Self {
        Self {
            python_tag: python_tag.into(),
            abi_tag: abi_tag.into(),
            platform_tag: platform_tag.into(),
        }
    }
}

/// The identity of a [`Target`]: what we actually know about the runtime we're resolving for.
///
/// A target with only a `Platform` cannot build from source, since building requires an
/// interpreter to invoke the external builder with.
#[derive(Debug, Clone)]
enum TargetKind {
    Interpreter(PathBuf),
    Platform(PlatformTriple),
    Both(PathBuf, PlatformTriple),
}

/// A runtime a resolve must satisfy: an interpreter, a platform tag triple, or both.
#[derive(Debug, Clone)]
pub struct Target {
    kind: TargetKind,
    tags: TagSet,
    id: String,
}

impl Target {
    /// A target identified by a concrete interpreter, whose supported tag set was already
    /// derived by interpreter introspection (out of scope for this crate).
    pub fn interpreter(path: impl Into<PathBuf>, tags: TagSet) -> Self {
        let path = path.into();
        let id = Self::derive_id(Some(&path), &tags);
        Self {
            kind: TargetKind::Interpreter(path),
            tags,
            id,
        }
    }

    /// A target identified only by a platform tag triple; the full compatible tag set is
    /// derived from it via [`TagSet::from_triple`].
    pub fn platform(triple: PlatformTriple) -> Self {
        let tags = TagSet::from_triple(&triple.python_tag, &triple.abi_tag, &triple.platform_tag);
        let id = Self::derive_id(None, &tags);
        Self {
            kind: TargetKind::Platform(triple),
            tags,
            id,
        }
    }

    /// A target identified by both a concrete interpreter and an explicit tag set (e.g. when
    /// cross-compiling for a platform using a host interpreter to drive the build).
    pub fn both(path: impl Into<PathBuf>, triple: PlatformTriple, tags: TagSet) -> Self {
        let path = path.into();
        let id = Self::derive_id(Some(&path), &tags);
        Self {
            kind: TargetKind::Both(path, triple),
            tags,
            id,
        }
    }

    /// Whether this target can build distributions from source (it has an interpreter to
    /// invoke the external builder with).
    pub fn can_build(&self) -> bool {
        matches!(self.kind, TargetKind::Interpreter(_) | TargetKind::Both(..))
    }

    pub fn interpreter_path(&self) -> Option<&Path> {
        match &self.kind {
            TargetKind::Interpreter(path) | TargetKind::Both(path, _) => Some(path),
            TargetKind::Platform(_) => None,
        }
    }

    pub fn platform_triple(&self) -> Option<&PlatformTriple> {
        match &self.kind {
            TargetKind::Platform(triple) | TargetKind::Both(_, triple) => Some(triple),
            TargetKind::Interpreter(_) => None,
        }
    }

    pub fn supported_tags(&self) -> &TagSet {
        &self.tags
    }

    /// A stable, short, filesystem-safe identifier for this target, used in cache paths. Two
    /// targets with the same supported tag set always share an `id`; two targets with
    /// different supported tag sets never do.
    pub fn id(&self) -> &str {
        &self.id
    }

    fn derive_id(path: Option<&Path>, tags: &TagSet) -> String {
        let mut hasher = Sha256::new();
        for tag in tags.iter() {
            hasher.update(tag.to_string().as_bytes());
            hasher.update(b"\0");
        }
        let digest = hasher.finalize();
        let short = &data_encoding_hex(&digest)[..16];

        match path.and_then(|p| p.file_name()).and_then(|n| n.to_str()) {
            Some(label) => format!("{label}-{short}"),
            None => short.to_string(),
        }
    }
}

/// Minimal, dependency-free hex encoding (avoids pulling in a whole `data-encoding` crate for
/// a single call site).
fn data_encoding_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Tag;

    #[test]
    fn id_differs_when_tags_differ() {
        let a = Target::interpreter("/usr/bin/python3.11", TagSet::new(vec![Tag::new("cp311", "cp311", "linux_x86_64")]));
        let b = Target::interpreter("/usr/bin/python3.11", TagSet::new(vec![Tag::new("cp312", "cp312", "linux_x86_64")]));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn id_stable_for_same_tags() {
        let tags = TagSet::new(vec![Tag::new("cp311", "cp311", "linux_x86_64")]);
        let a = Target::interpreter("/usr/bin/python3.11", tags.clone());
        let b = Target::interpreter("/usr/bin/python3.11", tags);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn platform_only_target_cannot_build() {
        let target = Target::platform(PlatformTriple::new("cp311", "cp311", "manylinux_2_17_x86_64"));
        assert!(!target.can_build());
        assert!(target.interpreter_path().is_none());
    }

    #[test]
    fn interpreter_target_can_build() {
        let target = Target::interpreter("/usr/bin/python3.11", TagSet::default());
        assert!(target.can_build());
    }
}
