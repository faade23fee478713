use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use px_tags::{PlatformTriple, Target, TagSet};

/// Parse a `python_tag:abi_tag:platform_tag` CLI argument into a [`Target`].
pub fn platform_target(spec: &str) -> Result<Target> {
    let parts: Vec<&str> = spec.split(':').collect();
    let [python_tag, abi_tag, platform_tag] = parts[..] else {
        bail!("invalid --platform value {spec:?}: expected python_tag:abi_tag:platform_tag");
    };
    Ok(Target::platform(PlatformTriple::new(python_tag, abi_tag, platform_tag)))
}

/// Build a [`Target`] for a bare interpreter path.
///
/// This tool does not itself introspect interpreters for their supported tag set (that's an
/// external collaborator's job); a target built this way carries an empty tag set and is only
/// useful when the external resolver/builder/installer commands derive compatibility themselves.
pub fn interpreter_target(path: &Path) -> Result<Target> {
    let path: PathBuf = fs_err::canonicalize(path).with_context(|| format!("resolving interpreter path {}", path.display()))?;
    Ok(Target::interpreter(path, TagSet::default()))
}
