use px_tags::{Tag, Target};

mod model;
mod select;

pub use model::{ArtifactRecord, LockedRequirement, LockedResolve, Lockfile, ResolverVersion};
pub use select::{rank_resolve, select_best};

/// The substring of a wheel filename after the second `-` and before the trailing `.whl`, i.e.
/// the compressed `{python_tag}-{abi_tag}-{platform_tag}` tag stem (§4.4). Returns `None` for
/// filenames with fewer than two `-`-delimited components, which cannot be a valid wheel name.
fn wheel_tag_stem(filename: &str) -> Option<&str> {
    let stripped = filename.strip_suffix(".whl")?;
    let mut parts = stripped.splitn(3, '-');
    parts.next()?;
    parts.next()?;
    parts.next()
}

fn expand_wheel_tags(filename: &str) -> Vec<Tag> {
    match wheel_tag_stem(filename) {
        Some(stem) => Tag::expand_from_wheel_stem(stem),
        None => Vec::new(),
    }
}

/// Re-exported for callers that only need to classify a single artifact's tags against a
/// [`Target`] without going through a full resolve ranking.
pub fn artifact_ranks(filename: &str, target: &Target) -> Vec<usize> {
    expand_wheel_tags(filename)
        .iter()
        .filter_map(|tag| target.supported_tags().rank(tag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_tag_stem_splits_after_name_and_version() {
        assert_eq!(
            wheel_tag_stem("foo-1.0-py3-none-any.whl"),
            Some("py3-none-any")
        );
        assert_eq!(
            wheel_tag_stem("foo_bar-1.2.3-cp311-cp311-manylinux_2_17_x86_64.whl"),
            Some("cp311-cp311-manylinux_2_17_x86_64")
        );
    }

    #[test]
    fn wheel_tag_stem_rejects_non_wheel() {
        assert_eq!(wheel_tag_stem("foo-1.0.tar.gz"), None);
    }
}
