use px_tags::Target;

use crate::expand_wheel_tags;
use crate::model::{LockedRequirement, LockedResolve};

/// Rank a single [`LockedRequirement`] against `target`: the minimum known rank over its
/// artifacts, or `None` if no artifact has a known rank at all (§4.4).
fn rank_requirement(requirement: &LockedRequirement, target: &Target, source_rank: usize) -> Option<usize> {
    requirement
        .artifacts
        .iter()
        .filter_map(|artifact| {
            if artifact.is_wheel() {
                expand_wheel_tags(artifact.filename())
                    .iter()
                    .filter_map(|tag| target.supported_tags().rank(tag))
                    .min()
            } else {
                Some(source_rank)
            }
        })
        .min()
}

/// Average requirement rank of `resolve` against `target`, per §4.4: `None` if any requirement
/// is unrankable, which makes the whole resolve unrankable.
pub fn rank_resolve(resolve: &LockedResolve, target: &Target) -> Option<f64> {
    if resolve.locked_requirements.is_empty() {
        return Some(0.0);
    }

    let source_rank = target.supported_tags().len();
    let mut total = 0usize;
    for requirement in &resolve.locked_requirements {
        total += rank_requirement(requirement, target, source_rank)?;
    }
    Some(total as f64 / resolve.locked_requirements.len() as f64)
}

/// Pick the best-ranked [`LockedResolve`] for `target` out of `resolves`: lowest average
/// requirement rank, ties broken lexicographically on platform tag. Returns `None` if no resolve
/// ranks against the target at all.
pub fn select_best<'a>(resolves: &'a [LockedResolve], target: &Target) -> Option<&'a LockedResolve> {
    resolves
        .iter()
        .filter_map(|resolve| rank_resolve(resolve, target).map(|rank| (rank, resolve)))
        .min_by(|(rank_a, resolve_a), (rank_b, resolve_b)| {
            rank_a
                .partial_cmp(rank_b)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| resolve_a.platform_tag.cmp(&resolve_b.platform_tag))
        })
        .map(|(_, resolve)| resolve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ArtifactRecord;
    use px_tags::PlatformTriple;

    fn cp311_target() -> Target {
        Target::platform(PlatformTriple {
            python_tag: "cp311".into(),
            abi_tag: "cp311".into(),
            platform_tag: "manylinux_2_17_x86_64".into(),
        })
    }

    fn wheel_requirement(filename: &str) -> LockedRequirement {
        LockedRequirement {
            project_name: "foo".into(),
            version: "1.0".into(),
            requires_python: None,
            requires_dists: Vec::new(),
            artifacts: vec![ArtifactRecord {
                url: format!("https://example.com/{filename}"),
                algorithm: Some("sha256".into()),
                hash: Some("deadbeef".into()),
            }],
        }
    }

    #[test]
    fn exact_tag_wheel_ranks_zero() {
        let target = cp311_target();
        let resolve = LockedResolve {
            platform_tag: ["cp311".into(), "cp311".into(), "manylinux_2_17_x86_64".into()],
            locked_requirements: vec![wheel_requirement(
                "foo-1.0-cp311-cp311-manylinux_2_17_x86_64.whl",
            )],
        };
        assert_eq!(rank_resolve(&resolve, &target), Some(0.0));
    }

    #[test]
    fn source_only_requirement_ranks_worse_than_any_wheel() {
        let target = cp311_target();
        let resolve = LockedResolve {
            platform_tag: ["cp311".into(), "cp311".into(), "manylinux_2_17_x86_64".into()],
            locked_requirements: vec![LockedRequirement {
                project_name: "foo".into(),
                version: "1.0".into(),
                requires_python: None,
                requires_dists: Vec::new(),
                artifacts: vec![ArtifactRecord {
                    url: "https://example.com/foo-1.0.tar.gz".into(),
                    algorithm: Some("sha256".into()),
                    hash: Some("deadbeef".into()),
                }],
            }],
        };
        let rank = rank_resolve(&resolve, &target).unwrap();
        assert_eq!(rank, target.supported_tags().len() as f64);
    }

    #[test]
    fn incompatible_wheel_makes_resolve_unrankable() {
        let target = cp311_target();
        let resolve = LockedResolve {
            platform_tag: ["cp27".into(), "cp27mu".into(), "manylinux_2_17_x86_64".into()],
            locked_requirements: vec![wheel_requirement("foo-1.0-cp27-cp27mu-manylinux_2_17_x86_64.whl")],
        };
        assert_eq!(rank_resolve(&resolve, &target), None);
    }

    #[test]
    fn select_best_picks_lowest_rank_with_lexicographic_tiebreak() {
        let target = cp311_target();
        let compatible = LockedResolve {
            platform_tag: ["cp311".into(), "cp311".into(), "manylinux_2_17_x86_64".into()],
            locked_requirements: vec![wheel_requirement(
                "foo-1.0-cp311-cp311-manylinux_2_17_x86_64.whl",
            )],
        };
        let incompatible = LockedResolve {
            platform_tag: ["cp27".into(), "cp27mu".into(), "manylinux_2_17_x86_64".into()],
            locked_requirements: vec![wheel_requirement("foo-1.0-cp27-cp27mu-manylinux_2_17_x86_64.whl")],
        };
        let resolves = vec![incompatible, compatible.clone()];
        let selected = select_best(&resolves, &target).unwrap();
        assert_eq!(selected.platform_tag, compatible.platform_tag);
    }

    #[test]
    fn no_rankable_resolve_returns_none() {
        let target = cp311_target();
        let incompatible = LockedResolve {
            platform_tag: ["cp27".into(), "cp27mu".into(), "manylinux_2_17_x86_64".into()],
            locked_requirements: vec![wheel_requirement("foo-1.0-cp27-cp27mu-manylinux_2_17_x86_64.whl")],
        };
        assert_eq!(select_best(&[incompatible], &target), None);
    }
}
