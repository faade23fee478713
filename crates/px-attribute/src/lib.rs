use indexmap::{IndexMap, IndexSet};
use px_install::InstalledDistribution;
use px_jobs::JobRunner;
use px_types::{Error, Options, ResolvedDistribution};

mod introspect;
mod requirement;

pub use introspect::DistributionInfo;

/// Normalize a project name per PEP 503: lowercase, runs of `-`/`_`/`.` collapsed to a single
/// `-`. Used as the marker-map and final-dedup key so `Foo_Bar` and `foo-bar` are the same
/// distribution.
fn normalize(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut last_was_separator = false;
    for ch in name.chars() {
        if matches!(ch, '-' | '_' | '.') {
            if !last_was_separator && !normalized.is_empty() {
                normalized.push('-');
            }
            last_was_separator = true;
        } else {
            normalized.push(ch.to_ascii_lowercase());
            last_was_separator = false;
        }
    }
    normalized.trim_end_matches('-').to_string()
}

struct Discovered {
    chroot: std::path::PathBuf,
    distributions: Vec<DistributionInfo>,
}

/// Run stage 4: introspect every deduped install chroot, accumulate the environment-marker
/// expressions each distribution was pulled in under, and emit the final, attributed
/// [`ResolvedDistribution`] set (§4.8).
pub async fn attribute(
    options: &Options,
    installs: Vec<InstalledDistribution>,
) -> px_types::Result<Vec<ResolvedDistribution>> {
    let runner = JobRunner::new(options.max_jobs);
    let discovered = runner
        .execute_parallel(
            installs,
            |install| introspect::build(options, &install.target, &install.chroot),
            |install, output| {
                if !output.status.success() {
                    return Err(Error::Untranslateable {
                        subject: install.chroot.display().to_string(),
                        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    });
                }
                let distributions = introspect::parse(&output.stdout).map_err(Error::Json)?;
                Ok(Discovered {
                    chroot: install.chroot,
                    distributions,
                })
            },
        )
        .await?;

    let mut markers: IndexMap<String, IndexSet<String>> = IndexMap::new();
    for group in &discovered {
        for distribution in &group.distributions {
            for dependency in &distribution.requires_dists {
                let (dep_name, marker) = requirement::parse(dependency);
                if let Some(marker) = marker {
                    markers.entry(normalize(&dep_name)).or_default().insert(marker);
                }
            }
        }
    }

    let mut seen = IndexSet::new();
    let mut resolved = Vec::new();
    for group in &discovered {
        for distribution in &group.distributions {
            let key = normalize(&distribution.name);
            if !seen.insert(key.clone()) {
                continue;
            }
            let requirement = final_requirement(distribution, markers.get(&key));
            resolved.push(ResolvedDistribution::new(requirement, group.chroot.clone()));
        }
    }
    Ok(resolved)
}

fn final_requirement(distribution: &DistributionInfo, markers: Option<&IndexSet<String>>) -> String {
    let pin = format!("{} == {}", distribution.name, distribution.version);
    match markers {
        None => pin,
        Some(markers) if markers.is_empty() => pin,
        Some(markers) if markers.len() == 1 => format!("{pin}; {}", markers[0]),
        Some(markers) => {
            let conjunction = markers
                .iter()
                .map(|marker| format!("({marker})"))
                .collect::<Vec<_>>()
                .join(" and ");
            format!("{pin}; {conjunction}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_separators_and_case() {
        assert_eq!(normalize("Foo_Bar.Baz"), "foo-bar-baz");
        assert_eq!(normalize("foo--bar"), "foo-bar");
    }

    #[test]
    fn no_markers_yields_bare_pin() {
        let distribution = DistributionInfo {
            name: "foo".into(),
            version: "1.0".into(),
            requires_dists: Vec::new(),
        };
        assert_eq!(final_requirement(&distribution, None), "foo == 1.0");
    }

    #[test]
    fn single_marker_is_appended() {
        let distribution = DistributionInfo {
            name: "foo".into(),
            version: "1.0".into(),
            requires_dists: Vec::new(),
        };
        let mut markers = IndexSet::new();
        markers.insert("python_version >= \"3.8\"".to_string());
        assert_eq!(
            final_requirement(&distribution, Some(&markers)),
            "foo == 1.0; python_version >= \"3.8\""
        );
    }

    #[test]
    fn multiple_markers_are_anded_in_insertion_order() {
        let distribution = DistributionInfo {
            name: "foo".into(),
            version: "1.0".into(),
            requires_dists: Vec::new(),
        };
        let mut markers = IndexSet::new();
        markers.insert("extra == \"a\"".to_string());
        markers.insert("extra == \"b\"".to_string());
        assert_eq!(
            final_requirement(&distribution, Some(&markers)),
            "foo == 1.0; (extra == \"a\") and (extra == \"b\")"
        );
    }
}
