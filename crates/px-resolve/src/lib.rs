use px_cache::Cache;
use px_jobs::JobRunner;
use px_tags::Target;
use px_types::{Artifact, ArtifactKind, BuildRequest, InstallRequest, Options};

mod classify;
mod command;

/// The classified output of stage 1 (§4.5): every downloaded wheel becomes an [`InstallRequest`],
/// everything else (sdists, local project checkouts) a [`BuildRequest`].
#[derive(Debug, Default)]
pub struct ResolveOutcome {
    pub install_requests: Vec<InstallRequest>,
    pub build_requests: Vec<BuildRequest>,
}

/// Run stage 1: resolve `requirements` against each of `targets` via the external resolver
/// subprocess, in parallel, then classify the results.
///
/// A failed resolve for any target aborts the whole call with [`px_types::Error::Unsatisfiable`];
/// targets that already succeeded are not undone (their scratch directories simply aren't
/// consumed by later stages).
pub async fn resolve(
    cache: &Cache,
    options: &Options,
    targets: &[Target],
    requirements: &[String],
) -> px_types::Result<ResolveOutcome> {
    for target in targets {
        fs_err::create_dir_all(cache.resolved_dists_dir(target.id()))?;
    }

    let runner = JobRunner::new(options.max_jobs);
    let resolved_targets = runner
        .execute_parallel(
            targets.to_vec(),
            |target| {
                let download_dir = cache.resolved_dists_dir(target.id());
                command::build(options, target, &download_dir, requirements)
            },
            |target, output| {
                if output.status.success() {
                    Ok(target)
                } else {
                    Err(px_types::Error::Unsatisfiable {
                        target: target.id().to_string(),
                        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    })
                }
            },
        )
        .await?;

    let mut outcome = ResolveOutcome::default();
    for target in &resolved_targets {
        classify_downloads(cache, target, &mut outcome)?;
        classify_local_projects(target, requirements, &mut outcome)?;
    }
    Ok(outcome)
}

fn classify_downloads(cache: &Cache, target: &Target, outcome: &mut ResolveOutcome) -> px_types::Result<()> {
    let dir = cache.resolved_dists_dir(target.id());
    for entry in fs_err::read_dir(&dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let filename = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
        let fingerprint = px_cache::hash_file(&path)?;
        match Artifact::new(filename).kind() {
            ArtifactKind::Wheel => outcome
                .install_requests
                .push(InstallRequest::new(target.clone(), path, fingerprint)),
            ArtifactKind::Source => outcome
                .build_requests
                .push(BuildRequest::new(target.clone(), path, fingerprint)),
        }
    }
    Ok(())
}

fn classify_local_projects(
    target: &Target,
    requirements: &[String],
    outcome: &mut ResolveOutcome,
) -> px_types::Result<()> {
    for requirement in requirements {
        if let Some(local_path) = classify::local_project_path(requirement) {
            let fingerprint = px_cache::hash_dir(&local_path)?;
            outcome
                .build_requests
                .push(BuildRequest::new(target.clone(), local_path, fingerprint));
        }
    }
    Ok(())
}
