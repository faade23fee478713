use px_cache::Cache;
use px_lock::{LockedResolve, Lockfile};
use px_tags::Target;
use px_types::{Error, Options, ResolvedDistribution};
use tracing::info;

mod resource;

pub use resource::ResourceScope;

/// Run the full four-stage pipeline (§4.5–§4.8) against `targets`, returning the attributed
/// [`ResolvedDistribution`] set. Stage ordering is strict: stage N+1 never starts until stage N's
/// complete output set is in hand (§5).
pub async fn run_pipeline(
    cache: &Cache,
    options: &Options,
    targets: &[Target],
    requirements: &[String],
) -> px_types::Result<Vec<ResolvedDistribution>> {
    info!(targets = targets.len(), "stage 1: resolving");
    let resolved = px_resolve::resolve(cache, options, targets, requirements).await?;

    info!(
        build_requests = resolved.build_requests.len(),
        "stage 2: building"
    );
    let built_installs = px_build::build(cache, options, resolved.build_requests).await?;

    let mut install_requests = resolved.install_requests;
    install_requests.extend(built_installs);

    info!(install_requests = install_requests.len(), "stage 3: installing");
    let installed = px_install::install(cache, install_requests, true)?;

    info!(installs = installed.len(), "stage 4: attributing requirements");
    let attributed = px_attribute::attribute(options, installed).await?;

    Ok(attributed)
}

/// Select the best-ranked [`LockedResolve`] for each of `targets` out of `lockfile`, per §4.4.
///
/// Unlike [`run_pipeline`], this never shells out: it is pure tag-rank arithmetic over data
/// already on disk. A target with no rankable resolve yields [`Error::LockSelection`] rather than
/// aborting the whole batch, since whether that's fatal is the caller's choice (§7).
pub fn select_locks<'a>(
    lockfile: &'a Lockfile,
    targets: &[Target],
) -> Vec<(Target, px_types::Result<&'a LockedResolve>)> {
    targets
        .iter()
        .map(|target| {
            let selected = px_lock::select_best(&lockfile.locked_resolves, target).ok_or_else(|| Error::LockSelection {
                target: target.id().to_string(),
            });
            (target.clone(), selected)
        })
        .collect()
}
