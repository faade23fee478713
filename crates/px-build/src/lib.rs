use std::path::PathBuf;

use px_cache::{AtomicDirectoryHandle, Cache, LockStyle, SourceKind};
use px_jobs::JobRunner;
use px_types::{BuildRequest, Error, InstallRequest, Options};

mod command;

/// A [`BuildRequest`] whose cache slot has been entered but not yet finalized: a build job still
/// needs to populate `handle.work_dir()`.
struct PendingBuild {
    request: BuildRequest,
    handle: AtomicDirectoryHandle,
}

/// Run stage 2: build every [`BuildRequest`] into one or more wheels, reusing the built-wheels
/// cache slot when a prior invocation already finalized it.
///
/// A build failure surfaces as [`Error::Untranslateable`] and aborts the whole call, per §4.6.
pub async fn build(
    cache: &Cache,
    options: &Options,
    requests: Vec<BuildRequest>,
) -> px_types::Result<Vec<InstallRequest>> {
    let mut install_requests = Vec::new();
    let mut pending = Vec::new();

    for request in requests {
        let source_kind = if request.source_path.is_dir() {
            SourceKind::LocalProject
        } else {
            SourceKind::Sdist
        };
        let basename = request
            .source_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("source")
            .to_string();
        let slot = cache.built_wheels_slot(source_kind, &basename, &request.fingerprint, request.target.id());
        let handle = px_cache::enter(slot, LockStyle::Posix)?;

        if handle.is_finalized() {
            install_requests.extend(enumerate_wheels(handle.target_dir(), &request)?);
        } else {
            pending.push(PendingBuild { request, handle });
        }
    }

    if pending.is_empty() {
        return Ok(install_requests);
    }

    let runner = JobRunner::new(options.max_jobs);
    let built = runner
        .execute_parallel(
            pending,
            |pending| command::build(options, &pending.request.target, &pending.request.source_path, pending.handle.work_dir()),
            |pending, output| {
                if !output.status.success() {
                    return Err(Error::Untranslateable {
                        subject: pending.request.source_path.display().to_string(),
                        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    });
                }

                let target_dir = pending.handle.target_dir().to_path_buf();
                let subject = pending.request.source_path.display().to_string();
                pending
                    .handle
                    .finalize()
                    .map_err(|source| Error::BuildResultUnlockable { subject, source })?;
                enumerate_wheels(&target_dir, &pending.request)
            },
        )
        .await?;

    for wheels in built {
        install_requests.extend(wheels);
    }
    Ok(install_requests)
}

fn enumerate_wheels(dir: &std::path::Path, request: &BuildRequest) -> px_types::Result<Vec<InstallRequest>> {
    let mut requests = Vec::new();
    for entry in fs_err::read_dir(dir)? {
        let entry = entry?;
        let path: PathBuf = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("whl") {
            continue;
        }
        let fingerprint = px_cache::hash_file(&path)?;
        requests.push(InstallRequest::new(request.target.clone(), path, fingerprint));
    }
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use px_tags::{PlatformTriple, Target};

    fn target() -> Target {
        Target::platform(PlatformTriple::new("cp311", "cp311", "manylinux_2_17_x86_64"))
    }

    #[test]
    fn enumerate_wheels_only_picks_up_whl_files() {
        let dir = tempfile::tempdir().unwrap();
        fs_err::write(dir.path().join("foo-1.0-py3-none-any.whl"), b"whl").unwrap();
        fs_err::write(dir.path().join("notes.txt"), b"ignore me").unwrap();

        let request = BuildRequest::new(target(), "/src/foo-1.0.tar.gz", "fp");
        let found = enumerate_wheels(dir.path(), &request).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].wheel_file(), "foo-1.0-py3-none-any.whl");
    }
}
