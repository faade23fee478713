use std::collections::HashMap;
use std::io;

use px_cache::{Cache, LockStyle};
use px_tags::Target;
use px_types::{Error, InstallRequest};
use tracing::debug;

mod entrypoints;
mod layout;
mod record;
mod wheel;

const INSTALLER_TAG: &str = "px\n";

/// One deduped, resolved install (§4.7): the chroot a wheel ended up in, plus the target that
/// requested it (kept so stage 4 knows which interpreter to introspect with).
#[derive(Debug, Clone)]
pub struct InstalledDistribution {
    pub chroot: std::path::PathBuf,
    pub target: Target,
    pub wheel_file: String,
}

/// Run stage 3: dedup `requests` by wheel basename, install each representative into its own
/// content-addressed chroot, and return one [`InstalledDistribution`] per unique wheel.
///
/// Unlike stages 1 and 2, installation happens natively in-process rather than via an external
/// subprocess: extracting a wheel's own archive per the binary-distribution layout needs no SAT
/// solving or build backend, only deterministic unpacking, so there is nothing an external tool
/// would buy over doing it directly (see `DESIGN.md`).
///
/// A single `requested` flag (whether a `REQUESTED` marker should be written) applies uniformly;
/// callers needing per-distribution control can call [`install_one`] directly.
pub fn install(cache: &Cache, requests: Vec<InstallRequest>, requested: bool) -> px_types::Result<Vec<InstalledDistribution>> {
    let mut by_wheel: HashMap<String, InstallRequest> = HashMap::new();
    for request in requests {
        by_wheel.entry(request.wheel_file().to_string()).or_insert(request);
    }

    let mut installed = Vec::with_capacity(by_wheel.len());
    for (wheel_file, request) in by_wheel {
        installed.push(install_one(cache, &request, &wheel_file, requested)?);
    }
    Ok(installed)
}

fn install_one(
    cache: &Cache,
    request: &InstallRequest,
    wheel_file: &str,
    requested: bool,
) -> px_types::Result<InstalledDistribution> {
    let slot = cache.installed_wheels_slot(&request.fingerprint, wheel_file);
    let handle = px_cache::enter(slot, LockStyle::Posix)?;

    if handle.is_finalized() {
        debug!(wheel = wheel_file, "installed wheel slot already finalized, reusing");
        return Ok(InstalledDistribution {
            chroot: handle.target_dir().to_path_buf(),
            target: request.target.clone(),
            wheel_file: wheel_file.to_string(),
        });
    }

    let project_name = project_name_from_wheel(wheel_file);
    let python_tag = python_version_tag(&request.target);
    let chroot = handle.work_dir().to_path_buf();

    let result: io::Result<()> = (|| {
        let dist_info_dir = wheel::extract(&request.wheel_path, &chroot, &project_name, &python_tag)?;
        let dist_info_path = chroot.join(&dist_info_dir);

        let record_path = dist_info_path.join("RECORD");
        fs_err::write(&record_path, "")?;
        record::write_record(&chroot, &record_path)?;

        fs_err::write(dist_info_path.join("INSTALLER"), INSTALLER_TAG)?;
        if requested {
            fs_err::write(dist_info_path.join("REQUESTED"), "")?;
        }

        let entry_points_path = dist_info_path.join("entry_points.txt");
        if entry_points_path.exists() {
            let entry_points = fs_err::read_to_string(&entry_points_path)?;
            entrypoints::install_entry_points(&chroot, &entry_points)?;
            record::write_record(&chroot, &record_path)?;
        }
        Ok(())
    })();

    if let Err(source) = result {
        return Err(Error::InstallResultUnlockable {
            subject: wheel_file.to_string(),
            source,
        });
    }

    handle
        .finalize()
        .map_err(|source| Error::InstallResultUnlockable {
            subject: wheel_file.to_string(),
            source,
        })?;

    Ok(InstalledDistribution {
        chroot: cache.installed_wheels_slot(&request.fingerprint, wheel_file),
        target: request.target.clone(),
        wheel_file: wheel_file.to_string(),
    })
}

fn project_name_from_wheel(wheel_file: &str) -> String {
    wheel_file.split('-').next().unwrap_or(wheel_file).to_string()
}

/// Derive a `pythonX.Y`-style directory name from a target's most specific CPython tag, for the
/// header install path. Falls back to `python3` when the tag isn't a recognizable `cpXY` tag.
fn python_version_tag(target: &Target) -> String {
    let Some(tag) = target.supported_tags().iter().next() else {
        return "python3".to_string();
    };
    let Some(digits) = tag.python_tag.strip_prefix("cp") else {
        return "python3".to_string();
    };
    if digits.len() < 2 {
        return "python3".to_string();
    }
    let (major, minor) = digits.split_at(1);
    format!("python{major}.{minor}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_name_is_first_dash_component() {
        assert_eq!(project_name_from_wheel("foo_bar-1.2.3-py3-none-any.whl"), "foo_bar");
    }

    #[test]
    fn python_version_tag_parses_cp_tags() {
        let target = Target::platform(px_tags::PlatformTriple::new(
            "cp311",
            "cp311",
            "manylinux_2_17_x86_64",
        ));
        assert_eq!(python_version_tag(&target), "python3.11");
    }
}
