use std::io::{self, Read};
use std::path::Path;

use crate::layout::Category;

/// Extract `wheel_path` into `chroot` per the binary-distribution layout (§4.7): purelib/platlib
/// entries land at the chroot root; `{distribution}-{version}.data/<category>/...` entries are
/// re-rooted under the `.prefix` stash per [`Category::destination`]. `.pyc` files are never
/// extracted, matching the RECORD writer's exclusion rule. Returns the name of the extracted
/// `*.dist-info` directory.
pub fn extract(wheel_path: &Path, chroot: &Path, project_name: &str, python_tag: &str) -> io::Result<String> {
    let file = fs_err::File::open(wheel_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(to_io_error)?;

    let mut dist_info_dir = None;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(to_io_error)?;
        let Some(name) = entry.enclosed_name().map(|path| path.to_path_buf()) else {
            continue;
        };
        if entry.is_dir() {
            continue;
        }
        if name.extension().and_then(|ext| ext.to_str()) == Some("pyc") {
            continue;
        }

        let mut top = name.components();
        let first = top.next();
        let rest: std::path::PathBuf = top.as_path().to_path_buf();

        let destination = match first.and_then(|c| c.as_os_str().to_str()) {
            Some(component) if component.ends_with(".data") => {
                let mut rest_components = rest.components();
                let category_name = rest_components
                    .next()
                    .and_then(|c| c.as_os_str().to_str())
                    .unwrap_or_default();
                match Category::from_data_dir_name(category_name) {
                    Some(category) => category
                        .destination(project_name, python_tag)
                        .join(rest_components.as_path()),
                    None => continue,
                }
            }
            _ => name.clone(),
        };

        if let Some(component) = first.and_then(|c| c.as_os_str().to_str()) {
            if component.ends_with(".dist-info") {
                dist_info_dir.get_or_insert_with(|| component.to_string());
            }
        }

        let target_path = chroot.join(&destination);
        if let Some(parent) = target_path.parent() {
            fs_err::create_dir_all(parent)?;
        }
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        fs_err::write(&target_path, &contents)?;
    }

    dist_info_dir.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "wheel has no *.dist-info directory"))
}

fn to_io_error(err: zip::result::ZipError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_test_wheel(path: &Path) {
        let file = fs_err::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default();

        writer.start_file("foo/__init__.py", options).unwrap();
        writer.write_all(b"value = 1\n").unwrap();

        writer.start_file("foo-1.0.dist-info/METADATA", options).unwrap();
        writer.write_all(b"Metadata-Version: 2.1\nName: foo\n").unwrap();

        writer.start_file("foo-1.0.dist-info/RECORD", options).unwrap();
        writer.write_all(b"").unwrap();

        writer.start_file("foo-1.0.data/scripts/foo-cli", options).unwrap();
        writer.write_all(b"#!python\n").unwrap();

        writer
            .start_file("foo/__pycache__/foo.cpython-311.pyc", options)
            .unwrap();
        writer.write_all(b"junk").unwrap();

        writer.finish().unwrap();
    }

    #[test]
    fn extracts_purelib_to_chroot_root() {
        let dir = tempfile::tempdir().unwrap();
        let wheel_path = dir.path().join("foo-1.0-py3-none-any.whl");
        build_test_wheel(&wheel_path);
        let chroot = dir.path().join("chroot");
        fs_err::create_dir_all(&chroot).unwrap();

        let dist_info = extract(&wheel_path, &chroot, "foo", "python3.11").unwrap();
        assert_eq!(dist_info, "foo-1.0.dist-info");
        assert!(chroot.join("foo/__init__.py").exists());
    }

    #[test]
    fn scripts_category_lands_under_prefix_bin() {
        let dir = tempfile::tempdir().unwrap();
        let wheel_path = dir.path().join("foo-1.0-py3-none-any.whl");
        build_test_wheel(&wheel_path);
        let chroot = dir.path().join("chroot");
        fs_err::create_dir_all(&chroot).unwrap();

        extract(&wheel_path, &chroot, "foo", "python3.11").unwrap();
        assert!(chroot.join(".prefix/bin/foo-cli").exists());
    }

    #[test]
    fn pyc_files_are_never_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let wheel_path = dir.path().join("foo-1.0-py3-none-any.whl");
        build_test_wheel(&wheel_path);
        let chroot = dir.path().join("chroot");
        fs_err::create_dir_all(&chroot).unwrap();

        extract(&wheel_path, &chroot, "foo", "python3.11").unwrap();
        assert!(!chroot.join("foo/__pycache__").exists());
    }
}
