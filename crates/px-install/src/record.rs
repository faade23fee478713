use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Regenerate the `RECORD` file at `record_path` (inside a `*.dist-info` directory) to enumerate
/// every file under `chroot`, per §6: CSV rows of `relative_path,"sha256=<base64-no-padding>",
/// byte_size`, with `.pyc` files never recorded (they are never installed in the first place,
/// see [`crate::wheel`]) and `RECORD`'s own row carrying an empty hash and size.
pub fn write_record(chroot: &Path, record_path: &Path) -> io::Result<()> {
    let mut rows: Vec<(PathBuf, Option<String>, Option<u64>)> = Vec::new();

    for entry in walkdir::WalkDir::new(chroot).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relative = path.strip_prefix(chroot).unwrap_or(path).to_path_buf();

        if path == record_path {
            rows.push((relative, None, None));
            continue;
        }

        let contents = fs_err::read(path)?;
        let hash = STANDARD_NO_PAD.encode(Sha256::digest(&contents));
        rows.push((relative, Some(format!("sha256={hash}")), Some(contents.len() as u64)));
    }

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(record_path)?;
    for (path, hash, size) in rows {
        writer.write_record([
            path.to_string_lossy().replace('\\', "/"),
            hash.unwrap_or_default(),
            size.map(|size| size.to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
