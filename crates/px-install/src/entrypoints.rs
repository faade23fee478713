use std::io;
use std::path::Path;

use crate::layout::Category;

/// Render the entry-point trampoline template (§6) for `object_ref`, an `{module}:{qualname}`
/// reference.
fn render_trampoline(object_ref: &str) -> String {
    format!(
        "#!python\n\
         # -*- coding: utf-8 -*-\n\
         import importlib, sys\n\
         object_ref = \"{object_ref}\"\n\
         modname, sep, qualname = object_ref.partition(':')\n\
         entry = importlib.import_module(modname)\n\
         if sep:\n\
         \x20   for a in qualname.split('.'): entry = getattr(entry, a)\n\
         if __name__ == '__main__':\n\
         \x20   sys.exit(entry())\n"
    )
}

/// Parse the `[console_scripts]`/`[gui_scripts]` sections of an `entry_points.txt` file (the
/// `ConfigParser`-style ini format setuptools/pip have always written) into `(name, object_ref)`
/// pairs.
fn parse_entry_points(contents: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut in_scripts_section = false;
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(section) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            in_scripts_section = section == "console_scripts" || section == "gui_scripts";
            continue;
        }
        if !in_scripts_section {
            continue;
        }
        if let Some((name, object_ref)) = line.split_once('=') {
            entries.push((name.trim().to_string(), object_ref.trim().to_string()));
        }
    }
    entries
}

/// Materialize every console/GUI script declared in `entry_points_txt` as an executable
/// trampoline under the chroot's `.prefix/bin`.
pub fn install_entry_points(chroot: &Path, entry_points_txt: &str) -> io::Result<()> {
    let bin_dir = chroot.join(Category::Scripts.destination("", ""));
    fs_err::create_dir_all(&bin_dir)?;

    for (name, object_ref) in parse_entry_points(entry_points_txt) {
        let script_path = bin_dir.join(&name);
        fs_err::write(&script_path, render_trampoline(&object_ref))?;
        set_executable(&script_path)?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = fs_err::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs_err::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY_POINTS: &str = "[console_scripts]\nfoo = foo.cli:main\n\n[gui_scripts]\nfoo-gui = foo.gui:run\n\n[foo.plugins]\nignored = foo.plugins:not_a_script\n";

    #[test]
    fn parses_console_and_gui_scripts_only() {
        let entries = parse_entry_points(ENTRY_POINTS);
        assert_eq!(
            entries,
            vec![
                ("foo".to_string(), "foo.cli:main".to_string()),
                ("foo-gui".to_string(), "foo.gui:run".to_string()),
            ]
        );
    }

    #[test]
    fn installs_executable_trampolines() {
        let dir = tempfile::tempdir().unwrap();
        install_entry_points(dir.path(), ENTRY_POINTS).unwrap();
        let script = dir.path().join(".prefix/bin/foo");
        assert!(script.exists());
        let contents = fs_err::read_to_string(&script).unwrap();
        assert!(contents.contains("foo.cli:main"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs_err::metadata(&script).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }
}
