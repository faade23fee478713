use std::path::Path;

use px_tags::Target;
use px_types::Options;
use tokio::process::Command;

/// Build the external resolver invocation for one target (§6): indexes, find-links, the
/// prerelease/wheel/build/transitive toggles, the target specification, a download directory,
/// and the requirement set.
pub fn build(options: &Options, target: &Target, download_dir: &Path, requirements: &[String]) -> Command {
    let (program, leading_args) = options
        .resolver_command
        .split_first()
        .expect("resolver_command must name at least a program");

    let mut command = Command::new(program);
    command.args(leading_args);
    command.arg("--download-dir").arg(download_dir);

    if let Some(path) = target.interpreter_path() {
        command.arg("--python").arg(path);
    }
    if let Some(triple) = target.platform_triple() {
        command
            .arg("--platform")
            .arg(format!("{}-{}-{}", triple.python_tag, triple.abi_tag, triple.platform_tag));
    }

    if options.allow_prereleases {
        command.arg("--pre");
    }
    if !options.allow_wheels {
        command.arg("--no-binary").arg(":all:");
    }
    if !options.allow_builds {
        command.arg("--only-binary").arg(":all:");
    }
    if !options.transitive {
        command.arg("--no-deps");
    }
    for index in &options.indexes {
        command.arg("--index-url").arg(index);
    }
    for find_links in &options.find_links {
        command.arg("--find-links").arg(find_links);
    }

    command.args(requirements);
    command
}
