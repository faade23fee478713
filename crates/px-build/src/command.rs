use std::path::Path;

use px_tags::Target;
use px_types::Options;
use tokio::process::Command;

/// Build the external wheel-builder invocation for one source (§6): a source path, an output
/// directory, and the interpreter to build against.
pub fn build(options: &Options, target: &Target, source_path: &Path, output_dir: &Path) -> Command {
    let (program, leading_args) = options
        .builder_command
        .split_first()
        .expect("builder_command must name at least a program");

    let mut command = Command::new(program);
    command.args(leading_args);
    command.arg(source_path);
    command.arg("--output-dir").arg(output_dir);
    if let Some(path) = target.interpreter_path() {
        command.arg("--python").arg(path);
    }
    command
}
