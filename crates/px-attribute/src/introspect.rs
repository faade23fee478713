use std::path::Path;

use px_tags::Target;
use px_types::Options;
use serde::Deserialize;
use tokio::process::Command;

/// One distribution as reported by the introspector subprocess: its name, pinned version, and
/// every dependency requirement string declared in its metadata (§4.8).
#[derive(Debug, Clone, Deserialize)]
pub struct DistributionInfo {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub requires_dists: Vec<String>,
}

pub fn build(options: &Options, target: &Target, chroot: &Path) -> Command {
    let (program, leading_args) = options
        .introspector_command
        .split_first()
        .expect("introspector_command must name at least a program");

    let mut command = Command::new(program);
    command.args(leading_args);
    command.arg(chroot);
    if let Some(path) = target.interpreter_path() {
        command.arg("--python").arg(path);
    }
    command
}

pub fn parse(stdout: &[u8]) -> serde_json::Result<Vec<DistributionInfo>> {
    serde_json::from_slice(stdout)
}
