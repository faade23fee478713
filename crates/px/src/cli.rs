use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "px", version = px_version::VERSION, about = "Multi-target resolve/build/install orchestrator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the resolve/build/install/attribute pipeline against one or more targets.
    Resolve(ResolveArgs),
    /// Pick the best-ranked locked resolve for one or more targets out of a lockfile.
    SelectLock(SelectLockArgs),
}

#[derive(Parser)]
pub struct ResolveArgs {
    /// Requirement strings or local project paths, in the order they should be resolved.
    pub requirements: Vec<String>,

    /// Persistent cache directory; a temporary one is used if omitted.
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// An interpreter binary to resolve for. Repeatable.
    #[arg(long = "interpreter")]
    pub interpreters: Vec<PathBuf>,

    /// A `python_tag:abi_tag:platform_tag` triple to resolve for. Repeatable.
    #[arg(long = "platform")]
    pub platforms: Vec<String>,

    #[arg(long, default_value = "pip")]
    pub resolver_cmd: String,
    #[arg(long, default_value = "pip wheel")]
    pub builder_cmd: String,
    #[arg(long, default_value = "pip install")]
    pub installer_cmd: String,
    #[arg(long, default_value = "px-introspect")]
    pub introspector_cmd: String,

    #[arg(long)]
    pub allow_prereleases: bool,
    #[arg(long)]
    pub no_wheels: bool,
    #[arg(long)]
    pub no_builds: bool,
    #[arg(long)]
    pub no_transitive: bool,
    #[arg(long = "index")]
    pub indexes: Vec<String>,
    #[arg(long = "find-links")]
    pub find_links: Vec<String>,
    #[arg(long)]
    pub max_jobs: Option<usize>,
}

#[derive(Parser)]
pub struct SelectLockArgs {
    pub lockfile: PathBuf,

    /// A `python_tag:abi_tag:platform_tag` triple to select a resolve for. Repeatable.
    #[arg(long = "platform")]
    pub platforms: Vec<String>,
}
