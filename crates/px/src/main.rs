use anyhow::{Context, Result};
use clap::Parser;
use px_cache::Cache;
use px_dispatch::ResourceScope;
use px_types::Options;
use tracing_subscriber::EnvFilter;

mod cli;
mod targets;

use cli::{Cli, Command, ResolveArgs, SelectLockArgs};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Resolve(args) => run_resolve(args).await,
        Command::SelectLock(args) => run_select_lock(args),
    }
}

async fn run_resolve(args: ResolveArgs) -> Result<()> {
    let mut scope = ResourceScope::new();
    let cache = match args.cache_dir {
        Some(dir) => Cache::at(dir).context("creating cache directory")?,
        None => {
            let (cache, temp_dir) = Cache::temporary().context("creating temporary cache")?;
            scope.adopt(temp_dir);
            cache
        }
    };

    let mut targets = Vec::new();
    for path in &args.interpreters {
        targets.push(targets::interpreter_target(path)?);
    }
    for platform in &args.platforms {
        targets.push(targets::platform_target(platform)?);
    }
    anyhow::ensure!(!targets.is_empty(), "at least one --interpreter or --platform is required");

    let mut options = Options::from_env();
    options.allow_prereleases = args.allow_prereleases;
    options.allow_wheels = !args.no_wheels;
    options.allow_builds = !args.no_builds;
    options.transitive = !args.no_transitive;
    options.indexes = args.indexes;
    options.find_links = args.find_links;
    if let Some(max_jobs) = args.max_jobs {
        options.max_jobs = max_jobs;
    }
    options.resolver_command = split_command(&args.resolver_cmd);
    options.builder_command = split_command(&args.builder_cmd);
    options.installer_command = split_command(&args.installer_cmd);
    options.introspector_command = split_command(&args.introspector_cmd);

    let resolved = px_dispatch::run_pipeline(&cache, &options, &targets, &args.requirements).await?;

    let output: Vec<_> = resolved
        .iter()
        .map(|dist| {
            serde_json::json!({
                "requirement": dist.requirement,
                "location": dist.location().display().to_string(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);

    drop(scope);
    Ok(())
}

fn run_select_lock(args: SelectLockArgs) -> Result<()> {
    let text = fs_err::read_to_string(&args.lockfile).context("reading lockfile")?;
    let lockfile = px_lock::Lockfile::from_json(&text).context("parsing lockfile")?;

    let mut targets = Vec::new();
    for platform in &args.platforms {
        targets.push(targets::platform_target(platform)?);
    }
    anyhow::ensure!(!targets.is_empty(), "at least one --platform is required");

    for (target, selection) in px_dispatch::select_locks(&lockfile, &targets) {
        match selection {
            Ok(resolve) => println!("{}: {}", target.id(), resolve.platform_tag.join(",")),
            Err(err) => eprintln!("{}: {err}", target.id()),
        }
    }
    Ok(())
}

/// Split a configured external command into a program and its leading arguments.
///
/// This is intentionally a plain whitespace split, not a full shell-quoting parser: the commands
/// this tool shells out to are resolver/builder/installer/introspector invocations configured by
/// the operator, not arbitrary shell snippets.
fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}
