use std::future::Future;
use std::pin::Pin;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::process::Command;
use tracing::debug;

/// Bounded-concurrency executor for the external subprocess invocations each pipeline stage
/// issues (one resolver/builder/installer/introspector process per target or per artifact).
///
/// Jobs are launched up to `max_jobs` at a time; as each finishes, its slot is refilled from the
/// remaining work. Results are handed back in *completion* order, not input order, since no stage
/// cares which target resolved first, only that all of them did.
///
/// On the first job whose `on_output` callback returns `Err`, no further jobs are launched, but
/// every job already in flight is allowed to run to completion before [`JobRunner::execute_parallel`]
/// returns the error: subprocesses are never killed mid-flight, only un-started ones are skipped.
pub struct JobRunner {
    max_jobs: usize,
}

impl JobRunner {
    pub fn new(max_jobs: usize) -> Self {
        Self {
            max_jobs: max_jobs.max(1),
        }
    }

    /// Run `items` through `spawn` (building a [`Command`] per item) and `on_output` (turning a
    /// completed child process's output into either a stage result or a stage error).
    pub async fn execute_parallel<I: 'static, T, E, S, O>(&self, items: Vec<I>, spawn: S, on_output: O) -> Result<Vec<T>, E>
    where
        S: Fn(&I) -> Command,
        O: Fn(I, std::process::Output) -> Result<T, E>,
    {
        let mut pending = items.into_iter();
        let mut in_flight: FuturesUnordered<Pin<Box<dyn Future<Output = (I, std::io::Result<std::process::Output>)>>>> =
            FuturesUnordered::new();

        let mut results = Vec::new();
        let mut first_error: Option<E> = None;

        for _ in 0..self.max_jobs {
            let Some(item) = pending.next() else { break };
            in_flight.push(launch(spawn(&item), item));
        }

        while let Some((item, output)) = in_flight.next().await {
            if first_error.is_some() {
                // Draining: a prior job already failed. Let this one finish (it already did),
                // but don't start replacement work and don't bother inspecting its result.
                continue;
            }

            let stage_result = match output {
                Ok(output) => on_output(item, output),
                Err(err) => spawn_failure_into_error(err),
            };

            match stage_result {
                Ok(value) => {
                    results.push(value);
                    if let Some(item) = pending.next() {
                        in_flight.push(launch(spawn(&item), item));
                    }
                }
                Err(err) => {
                    debug!("a job failed; draining remaining in-flight jobs without starting new ones");
                    first_error = Some(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(results),
        }
    }
}

fn launch<I: 'static>(mut command: Command, item: I) -> Pin<Box<dyn Future<Output = (I, std::io::Result<std::process::Output>)>>> {
    Box::pin(async move {
        let output = command.output().await;
        (item, output)
    })
}

/// A failure to even spawn the child process (missing binary, permissions) indicates a broken
/// invocation rather than a stage-level failure like a nonzero exit; there's no requirement
/// string or target to attach to a stage error here, so this is a bug in the caller's `spawn`
/// closure, not a condition stages are expected to recover from.
fn spawn_failure_into_error<T>(err: std::io::Error) -> T {
    panic!("failed to spawn subprocess: {err}")
}
