//! Bounded-parallel dispatch and result aggregation.
//!
//! All jobs are submitted up front; a semaphore caps how many run at once;
//! results are collected in completion order. A failing job never cancels
//! its siblings — the pool always drains, and the overall outcome is
//! computed only after every job has finished.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::executor::{JobRunner, EXIT_SPAWN_FAILED};
use crate::report::Reporter;
use crate::resolve::ResolvedJob;
use crate::scope::RunScope;

/// Outcome of one job: its index and the subprocess exit code.
#[derive(Debug, Clone, Copy)]
pub struct JobResult {
    pub index: usize,
    pub code: i32,
}

impl JobResult {
    pub fn ok(&self) -> bool {
        self.code == 0
    }
}

/// Run every job through the pool and aggregate the outcome.
///
/// Returns the process exit status: 0 when every job exited 0, 1 otherwise.
/// When a run scope was created, it is torn down (best-effort) after the
/// last result is in, whether or not all jobs succeeded, and a confirmation
/// line is reported.
pub async fn run_batch(
    jobs: Vec<ResolvedJob>,
    max_parallel: usize,
    runner: Arc<dyn JobRunner>,
    scope: Option<Arc<RunScope>>,
    reporter: &Reporter,
) -> u8 {
    let total = jobs.len();
    let semaphore = Arc::new(Semaphore::new(max_parallel));
    let mut set = JoinSet::new();

    for job in jobs {
        let semaphore = semaphore.clone();
        let runner = runner.clone();
        let scope = scope.clone();
        let reporter = reporter.clone();

        set.spawn(async move {
            let _permit = semaphore.acquire_owned().await;

            // The job's private home is created only once a slot is held,
            // just before launch.
            let home = match &scope {
                Some(scope) => match scope.create_job_home(job.index) {
                    Ok(home) => Some(home),
                    Err(e) => {
                        reporter.job_failed(
                            job.index,
                            total,
                            &format!("cannot create codex home: {e}"),
                        );
                        return JobResult {
                            index: job.index,
                            code: EXIT_SPAWN_FAILED,
                        };
                    }
                },
                None => None,
            };

            let code = runner.run(&job, total, home.as_deref()).await;
            JobResult {
                index: job.index,
                code,
            }
        });
    }

    let mut overall = 0u8;
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(result) => {
                debug!(index = result.index, code = result.code, "job finished");
                if !result.ok() {
                    overall = 1;
                }
            }
            Err(e) => {
                // A panicked worker counts as a failed job; siblings keep going.
                reporter.error(&format!("worker panicked: {e}"));
                overall = 1;
            }
        }
    }

    if let Some(scope) = &scope {
        scope.teardown();
        reporter.cleaned_up(scope.root());
    }

    overall
}
