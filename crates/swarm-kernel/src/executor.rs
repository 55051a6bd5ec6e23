//! Job execution: one codex subprocess per job.
//!
//! The command template is fixed — `codex exec --model <model> --full-auto
//! --skip-git-repo-check <task>` — and runs with the job's resolved
//! directory as its cwd, stdio inherited so the agent's interactive output
//! stays visible live. Only the exit code comes back.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::SwarmConfig;
use crate::report::Reporter;
use crate::resolve::ResolvedJob;

/// Exit code recorded when the agent cannot be launched at all.
pub const EXIT_SPAWN_FAILED: i32 = 127;

/// Runs one job to completion and yields its exit code.
///
/// The scheduler depends on this seam rather than on a concrete command so
/// its pooling behavior is testable without spawning processes.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Run the job in its resolved directory, optionally pointing the
    /// session-home variable at `home`. A nonzero return is a job outcome,
    /// never an engine error.
    async fn run(&self, job: &ResolvedJob, total: usize, home: Option<&Path>) -> i32;
}

/// Invokes the codex CLI with the fixed non-interactive argument template.
pub struct CodexExecutor {
    config: SwarmConfig,
    reporter: Reporter,
}

impl CodexExecutor {
    pub fn new(config: SwarmConfig, reporter: Reporter) -> Self {
        Self { config, reporter }
    }

    /// The full argv for one task.
    fn command_line(&self, task: &str) -> Vec<String> {
        vec![
            self.config.program.clone(),
            "exec".to_string(),
            "--model".to_string(),
            self.config.model.clone(),
            "--full-auto".to_string(),
            "--skip-git-repo-check".to_string(),
            task.to_string(),
        ]
    }
}

#[async_trait]
impl JobRunner for CodexExecutor {
    async fn run(&self, job: &ResolvedJob, total: usize, home: Option<&Path>) -> i32 {
        let argv = self.command_line(&job.task);
        let quoted = shell_words::join(argv.iter().map(String::as_str));
        self.reporter.job_started(
            job.index,
            total,
            &job.dir,
            &quoted,
            &self.config.home_var,
            home,
        );

        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..])
            .current_dir(&job.dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(home) = home {
            cmd.env(&self.config.home_var, home);
        }

        let code = match cmd.status().await {
            Ok(status) => status.code().unwrap_or(-1),
            Err(e) => {
                self.reporter.job_failed(
                    job.index,
                    total,
                    &format!("failed to spawn {}: {}", self.config.program, e),
                );
                EXIT_SPAWN_FAILED
            }
        };

        self.reporter.job_exited(job.index, total, code);
        code
    }
}
