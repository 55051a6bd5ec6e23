//! Run diagnostics.
//!
//! Workers run concurrently but their lifecycle output must stay
//! line-coherent, so every grouped emission happens under one lock
//! acquisition. All diagnostics go to stderr; the agent's own stdio is
//! inherited by the job processes and never passes through here.
//!
//! Line shapes:
//!
//! ```text
//! [codex-swarm] cwd=/work
//! [codex-swarm] jobs=2 max_parallel=2
//! [job 1/2] dir=/work/a
//! [job 1/2] cmd=codex exec --model gpt-5.2-codex --full-auto --skip-git-repo-check 'fix tests'
//! [job 1/2] CODEX_HOME=/home/amy/.codex-swarm/run-1234/job-1-abcd1234
//! [job 1/2] exit=0
//! [codex-swarm] cleaned up /home/amy/.codex-swarm/run-1234
//! ```

use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Program-level tag on run lifecycle lines.
const TAG: &str = "[codex-swarm]";

/// Lock-guarded sink for lifecycle diagnostics, shared by all workers.
///
/// Cloning is cheap and shares the underlying sink and lock.
#[derive(Clone)]
pub struct Reporter {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Reporter {
    /// Reporter writing to stderr (the normal case).
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Reporter writing to an arbitrary sink. Tests inject a buffer here.
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    /// Run-level startup summary.
    pub fn run_started(
        &self,
        cwd: &Path,
        jobs: usize,
        max_parallel: usize,
        scope_root: Option<&Path>,
        home_var: &str,
    ) {
        let mut sink = self.lock();
        let _ = writeln!(sink, "{TAG} cwd={}", cwd.display());
        let _ = writeln!(sink, "{TAG} jobs={jobs} max_parallel={max_parallel}");
        match scope_root {
            Some(root) => {
                let _ = writeln!(sink, "{TAG} base_codex_home={}", root.display());
            }
            None => {
                let _ = writeln!(sink, "{TAG} base_codex_home=<passthrough>");
            }
        }
        let _ = writeln!(sink, "{TAG} codex_home_env={home_var}");
    }

    /// Per-job start group: directory, quoted command, session home.
    pub fn job_started(
        &self,
        index: usize,
        total: usize,
        dir: &Path,
        cmd: &str,
        home_var: &str,
        home: Option<&Path>,
    ) {
        let mut sink = self.lock();
        let _ = writeln!(sink, "[job {index}/{total}] dir={}", dir.display());
        let _ = writeln!(sink, "[job {index}/{total}] cmd={cmd}");
        match home {
            Some(home) => {
                let _ = writeln!(sink, "[job {index}/{total}] {home_var}={}", home.display());
            }
            None => {
                let _ = writeln!(sink, "[job {index}/{total}] {home_var}=<passthrough>");
            }
        }
    }

    /// Per-job completion.
    pub fn job_exited(&self, index: usize, total: usize, code: i32) {
        let mut sink = self.lock();
        let _ = writeln!(sink, "[job {index}/{total}] exit={code}");
    }

    /// A job that could not be set up or launched at all.
    pub fn job_failed(&self, index: usize, total: usize, message: &str) {
        let mut sink = self.lock();
        let _ = writeln!(sink, "[job {index}/{total}] error: {message}");
    }

    /// Cleanup confirmation after scope teardown.
    pub fn cleaned_up(&self, root: &Path) {
        let mut sink = self.lock();
        let _ = writeln!(sink, "{TAG} cleaned up {}", root.display());
    }

    /// Fatal setup diagnostic.
    pub fn error(&self, message: &str) {
        let mut sink = self.lock();
        let _ = writeln!(sink, "error: {message}");
    }

    // A worker that panicked while holding the lock must not silence every
    // later report.
    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
