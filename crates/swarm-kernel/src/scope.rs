//! Per-run isolation scopes for codex session homes.
//!
//! Concurrent codex processes sharing one session home contend on its
//! session lock. When isolation is enabled, each run gets a scratch root
//! under the well-known base and each job gets a private sub-directory:
//!
//! ```text
//! ~/.codex-swarm/
//! └── run-<uuid>/
//!     ├── job-1-<uuid8>/
//!     ├── job-2-<uuid8>/
//!     └── ...
//! ```
//!
//! The base directory may be shared by unrelated concurrent invocations, so
//! run roots carry uuid names. The whole root is removed best-effort once
//! the run finishes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::error::SwarmError;

/// A run-wide scratch root holding one private home per job.
#[derive(Debug)]
pub struct RunScope {
    root: PathBuf,
}

impl RunScope {
    /// Create the scratch root for this run under `base`.
    ///
    /// `base` is created if absent. The root itself must not already exist:
    /// names are uuid-unique, so a collision indicates a deeper problem and
    /// is fatal rather than retried.
    pub fn create(base: &Path) -> Result<Self, SwarmError> {
        fs::create_dir_all(base).map_err(|e| SwarmError::Scope {
            path: base.display().to_string(),
            cause: e,
        })?;

        let root = base.join(format!("run-{}", Uuid::new_v4().simple()));
        match fs::create_dir(&root) {
            Ok(()) => {
                debug!(root = %root.display(), "created run scope");
                Ok(Self { root })
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(SwarmError::ScopeCollision(root.display().to_string()))
            }
            Err(e) => Err(SwarmError::Scope {
                path: root.display().to_string(),
                cause: e,
            }),
        }
    }

    /// The scratch root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a private session home for one job.
    ///
    /// Each call mints a fresh suffix, so a slot is never reused.
    pub fn create_job_home(&self, index: usize) -> io::Result<PathBuf> {
        let mut suffix = Uuid::new_v4().simple().to_string();
        suffix.truncate(8);
        let home = self.root.join(format!("job-{}-{}", index, suffix));
        fs::create_dir_all(&home)?;
        Ok(home)
    }

    /// Remove the scratch root and everything under it.
    ///
    /// Best-effort: deletion errors are ignored. Cleanup never fails the run.
    pub fn teardown(&self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_base() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        env::temp_dir().join(format!("swarm-scope-test-{}-{}", std::process::id(), id))
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn create_makes_base_and_unique_root() {
        let base = temp_base();
        let scope = RunScope::create(&base).unwrap();

        assert!(scope.root().is_dir());
        assert!(scope.root().starts_with(&base));
        let name = scope.root().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("run-"));

        cleanup(&base);
    }

    #[test]
    fn roots_are_unique_within_one_base() {
        let base = temp_base();
        let a = RunScope::create(&base).unwrap();
        let b = RunScope::create(&base).unwrap();
        assert_ne!(a.root(), b.root());
        cleanup(&base);
    }

    #[test]
    fn job_homes_live_under_the_root() {
        let base = temp_base();
        let scope = RunScope::create(&base).unwrap();

        let home = scope.create_job_home(3).unwrap();
        assert!(home.is_dir());
        assert!(home.starts_with(scope.root()));

        let name = home.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("job-3-"));
        // prefix + 8 hex chars of suffix
        assert_eq!(name.len(), "job-3-".len() + 8);

        cleanup(&base);
    }

    #[test]
    fn repeated_job_homes_get_fresh_suffixes() {
        let base = temp_base();
        let scope = RunScope::create(&base).unwrap();
        let a = scope.create_job_home(1).unwrap();
        let b = scope.create_job_home(1).unwrap();
        assert_ne!(a, b);
        cleanup(&base);
    }

    #[test]
    fn teardown_removes_everything() {
        let base = temp_base();
        let scope = RunScope::create(&base).unwrap();
        scope.create_job_home(1).unwrap();
        scope.create_job_home(2).unwrap();

        scope.teardown();
        assert!(!scope.root().exists());

        cleanup(&base);
    }

    #[test]
    fn teardown_is_silent_when_already_gone() {
        let base = temp_base();
        let scope = RunScope::create(&base).unwrap();
        scope.teardown();
        // Second teardown must not panic or error.
        scope.teardown();
        cleanup(&base);
    }
}
