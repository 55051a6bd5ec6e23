//! Path safety for job directories.
//!
//! Job directories arrive as untrusted strings. A job may only target a
//! strict subdirectory of the invocation's working directory, so the
//! resolver rejects absolute paths, `~` shorthands, and `..` segments
//! textually, then canonicalizes and re-checks containment to catch what
//! text alone cannot — a symlink inside the tree pointing outside it.
//!
//! Resolution is eager: every job in the batch is vetted before any
//! subprocess launches, and the first bad directory fails the whole batch.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::batch::JobSpec;
use crate::error::SwarmError;

/// A job whose directory has passed every safety check.
#[derive(Debug, Clone)]
pub struct ResolvedJob {
    /// 1-based position in the input.
    pub index: usize,
    /// Canonical absolute directory, a strict descendant of the cwd.
    pub dir: PathBuf,
    /// Opaque instruction forwarded to the agent.
    pub task: String,
}

/// Capture the invocation's working directory as a canonical absolute path.
///
/// Done once at startup; all containment checks compare against this.
pub fn canonical_cwd() -> Result<PathBuf, SwarmError> {
    let cwd = std::env::current_dir().map_err(SwarmError::Cwd)?;
    cwd.canonicalize().map_err(SwarmError::Cwd)
}

/// Resolve every job eagerly, in input order.
pub fn resolve_all(jobs: &[JobSpec], cwd: &Path) -> Result<Vec<ResolvedJob>, SwarmError> {
    jobs.iter().map(|job| resolve_job(job, cwd)).collect()
}

/// Validate and canonicalize one job's directory.
pub fn resolve_job(job: &JobSpec, cwd: &Path) -> Result<ResolvedJob, SwarmError> {
    let dir = resolve_dir(&job.dir, cwd)?;
    debug!(index = job.index, dir = %dir.display(), "resolved job directory");
    Ok(ResolvedJob {
        index: job.index,
        dir,
        task: job.task.clone(),
    })
}

fn resolve_dir(raw: &str, cwd: &Path) -> Result<PathBuf, SwarmError> {
    if raw.starts_with('~') || Path::new(raw).is_absolute() {
        return Err(SwarmError::DirNotRelative(raw.to_string()));
    }
    if raw == "." || raw == "./" {
        return Err(SwarmError::DirIsCwdLiteral);
    }
    // Textual traversal check first; canonicalization below catches the
    // symlink escapes this cannot.
    if Path::new(raw)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(SwarmError::DirTraversal(raw.to_string()));
    }

    let target = cwd
        .join(raw)
        .canonicalize()
        .map_err(|_| SwarmError::DirNotFound(raw.to_string()))?;

    if !target.starts_with(cwd) {
        return Err(SwarmError::DirEscapes(raw.to_string()));
    }
    if target == cwd {
        return Err(SwarmError::DirResolvesToCwd);
    }
    if !target.is_dir() {
        return Err(SwarmError::DirNotFound(raw.to_string()));
    }
    Ok(target)
}
