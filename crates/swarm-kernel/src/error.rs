//! Error types for the swarm engine.
//!
//! Everything that can go wrong before the first subprocess launches is a
//! `SwarmError`: it aborts the whole batch with exit status 2. Job outcomes
//! (nonzero exit codes, spawn failures) are not errors — they are data the
//! scheduler aggregates into the overall exit status.
//!
//! Every variant renders as a single human-readable line; causes are folded
//! into the message rather than chained.

use thiserror::Error;

/// Validation and setup failures. All map to exit status 2.
#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("no JSON provided on stdin")]
    EmptyInput,
    #[error("invalid JSON on stdin ({0})")]
    InvalidJson(serde_json::Error),
    #[error("top-level JSON must be an object")]
    TopLevelNotObject,
    #[error("'jobs' must be a non-empty array")]
    JobsInvalid,
    #[error("each job must be an object with 'dir' and 'task'")]
    JobNotObject,
    #[error("job.dir must be a non-empty string")]
    DirFieldInvalid,
    #[error("job.task must be a non-empty string")]
    TaskFieldInvalid,
    #[error("'max_parallel' must be a positive integer")]
    MaxParallelInvalid,
    #[error("dir '{0}' must be a relative subdirectory of cwd")]
    DirNotRelative(String),
    #[error("dir cannot be current directory")]
    DirIsCwdLiteral,
    #[error("dir '{0}' must not contain '..'")]
    DirTraversal(String),
    #[error("dir '{0}' resolves outside cwd")]
    DirEscapes(String),
    #[error("dir cannot resolve to cwd")]
    DirResolvesToCwd,
    #[error("dir '{0}' does not exist or is not a directory")]
    DirNotFound(String),
    #[error("cannot determine current directory: {0}")]
    Cwd(std::io::Error),
    #[error("cannot read stdin: {0}")]
    Stdin(std::io::Error),
    #[error("cannot create codex home at {path}: {cause}")]
    Scope {
        path: String,
        cause: std::io::Error,
    },
    #[error("run scope {0} already exists")]
    ScopeCollision(String),
}

impl From<serde_json::Error> for SwarmError {
    fn from(err: serde_json::Error) -> Self {
        SwarmError::InvalidJson(err)
    }
}

impl SwarmError {
    /// Process exit status for setup failures, distinct from the status 1
    /// used when one or more jobs fail.
    pub fn exit_code(&self) -> u8 {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_dir() {
        let err = SwarmError::DirTraversal("../escape".to_string());
        assert_eq!(err.to_string(), "dir '../escape' must not contain '..'");

        let err = SwarmError::DirEscapes("link".to_string());
        assert_eq!(err.to_string(), "dir 'link' resolves outside cwd");
    }

    #[test]
    fn json_errors_convert() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = SwarmError::from(parse_err);
        assert!(err.to_string().starts_with("invalid JSON on stdin ("));
    }

    #[test]
    fn all_setup_errors_exit_two() {
        assert_eq!(SwarmError::EmptyInput.exit_code(), 2);
        assert_eq!(SwarmError::JobsInvalid.exit_code(), 2);
        assert_eq!(SwarmError::DirIsCwdLiteral.exit_code(), 2);
    }
}
