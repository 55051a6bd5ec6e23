//! swarm-kernel: the orchestration engine behind codex-swarm.
//!
//! This crate provides:
//!
//! - **Batch**: stdin payload parsing and validation
//! - **Resolve**: path-safety checks confining jobs to the invocation cwd
//! - **Scope**: per-run scratch roots isolating codex session homes
//! - **Executor**: the codex subprocess invocation for one job
//! - **Scheduler**: bounded-parallel dispatch and result aggregation
//! - **Report**: lock-guarded, line-atomic lifecycle diagnostics

pub mod batch;
pub mod config;
pub mod error;
pub mod executor;
pub mod report;
pub mod resolve;
pub mod scheduler;
pub mod scope;

pub use batch::{Batch, JobSpec};
pub use config::SwarmConfig;
pub use error::SwarmError;
pub use executor::{CodexExecutor, JobRunner};
pub use report::Reporter;
pub use resolve::{canonical_cwd, resolve_all, ResolvedJob};
pub use scheduler::{run_batch, JobResult};
pub use scope::RunScope;
