//! Runtime configuration for a swarm run.
//!
//! The engine is steered by two environment variables:
//!
//! - `CODEX_HOME_ENV` renames the variable the codex CLI consults for its
//!   session home (default `CODEX_HOME`). Some environments wrap codex and
//!   expect a different name.
//! - `CODEX_HOME_PASSTHROUGH` disables per-job home isolation when set to
//!   `1`, `true`, or `yes` (case-insensitive). Isolation is on by default.
//!
//! Everything here is a plain value so callers and tests can inject their
//! own program name, model, or scratch base instead of the ambient ones.

use std::env;
use std::path::PathBuf;

use directories::BaseDirs;

/// Default name of the env var the codex CLI consults for its session home.
pub const DEFAULT_HOME_VAR: &str = "CODEX_HOME";
/// Env var that renames the session-home variable.
pub const HOME_VAR_OVERRIDE: &str = "CODEX_HOME_ENV";
/// Env var that disables per-job home isolation.
pub const PASSTHROUGH_VAR: &str = "CODEX_HOME_PASSTHROUGH";

/// Directory under the user's home that holds per-run scratch roots.
const SCOPE_BASE_NAME: &str = ".codex-swarm";

/// Configuration for one swarm run.
#[derive(Debug, Clone)]
pub struct SwarmConfig {
    /// Agent executable to invoke.
    pub program: String,
    /// Model selector passed to the agent.
    pub model: String,
    /// Name of the env var overridden to point at a job's private home.
    pub home_var: String,
    /// When true, no scratch homes are created and the session-home variable
    /// passes through from the parent environment untouched.
    pub passthrough: bool,
    /// Base directory that holds per-run scratch roots.
    pub scope_base: PathBuf,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            program: "codex".to_string(),
            model: "gpt-5.2-codex".to_string(),
            home_var: DEFAULT_HOME_VAR.to_string(),
            passthrough: false,
            scope_base: default_scope_base(),
        }
    }
}

impl SwarmConfig {
    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        Self {
            home_var: home_var_name(env::var(HOME_VAR_OVERRIDE).ok().as_deref()),
            passthrough: parse_passthrough(env::var(PASSTHROUGH_VAR).ok().as_deref()),
            ..Self::default()
        }
    }
}

/// Resolve the session-home variable name; blank overrides fall back to the
/// default.
fn home_var_name(override_val: Option<&str>) -> String {
    match override_val.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_HOME_VAR.to_string(),
    }
}

/// Isolation stays on unless explicitly disabled with a recognized truthy
/// value. Unset, empty, and unrecognized values all keep isolation enabled.
fn parse_passthrough(val: Option<&str>) -> bool {
    match val {
        Some(v) => matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        ),
        None => false,
    }
}

/// `~/.codex-swarm`, with a /tmp fallback when no home can be found.
fn default_scope_base() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(SCOPE_BASE_NAME)
}
