//! codex-swarm CLI entry point.
//!
//! Usage:
//!   echo '{"jobs":[{"dir":"a","task":"fix tests"}]}' | codex-swarm
//!
//! The batch is a single JSON document on stdin; all diagnostics go to
//! stderr; the codex processes inherit stdio. Exit status: 0 when every job
//! passed, 1 when at least one failed, 2 for invalid input or setup errors.

use std::io::{IsTerminal, Read};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use swarm_kernel::{
    canonical_cwd, resolve_all, run_batch, Batch, CodexExecutor, Reporter, RunScope, SwarmConfig,
    SwarmError,
};

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        None => {}

        Some("--help" | "-h") => {
            print_help();
            return ExitCode::SUCCESS;
        }

        Some("--version" | "-V") => {
            println!("codex-swarm {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }

        Some(unknown) => {
            eprintln!("Unknown option: {unknown}");
            eprintln!("Run 'codex-swarm --help' for usage.");
            return ExitCode::from(2);
        }
    }

    let reporter = Reporter::stderr();
    match run(&reporter) {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            reporter.error(&format!("{e:#}"));
            ExitCode::from(2)
        }
    }
}

fn print_help() {
    println!(
        r#"codex-swarm v{}

Run a batch of codex jobs in parallel, one working directory each.

Usage:
  codex-swarm < batch.json

Input (stdin):
  {{ "jobs": [ {{ "dir": "<relative subdir>", "task": "<instruction>" }}, ... ],
    "max_parallel": <positive integer, optional> }}

Environment:
  CODEX_HOME_ENV           Name of the session-home variable (default CODEX_HOME)
  CODEX_HOME_PASSTHROUGH   Set to 1/true/yes to disable per-job home isolation
  RUST_LOG                 Tracing filter for engine debug output

Exit status:
  0  every job exited 0
  1  at least one job exited nonzero
  2  invalid input or setup failure (no job was run)
"#,
        env!("CARGO_PKG_VERSION")
    );
}

fn run(reporter: &Reporter) -> Result<u8> {
    // Fail fast when nothing is piped in.
    if std::io::stdin().is_terminal() {
        return Err(SwarmError::EmptyInput.into());
    }
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .map_err(SwarmError::Stdin)?;

    let batch = Batch::parse(&input)?;
    let cwd = canonical_cwd()?;

    // Every directory is vetted before the first subprocess launches.
    let jobs = resolve_all(&batch.jobs, &cwd)?;

    let config = SwarmConfig::from_env();
    let scope = if config.passthrough {
        None
    } else {
        Some(Arc::new(RunScope::create(&config.scope_base)?))
    };

    reporter.run_started(
        &cwd,
        jobs.len(),
        batch.max_parallel,
        scope.as_deref().map(RunScope::root),
        &config.home_var,
    );

    let runner = Arc::new(CodexExecutor::new(config, reporter.clone()));
    let rt = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    Ok(rt.block_on(run_batch(
        jobs,
        batch.max_parallel,
        runner,
        scope,
        reporter,
    )))
}
