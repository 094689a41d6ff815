//! Process boundary: exit codes, interrupts, and runtime teardown.

use std::future::Future;

use tokio::runtime::Runtime;

use crate::error::CliError;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Drives `run` to an exit code, then tears the runtime down without
/// waiting on blocking threads (a pending stdin read would hold it open).
pub fn run_to_exit<F, S>(runtime: Runtime, run: F, interrupt: S) -> u8
where
    F: Future<Output = Result<(), CliError>> + Send + 'static,
    S: Future<Output = ()>,
{
    let code = runtime.block_on(supervise(run, interrupt));
    runtime.shutdown_background();
    code
}

/// Runs `run` as a task until it finishes or `interrupt` resolves.
///
/// | Outcome | Code |
/// |---------|------|
/// | `Ok(())` | 0 |
/// | `Err(CliError)` | `CliError::exit_code()` |
/// | task panicked or was cancelled | 1 |
/// | interrupt | 0 |
pub async fn supervise<F, S>(run: F, interrupt: S) -> u8
where
    F: Future<Output = Result<(), CliError>> + Send + 'static,
    S: Future<Output = ()>,
{
    let task = tokio::spawn(run);

    tokio::select! {
        joined = task => match joined {
            Ok(Ok(())) => EXIT_SUCCESS,
            Ok(Err(error)) => error.exit_code(),
            Err(join_error) => {
                tracing::error!(error = %join_error, "quote task aborted");
                eprintln!("error: unexpected failure, see logs for details");
                EXIT_FAILURE
            }
        },
        () = interrupt => {
            eprintln!("\ninterrupted, exiting");
            EXIT_SUCCESS
        }
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
pub async fn ctrl_c() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "cannot listen for interrupts");
        std::future::pending::<()>().await;
    }
}
