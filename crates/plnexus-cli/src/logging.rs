//! Diagnostic logging and `.env` loading.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset; keeps the terminal output clean.
const DEFAULT_FILTER: &str = "warn";

/// Load .env file from the current directory or any ancestor directory.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                if let Err(error) = dotenvy::from_path(&env_path) {
                    eprintln!("warning: ignoring {}: {error}", env_path.display());
                }
                return;
            }
            dir = parent;
        }
    }
}

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // Already installed (tests, embedding) is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
