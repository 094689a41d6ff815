mod cli;
mod error;
mod logging;
mod orchestrator;
mod presenter;
mod prompt;
mod settings;
mod supervisor;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use plnexus_core::{ProviderConfigResolver, SpanTracer, TraceSwitch, TracerConfig};

use crate::cli::Cli;
use crate::error::CliError;
use crate::orchestrator::{Orchestrator, RunRequest};
use crate::presenter::TerminalPresenter;
use crate::settings::Settings;

fn main() -> ExitCode {
    logging::load_dotenv();
    logging::init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            // --help and --version print to stdout and are not failures.
            let code = u8::from(error.use_stderr());
            if let Err(print_error) = error.print() {
                eprintln!("error: {print_error}");
            }
            return ExitCode::from(code);
        }
    };

    let settings = Settings::from_env(cli.root.clone());
    // The local offset can only be read while the process is single-threaded.
    let tracer_config = TracerConfig::local(settings.log_level);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("error: {}", CliError::Io(error));
            return ExitCode::FAILURE;
        }
    };

    let code = supervisor::run_to_exit(
        runtime,
        run(cli, settings, tracer_config),
        supervisor::ctrl_c(),
    );
    ExitCode::from(code)
}

async fn run(cli: Cli, settings: Settings, tracer_config: TracerConfig) -> Result<(), CliError> {
    let tracer = SpanTracer::new(TraceSwitch::new(settings.tracing_enabled), tracer_config);
    let orchestrator = Orchestrator::new(
        tracer,
        settings.root,
        settings.namespace,
        Arc::new(ProviderConfigResolver::from_env()),
        Arc::new(TerminalPresenter),
    );

    let request = RunRequest {
        mode: cli.mode(),
        symbol: cli.symbol().map(str::to_owned),
    };
    let mut prompt = prompt::stdio();

    orchestrator.run(request, &mut prompt).await.map(|_| ())
}
