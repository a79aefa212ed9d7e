use clap::Parser;
use serde_json::Value;
use std::process::ExitCode;
use tracing::{error, warn};

use dietlog_infrastructure::config::log_dir_from_env;
use dietlog_infrastructure::logging;
use dietlog_lib::presentation::bootstrap::{build_app_state, resolve_config};
use dietlog_lib::presentation::cli::Cli;
use dietlog_lib::presentation::commands::execute;
use dietlog_lib::presentation::error::CommandError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logger(log_dir_from_env()) {
        logging::init_console_logger();
        warn!("File logging unavailable, using console: {}", e);
    }

    let pretty = cli.pretty;
    let outcome = run(cli)
        .await
        .and_then(|value| render(&value, pretty));

    let code = match outcome {
        Ok(rendered) => {
            println!("{}", rendered);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(code = err.code, recoverable = err.recoverable, "Command failed");
            eprintln!("Error: {}", err.message);
            ExitCode::FAILURE
        }
    };

    logging::shutdown_logger();
    code
}

async fn run(cli: Cli) -> Result<Value, CommandError> {
    let config = resolve_config(cli.db, |key| std::env::var(key).ok())?;
    let state = build_app_state(&config).await?;
    execute(cli.command, &cli.user, &state).await
}

fn render(value: &Value, pretty: bool) -> Result<String, CommandError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|e| CommandError::infrastructure(format!("Failed to render output: {}", e)))
}
