//! memsession binary entry point.

use std::io;
use std::process::ExitCode;

use memsession::cli::{self, Args};
use memsession::config::Config;
use memsession::console::Console;
use memsession::{logging, SessionManager};
use tracing::info;

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("run with --help for usage");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(args)?;
    logging::init_with_filter(config.log_filter()).ok();

    info!("memsession v{}", env!("CARGO_PKG_VERSION"));

    let manager = SessionManager::with_config(config.to_manager_config()?)?;
    info!(id_bytes = manager.id_bytes(), "session manager initialized");

    let console = Console::new(manager);
    console.run(io::stdin().lock(), io::stdout().lock())?;

    info!(sessions = console.manager().count(), "console closed");
    Ok(())
}
