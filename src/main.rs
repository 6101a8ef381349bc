use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use observatory::api::ObservatoryClient;
use observatory::args::Args;
use observatory::commands::{Command, CommandError, Registry};
use observatory::config::Config;
use observatory::error::ObservatoryError;
use observatory::poller::{Poller, ScanRequest};
use observatory::{help, output};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        // Usage help has already been printed.
        Err(ObservatoryError::Command(CommandError::UnknownCommand)) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ObservatoryError> {
    let args = Args::parse();
    init_logging(args.verbose);

    let registry = Registry::new();
    let Some(command) = registry.find(&args.tokens) else {
        eprintln!("{}", help::render(&registry));
        return Err(CommandError::UnknownCommand.into());
    };

    if command == Command::Help {
        println!("{}", help::render(&registry));
        return Ok(());
    }

    let config = Config::resolve(
        &args.api_url,
        args.proxy_file.as_deref(),
        Duration::from_secs(args.timeout),
    )?;
    let client = ObservatoryClient::new(&config)?;

    let payload = if command == Command::InvokeAssessment && !args.no_poll {
        let scan_args = command.validate(&args.tokens)?;
        let host = scan_args
            .value_of("host")
            .ok_or(CommandError::MissingArgument { key: "host" })?;
        let request = ScanRequest {
            host,
            rescan: scan_args.has("rescan"),
            hidden: scan_args.has("hidden"),
        };
        let poller = Poller::new(&client)
            .with_interval(Duration::from_secs(args.poll_interval))
            .with_deadline(args.poll_deadline.map(Duration::from_secs));
        poller.run(&request)?.payload
    } else {
        registry.dispatch(&client, &args.tokens)?.payload
    };

    println!("{}", command.header());
    println!();
    println!("{}", output::render(&payload));

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "observatory=debug"
    } else {
        "observatory=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
