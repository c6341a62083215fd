mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use shutterlink_api::ZmqTransport;
use shutterlink_core::Session;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Log to stderr. `-v` raises our own crates first; socket internals stay
/// at `warn` until `-vvv`. `RUST_LOG` overrides both.
fn init_tracing(verbosity: u8) {
    let directives = match verbosity {
        0 => "warn".to_owned(),
        1 => own_crates("info"),
        2 => own_crates("debug"),
        _ => "trace".to_owned(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}

fn own_crates(level: &str) -> String {
    format!("warn,shutterlink={level},shutterlink_core={level},shutterlink_api={level}")
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // No controller needed
        Command::Config(args) => commands::config_cmd::handle(&args, &cli.global),

        Command::Completions(args) => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(args.shell, &mut cmd, "shutterlink", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            commands::preflight(&cmd, &cli.global)?;

            let cfg = config::load_config_or_default();
            let (endpoints, session_config) = config::resolve_connection(&cli.global, &cfg)?;

            let cancel = CancellationToken::new();
            spawn_interrupt_handler(cancel.clone());

            let transport = ZmqTransport::connect(&endpoints, &cancel)
                .await
                .map_err(|e| CliError::ConnectionFailed {
                    endpoint: endpoints.reqrep.to_string(),
                    source: Box::new(e),
                })?;
            tracing::info!(reqrep = %endpoints.reqrep, publisher = %endpoints.publisher, "connected");

            let mut session = Session::with_config(transport, session_config);
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &mut session, &cli.global, &cancel).await
        }
    }
}

/// Cancel the session on Ctrl-C.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received");
            cancel.cancel();
        }
    });
}
