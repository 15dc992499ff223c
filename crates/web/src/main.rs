use std::process::ExitCode;

use clap::Parser;
use searchd::{CliArgs, Server};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
    }

    let args = CliArgs::parse();
    info!(port = args.port, static_root = %args.static_root.display(), indices = args.indices.len(), "starting searchd");

    let server = match Server::with_config(args.into()) {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = server.shutdown_token();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested");
                shutdown.cancel();
            }
            Err(e) => warn!(cause = %e, "can't listen for ctrl-c, shut down by killing the process"),
        }
    });

    match server.run().await {
        Ok(()) => {
            info!("server shut down cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(cause = %e, "server failed");
            ExitCode::FAILURE
        }
    }
}
