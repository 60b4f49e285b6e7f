//! CLI entry point - the composition root.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use geohub_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<CliError>()
                .map_or(1, CliError::exit_code);
            eprintln!("Error: {err:#}");
            ExitCode::from(code)
        }
    }
}

/// `RUST_LOG` wins; otherwise `warn`, or `debug` with `-v`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = CliConfig {
        data_dir: cli.data_dir,
        base_url: cli.base_url,
        retries: cli.retries,
    };

    let ctx = match command {
        Commands::Paths => return handlers::paths::execute(&config),
        _ => bootstrap(config)?,
    };
    let cancel = ctx.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling");
            cancel.cancel();
        }
    });

    match command {
        Commands::Sync { force } => handlers::sync::execute(&ctx, force).await,
        Commands::List(args) => handlers::list::execute(&ctx, &args).await,
        Commands::Show { id, json } => handlers::show::execute(&ctx, &id, json).await,
        Commands::Download { id, dest } => {
            handlers::download::execute(&ctx, &id, dest.as_deref()).await
        }
        Commands::Thumbnail { id } => handlers::thumbnail::execute(&ctx, &id).await,
        // Handled before bootstrap
        Commands::Paths => Ok(()),
    }
}
