mod cli;
mod client;
mod commands;
mod config;
mod error;
mod operations;
mod output;
mod pagination;
mod session;
mod store;
#[cfg(test)]
mod test_support;
mod types;
mod validation;

use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, UserCommands};
use client::UserClient;
use commands::prompt::Prompter;
use config::Config;
use error::Result;
use operations::UserOperations;
use session::FileStore;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let verbose = cli.verbose > 0;

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");

        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    output::set_format(cli.output_format());
    output::set_quiet(cli.quiet);

    match cli.command {
        // Commands that don't talk to the user service
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "useradmin", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run(&mut Prompter::stdin())?;
        }
        Commands::Login { username, password } => {
            let mut store = FileStore::open_default()?;
            tracing::debug!(path = %store.path().display(), "session file");
            commands::login::login(&mut store, &mut Prompter::stdin(), username, password)?;
        }
        Commands::Logout => {
            commands::login::logout(&mut FileStore::open_default()?)?;
        }
        Commands::Whoami => {
            commands::login::whoami(&FileStore::open_default()?)?;
        }
        // Commands behind the login gate
        command => {
            let session = session::require_login(&FileStore::open_default()?)?;
            tracing::debug!(username = %session.username, "session found");

            let config = Config::load()?;
            let ops = UserOperations::new(UserClient::new(config.base_url()?));

            match command {
                Commands::Users { action, list } => match action {
                    None => commands::users::list(&ops, &config, list).await?,
                    Some(UserCommands::List(args)) => {
                        commands::users::list(&ops, &config, args).await?;
                    }
                    Some(UserCommands::Show { id }) => {
                        commands::users::show(&ops, id).await?;
                    }
                    Some(UserCommands::Add(args)) => {
                        commands::users::add(&ops, args).await?;
                    }
                    Some(UserCommands::Edit(args)) => {
                        commands::users::edit(&ops, args).await?;
                    }
                    Some(UserCommands::Delete { id, yes }) => {
                        commands::users::delete(&ops, &mut Prompter::stdin(), id, yes).await?;
                    }
                },
                Commands::Dashboard => {
                    let pager = commands::users::pager_for(&config, Default::default())?;
                    commands::dashboard::run(&ops, &mut Prompter::stdin(), pager).await?;
                }
                Commands::Completions { .. }
                | Commands::Init
                | Commands::Login { .. }
                | Commands::Logout
                | Commands::Whoami => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
