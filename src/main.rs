use clap::Parser;
use std::process;
use td::cli::{Cli, Commands};
use td::cli_handlers::{self, AddArgs};
use td::config::{self, Config};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with listings
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::log_filter(cli.verbose))),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = match Config::resolve(cli.file, cli.verbose) {
        Ok(config) => config,
        Err(e) => {
            println!("Error: {e}");
            process::exit(1);
        }
    };
    tracing::debug!(file = %config.file.display(), "using store");

    let policy = cli.command.error_policy();
    let result = match cli.command {
        Commands::Show { all } => cli_handlers::handle_show(&config, all),
        Commands::Add {
            list,
            name,
            tags,
            priority,
            urgency,
            deadline,
            description,
        } => cli_handlers::handle_add(
            &config,
            AddArgs {
                list,
                name,
                tags,
                priority,
                urgency,
                deadline,
                description,
            },
        ),
        Commands::Delete { list, name } => cli_handlers::handle_delete(&config, list, name),
        Commands::Update { list, name } => cli_handlers::handle_update(&config, list, name),
        Commands::Tick { list, name } => cli_handlers::handle_tick(&config, list, name),
        Commands::List { name, delete } => cli_handlers::handle_list(&config, name, delete),
    };

    if let Err(e) = policy.apply(result) {
        tracing::debug!(code = e.error_code(), "command failed");
        println!("Error: {e}");
        process::exit(1);
    }
}
