use clap::{Parser, Subcommand};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use webhook_rules_cli::commands::lifecycle_cmd::{
    execute_create, execute_update, report, CreateArgs, UpdateArgs, EXIT_ACCEPTED,
};

/// Webhook rules CLI: check webhook definitions against a policy
#[derive(Parser)]
#[command(name = "webhook-rules")]
#[command(about = "Check webhook definitions against the record rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the create rules on a new webhook definition
    Create(CreateArgs),

    /// Run the update rules on a patch for a stored webhook definition
    Update(UpdateArgs),

    /// Show the CLI version
    Version,
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("WEBHOOK_RULES_LOG"))
        .init();

    let cli = Cli::parse();
    let code = match &cli.command {
        Commands::Create(args) => report(execute_create(args)),
        Commands::Update(args) => report(execute_update(args)),
        Commands::Version => {
            println!(
                "webhook-rules version {}",
                option_env!("WEBHOOK_RULES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
            );
            EXIT_ACCEPTED
        }
    };

    std::process::exit(code);
}
