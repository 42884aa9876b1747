use clap::{Parser, Subcommand};

mod commands;
mod report;

#[derive(Parser)]
#[command(
    name = "gridsched",
    about = "gridsched — online batch scheduling for private and elastic pools",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario through its orchestrator and print the schedule.
    ///
    /// A scenario with a [public] block runs on the hybrid orchestrator;
    /// anything else runs on a single batch orchestrator.
    Run {
        /// Path to the scenario TOML
        #[arg(short, long)]
        scenario: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Generate a random scenario with uniformly drawn tasks and resources
    Generate(commands::generate::GenerateArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gridsched=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { scenario, format } => {
            commands::run::run(&scenario, &format)
        }
        Commands::Generate(args) => {
            commands::generate::generate(&args)
        }
    }
}
