use clap::{Parser, Subcommand};
use nakmuay_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "nakmuay", version, about = "Nak Muay trainer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Round timer
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Training log
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Weekly, monthly and streak statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Technique library
    Combo {
        #[command(subcommand)]
        action: commands::combo::ComboAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr. `NAKMUAY_LOG` wins over `RUST_LOG`, which wins over the config file.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_env("NAKMUAY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config);

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action, &config).await,
        Commands::Progress { action } => commands::progress::run(action, &config).await,
        Commands::Stats { action } => commands::stats::run(action, &config).await,
        Commands::Combo { action } => commands::combo::run(action, &config).await,
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
