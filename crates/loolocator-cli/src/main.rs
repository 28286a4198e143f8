use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod directory;
mod render;

#[derive(Debug, Parser)]
#[command(name = "loolocator")]
#[command(about = "Find public washrooms near a location")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List washrooms nearest to a position
    Nearest(NearestArgs),
    /// Show one washroom by id
    Show {
        /// Washroom id as returned by `nearest`
        id: String,
    },
    /// Check that the directory service is reachable
    Health,
}

#[derive(Debug, Args)]
struct NearestArgs {
    /// Latitude of the search origin (defaults to the demo origin)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Longitude of the search origin
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,
    /// Search radius in meters: 500, 1000, 2000 or 5000
    #[arg(long, default_value_t = 1000)]
    radius: u32,
    /// Only list wheelchair-accessible washrooms
    #[arg(long)]
    accessible: bool,
    /// Select the Nth result (1-based) and show its details
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    select: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = loolocator_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Nearest(args) => directory::run_nearest(&config, &args).await,
        Commands::Show { id } => directory::run_show(&config, &id).await,
        Commands::Health => directory::run_health(&config).await,
    }
}
