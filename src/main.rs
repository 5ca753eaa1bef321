use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use polichat::app::App;
use polichat::config::Config;

#[derive(Parser)]
#[command(name = "polichat")]
#[command(version = "0.1.0")]
#[command(about = "Terminal chat widget for the Facultad Politécnica information bot", long_about = None)]
struct Cli {
    /// Base URL of the chat backend
    #[arg(short, long)]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let config = Config::load(cli.base_url)?;
    info!(base_url = %config.backend_base_url, "Starting polichat");

    let mut app = App::new(&config);
    app.run().await
}
