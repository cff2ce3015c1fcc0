use clap::Parser;
use env_logger::{Builder, Target};
use log::{info, LevelFilter};
use stakescan_api_client::{client::StakescanApiClient, config::Config};

use crate::args::{Args, Commands};

mod args;
mod commands;

fn api_client(args: &Args) -> anyhow::Result<StakescanApiClient> {
    let mut config = Config::for_network(args.network);
    if let Some(base_url) = &args.api_base_url {
        config.base_url = base_url.clone();
    }
    if let Some(price_api_url) = &args.price_api_url {
        config = config.with_price_api_url(price_api_url.clone());
    }
    Ok(StakescanApiClient::new(config)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut builder = Builder::new();
    builder
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args: Args = Args::parse();
    let client = api_client(&args)?;
    info!("Using {} on {}", client.base_url(), args.network);

    match &args.command {
        Commands::Overview(cmd) => commands::overview(&args, &client, cmd).await,
        Commands::Validators(cmd) => commands::validators(&args, &client, cmd).await,
        Commands::Calculate(cmd) => commands::calculate(&args, &client, cmd).await,
    }
}
