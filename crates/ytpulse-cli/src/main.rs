mod analyze;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use ytpulse_analyzer::AnalysisOptions;
use ytpulse_youtube::YoutubeClient;

#[derive(Debug, Parser)]
#[command(name = "ytpulse-cli")]
#[command(about = "Analyze a YouTube channel's recent uploads from the command line")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a channel handle or id and print its record
    Channel {
        /// Channel handle (e.g. mychannel) or id (UC...)
        handle: String,
    },
    /// Rank a channel's most recent uploads by engagement and views
    Analyze {
        /// Channel handle or id
        channel: String,
        /// Number of most recent uploads to sample (1-200)
        #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
        max_videos: i64,
        /// Length of each ranking (1-20)
        #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ytpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = YoutubeClient::with_base_url(
        &config.youtube_api_key,
        config.request_timeout_secs,
        &config.youtube_base_url,
    )?;

    let output = match cli.command {
        Commands::Channel { handle } => analyze::run_channel(&client, &handle).await?,
        Commands::Analyze {
            channel,
            max_videos,
            limit,
        } => {
            let options = AnalysisOptions::new(max_videos, limit)?;
            analyze::run_analyze(&client, &channel, options).await?
        }
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}
