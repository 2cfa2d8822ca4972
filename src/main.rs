use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vod_uploader::batch::{directory_exists, upload_videos_in_directory};
use vod_uploader::models::VodConfig;
use vod_uploader::report::{write_results, RESULTS_FILE_NAME};
use vod_uploader::vod::VodClient;

#[derive(Debug, Parser)]
#[command(name = "vod-uploader")]
#[command(about = "Upload and publish every video in a directory to a VOD space")]
struct CliArgs {
    /// VOD space to upload into.
    #[arg(long = "spacename")]
    space_name: String,

    /// Directory scanned recursively for .mp4/.avi/.mov/.mkv files.
    #[arg(long = "inputdir")]
    input_dir: PathBuf,

    /// Directory receiving uploaded files and results.ini.
    #[arg(long = "outputdir")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vod_uploader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let result_path = args.output_dir.join(RESULTS_FILE_NAME);

    if !directory_exists(&args.input_dir) || !directory_exists(&args.output_dir) {
        std::process::exit(1);
    }

    let config = match VodConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load credentials: {}", e);
            std::process::exit(1);
        }
    };
    info!("Uploading to space {} in {}", args.space_name, config.region);
    let client = VodClient::new(config);

    let run =
        upload_videos_in_directory(&client, &args.space_name, &args.input_dir, &args.output_dir)
            .await;

    if let Err(e) = write_results(&run.outcomes, &result_path) {
        error!("Error saving {}: {}", result_path.display(), e);
        std::process::exit(1);
    }

    if let Some(e) = run.aborted {
        error!("Error: {}", e);
        std::process::exit(1);
    }

    info!("Processed {} videos", run.outcomes.len());
    Ok(())
}
