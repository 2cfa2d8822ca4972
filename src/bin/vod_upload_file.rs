//! Upload and publish one file, printing a single summary line:
//! `filepath, title, uploadPath, uploaded, published, errorMessage`.

use anyhow::Result as AnyResult;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vod_uploader::models::{Credentials, VodConfig, CONFIG_FILE_NAME};
use vod_uploader::single::{resolve_title, upload_single, SingleUploadReport};
use vod_uploader::vod::VodClient;
use vod_uploader::{Error, Result};

#[derive(Debug, Parser)]
#[command(name = "vod_upload_file")]
#[command(about = "Upload and publish a single video to a VOD space")]
struct CliArgs {
    /// VOD space to upload into.
    #[arg(long = "spacename")]
    space_name: String,

    /// Local video to upload.
    #[arg(long = "filepath")]
    file_path: PathBuf,

    /// Media title; defaults to the file's base name.
    #[arg(long)]
    title: Option<String>,

    /// Remote file name inside the space.
    #[arg(long = "uploadpath")]
    upload_path: Option<String>,
}

/// Credentials come from `config.ini` in the working directory.
fn load_credentials() -> Result<Credentials> {
    let cwd = std::env::current_dir()
        .map_err(|e| Error::Config(format!("Cannot read working directory: {}", e)))?;
    Credentials::from_ini_file(&cwd.join(CONFIG_FILE_NAME))
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vod_uploader=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let title = resolve_title(&args.file_path, args.title.as_deref());

    let credentials = match load_credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!("{}", e);
            println!("{}", SingleUploadReport::failed(&args.file_path, &title, &e));
            std::process::exit(1);
        }
    };

    let client = VodClient::new(VodConfig::new(credentials).with_env_overrides());
    let report = upload_single(
        &client,
        &args.space_name,
        &args.file_path,
        &title,
        args.upload_path,
    )
    .await;

    println!("{}", report);
    Ok(())
}
