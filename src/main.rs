use clap::{CommandFactory, Parser};
use s3_stash::{Config, Downloader, S3Client, StorageOptions, TransferError, TransferPipeline};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Download an image, store it in S3 and print a presigned URL for it
#[derive(Debug, Parser)]
#[command(name = "s3-stash")]
#[command(version)]
struct Cli {
    /// HTTP(S) URL of the image to download
    image_url: String,

    /// Destination S3 bucket
    bucket_name: String,

    /// Seconds the presigned URL stays valid
    expiration_time: u64,

    /// AWS region of the bucket
    #[arg(long, default_value = s3_stash::config::DEFAULT_REGION)]
    region: String,

    /// Directory for the temporary copy [default: OS temp dir]
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// S3-compatible endpoint, e.g. http://localhost:9000
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Named AWS profile to take credentials from
    #[arg(long)]
    profile: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries progress and the URL
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,s3_stash=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Transfer failed: {:?}", e);
            println!("Error: {}", e);
            if matches!(e, TransferError::Usage(_)) {
                eprintln!("{}", Cli::command().render_usage());
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), TransferError> {
    let storage = StorageOptions {
        region: cli.region,
        endpoint_url: cli.endpoint_url,
        profile: cli.profile,
    };

    let mut config = Config::new(cli.image_url, cli.bucket_name, cli.expiration_time)?
        .with_storage(storage);
    if let Some(dir) = cli.scratch_dir {
        config = config.with_scratch_dir(dir);
    }

    info!("Configuration loaded: {:?}", config);

    let s3_client = S3Client::from_env(&config.storage).await;
    let pipeline = TransferPipeline::new(config, Downloader::default(), s3_client);

    let mut stdout = std::io::stdout().lock();
    let outcome = pipeline.run(&mut stdout).await?;

    info!(
        "Stored s3://{}/{} ({}), URL valid until {}",
        outcome.bucket, outcome.key, outcome.content_type, outcome.presigned.expires_at
    );

    Ok(())
}
