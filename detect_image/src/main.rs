use anyhow::Context;
use clap::Parser;
use inference_client::{ClientConfig, InferenceClient, ModelId, DEFAULT_API_URL};
use std::{path::PathBuf, time::Duration};

/// Send one local image to the hosted detection model and print the raw
/// response.
#[derive(Parser, Debug)]
#[command(name = "detect_image", version, about)]
struct Args {
    /// Image to submit (jpg, jpeg or png).
    image: PathBuf,
    /// Base URL of the detection service.
    #[arg(long, env = "SD_INFERENCE__API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
    /// API key for the detection service.
    #[arg(long, env = "SD_INFERENCE__API_KEY", hide_env_values = true)]
    api_key: String,
    /// Hosted model, as `<project>/<version>`.
    #[arg(
        long,
        env = "SD_INFERENCE__MODEL_ID",
        default_value = "counterfeit-nike-shoes-detection/2"
    )]
    model_id: ModelId,
    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = ClientConfig::new(args.api_url, args.api_key)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let client = InferenceClient::new(config)?;

    let result = client
        .infer_path(&args.image, &args.model_id)
        .await
        .with_context(|| format!("inference on {:?} failed", args.image))?;

    println!("{}", serde_json::to_string_pretty(&result.raw)?);

    Ok(())
}
