//! CLI for Resume Photo - studio resume photos from casual snapshots.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use resume_photo::{
    EncodedImage, GeminiTransformClient, ResumePhotoError, SessionController, StatusKind,
    TransformConfig, TransformModel, DOWNLOAD_FILE_NAME,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-photo")]
#[command(about = "Turn a casual photo into an AI studio resume photo (Gemini)")]
#[command(version)]
struct Cli {
    /// Photo to transform
    input: PathBuf,

    /// Where to write the result (file, or directory for resume_photo_ai.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model to use
    #[arg(short, long, value_enum, default_value = "flash")]
    model: ModelArg,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    Flash,
    Pro,
}

impl From<ModelArg> for TransformModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Flash => TransformModel::FlashImage,
            ModelArg::Pro => TransformModel::ProImage,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = TransformConfig::from_env().with_model(cli.model.into());
    if config.credential().is_none() {
        return Err(ResumePhotoError::MissingCredential.into());
    }

    let photo = EncodedImage::from_path(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let mut session = SessionController::new(GeminiTransformClient::new(config));

    if !cli.json {
        let mut updates = session.subscribe();
        tokio::spawn(async move {
            while updates.changed().await.is_ok() {
                let status = updates.borrow_and_update().status;
                if status == StatusKind::Processing {
                    eprintln!("Applying studio retouching...");
                }
            }
        });
    }

    let loaded = session.upload(photo);
    if !cli.json && loaded.status == StatusKind::Idle {
        eprintln!("Photo loaded.");
    }
    let snapshot = session.transform().await;

    let Some(download) = snapshot.download() else {
        let message = snapshot
            .error_message
            .unwrap_or_else(|| format!("transform ended in state {}", snapshot.status));
        if cli.json {
            let result = failure_json(snapshot.status, &message);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        anyhow::bail!(message);
    };

    let output = resolve_output(cli.output.as_deref());
    download
        .image()
        .save(&output)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if cli.json {
        let result = serde_json::json!({
            "success": true,
            "status": snapshot.status,
            "input": cli.input.display().to_string(),
            "output": output.display().to_string(),
            "size_bytes": download.image().size(),
            "media_type": download.image().media_type(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Saved studio photo: {} ({} bytes)",
            output.display(),
            download.image().size()
        );
    }

    Ok(())
}

fn resolve_output(output: Option<&Path>) -> PathBuf {
    match output {
        None => PathBuf::from(DOWNLOAD_FILE_NAME),
        Some(path) if path.is_dir() => path.join(DOWNLOAD_FILE_NAME),
        Some(path) => path.to_path_buf(),
    }
}

fn failure_json(status: StatusKind, message: &str) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "status": status,
        "error": message,
    })
}
