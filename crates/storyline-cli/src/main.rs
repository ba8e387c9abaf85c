//! Storyline CLI: attach media to an HTML document through the upload endpoint.
//!
//! Set STORYLINE_API_URL (or API_URL) and optionally STORYLINE_API_TOKEN.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use storyline_api_client::ApiClient;
use storyline_cli::{detect_kind, init_tracing, render_error, HtmlDocument};
use storyline_core::config::UploadConfig;
use storyline_core::models::{FileSelection, MediaKind, SelectedFile};
use storyline_upload::transport::UploadTransport;
use storyline_upload::validator::{MediaValidator, ValidationOutcome};
use storyline_upload::{ImageUploader, UploadOutcome, VideoUploader};

#[derive(Parser)]
#[command(name = "storyline", about = "Storyline media upload CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Image,
    Video,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Image => MediaKind::Image,
            KindArg::Video => MediaKind::Video,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file and insert it into an HTML document
    Upload {
        /// HTML document to edit (created if missing)
        document: PathBuf,
        /// Image or video file to upload
        file: PathBuf,
        /// Media kind; detected from the file type when omitted
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        /// Write the updated document here instead of in place
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check a file against the configured policy without uploading
    Validate {
        file: PathBuf,
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Print the effective upload limits
    Config,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn resolve_kind(file: &SelectedFile, kind: Option<KindArg>) -> anyhow::Result<MediaKind> {
    match kind {
        Some(kind) => Ok(kind.into()),
        None => detect_kind(file).with_context(|| {
            format!(
                "Cannot tell whether {} is an image or a video; pass --kind",
                file.name
            )
        }),
    }
}

async fn upload(
    config: &UploadConfig,
    document_path: &Path,
    file_path: &Path,
    kind: Option<KindArg>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let file = SelectedFile::from_path(file_path)?;
    let kind = resolve_kind(&file, kind)?;
    let mut document = HtmlDocument::load(document_path)?;

    let transport: Arc<dyn UploadTransport> = Arc::new(
        ApiClient::new(&config.api)
            .context("Failed to create API client. Set STORYLINE_API_URL (or API_URL)")?,
    );
    let selection = FileSelection::single(file);

    let outcome = match kind {
        MediaKind::Image => {
            ImageUploader::new(config, transport)
                .handle_file_change(&selection, Some(&mut document))
                .await
        }
        MediaKind::Video => {
            VideoUploader::new(config, transport)
                .handle_file_change(&selection, Some(&mut document))
                .await
        }
    };

    match outcome {
        UploadOutcome::Inserted(result) => {
            let target = output.as_deref().unwrap_or(document_path);
            document.save(target)?;
            tracing::info!(document = %target.display(), "Document updated");
            print_json(&result)
        }
        UploadOutcome::Failed(Some(error)) => {
            eprintln!("{}", render_error(&error));
            anyhow::bail!("Upload failed: {}", error.error_code)
        }
        UploadOutcome::Failed(None) => anyhow::bail!("Upload was superseded"),
        UploadOutcome::Busy => anyhow::bail!("Another upload is already in progress"),
        UploadOutcome::Skipped => anyhow::bail!("Nothing to upload"),
    }
}

fn validate(config: &UploadConfig, file_path: &Path, kind: Option<KindArg>) -> anyhow::Result<()> {
    let file = SelectedFile::from_path(file_path)?;
    let kind = resolve_kind(&file, kind)?;
    let validator = MediaValidator::new(config.policy(kind).clone());

    match validator.validate(&file) {
        ValidationOutcome::Accept => {
            println!("{} is a valid {} upload", file.name, kind);
            Ok(())
        }
        ValidationOutcome::Reject(reason) => {
            let error = validator.create_validation_error(&file, reason);
            eprintln!("{}", render_error(&error));
            anyhow::bail!("Validation failed: {}", reason)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let config = UploadConfig::from_env().context("Invalid upload configuration")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            document,
            file,
            kind,
            output,
        } => upload(&config, &document, &file, kind, output).await?,
        Commands::Validate { file, kind } => validate(&config, &file, kind)?,
        Commands::Config => print_json(&serde_json::json!({
            "api_url": config.api.base_url,
            "timeout_secs": config.api.timeout.as_secs(),
            "image": {
                "max_file_size": config.image.max_file_size,
                "accept": config.image.accept_types(),
                "formats": config.image.allowed_formats(),
            },
            "video": {
                "max_file_size": config.video.max_file_size,
                "accept": config.video.accept_types(),
                "formats": config.video.allowed_formats(),
            },
        }))?,
    }

    Ok(())
}
