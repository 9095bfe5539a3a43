use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imgvault_core::constants::{ENTITIES_JSON_FILE, IMAGES_JSON_FILE};
use imgvault_core::{
    max_file_size_from_env_value, parse_labels, CoreConfig, ImageCatalog, ImageContent,
    ImageInfo, ImageService, MediaType, UploadRequest,
};
use imgvault_files::{detect_media_type, DEFAULT_UPLOAD_DIR};

#[derive(Parser)]
#[command(name = "imgvault")]
#[command(about = "Validated image store with JSON-file persistence")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image with caption and labels
    Upload {
        /// Image file to upload
        path: PathBuf,
        #[arg(long)]
        caption: String,
        /// JSON array or comma-separated list
        #[arg(long)]
        labels: String,
        /// Declared media type (detected from the content when omitted)
        #[arg(long)]
        mime: Option<String>,
    },
    /// Show an uploaded image
    Get { id: String },
    /// List uploaded images
    List,
    /// Delete an uploaded image and its file
    Delete { id: String },
    /// Import a file into the image catalog
    Import { path: PathBuf },
    /// List catalog images
    Entities,
    /// Show a catalog image
    Entity { id: String },
    /// Remove a catalog image
    RemoveEntity { id: String },
}

/// Main entry point for the imgvault CLI
///
/// # Environment Variables
/// - `IMGVAULT_IMAGES_FILE`: record store file (default: "images.json")
/// - `IMGVAULT_ENTITIES_FILE`: catalog store file (default: "image_entities.json")
/// - `IMGVAULT_UPLOAD_DIR`: directory uploaded files are written to (default: "uploads")
/// - `IMGVAULT_MAX_FILE_SIZE`: size cap in bytes (default and maximum: 10 MiB)
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("imgvault=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cfg = config_from_env_values(
        std::env::var("IMGVAULT_IMAGES_FILE").ok(),
        std::env::var("IMGVAULT_ENTITIES_FILE").ok(),
        std::env::var("IMGVAULT_UPLOAD_DIR").ok(),
        std::env::var("IMGVAULT_MAX_FILE_SIZE").ok(),
    )?;
    tracing::debug!(
        images_file = %cfg.images_file().display(),
        entities_file = %cfg.entities_file().display(),
        upload_dir = %cfg.upload_dir().display(),
        max_file_size = cfg.max_file_size(),
        "configuration resolved"
    );

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'imgvault --help' for commands");
        return Ok(());
    };

    run(command, &cfg)
}

fn run(command: Commands, cfg: &CoreConfig) -> anyhow::Result<()> {
    match command {
        Commands::Upload {
            path,
            caption,
            labels,
            mime,
        } => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let mime_type = resolve_mime_type(&path, &bytes, mime)?;
            let request = UploadRequest {
                filename: file_name_of(&path)?,
                mime_type,
                bytes,
                caption,
                labels: parse_labels(&labels)?,
            };
            print_json(&ImageService::new(cfg).upload(request)?)
        }
        Commands::Get { id } => match ImageService::new(cfg).get(&id)? {
            Some(image) => print_json(&image),
            None => anyhow::bail!("no image with id {}", id),
        },
        Commands::List => print_json(&ImageService::new(cfg).list()?),
        Commands::Delete { id } => {
            if !ImageService::new(cfg).delete(&id)? {
                anyhow::bail!("no image with id {}", id);
            }
            print_json(&serde_json::json!({ "deleted": id }))
        }
        Commands::Import { path } => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let image = ImageCatalog::new(cfg)
                .import(&file_name_of(&path)?, ImageContent::from_bytes(bytes)?)?;
            print_json(&image.info())
        }
        Commands::Entities => {
            let infos: Vec<ImageInfo> = ImageCatalog::new(cfg)
                .list()?
                .iter()
                .map(|image| image.info())
                .collect();
            print_json(&infos)
        }
        Commands::Entity { id } => match ImageCatalog::new(cfg).get(&id)? {
            Some(image) => print_json(&image.info()),
            None => anyhow::bail!("no catalog image with id {}", id),
        },
        Commands::RemoveEntity { id } => {
            if !ImageCatalog::new(cfg).remove(&id)? {
                anyhow::bail!("no catalog image with id {}", id);
            }
            print_json(&serde_json::json!({ "removed": id }))
        }
    }
}

/// Builds the startup configuration from raw environment values.
fn config_from_env_values(
    images_file: Option<String>,
    entities_file: Option<String>,
    upload_dir: Option<String>,
    max_file_size: Option<String>,
) -> anyhow::Result<CoreConfig> {
    fn path_or(value: Option<String>, default: &str) -> PathBuf {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(default))
    }

    let cfg = CoreConfig::new(
        path_or(images_file, IMAGES_JSON_FILE),
        path_or(entities_file, ENTITIES_JSON_FILE),
        path_or(upload_dir, DEFAULT_UPLOAD_DIR),
        max_file_size_from_env_value(max_file_size)?,
    )?;
    Ok(cfg)
}

/// Declared type wins; otherwise sniff the content, then fall back to the file extension.
fn resolve_mime_type(path: &Path, bytes: &[u8], declared: Option<String>) -> anyhow::Result<String> {
    if let Some(declared) = declared {
        return Ok(declared);
    }
    if let Some(detected) = detect_media_type(bytes) {
        return Ok(detected.to_owned());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .with_context(|| format!("cannot determine media type of {}", path.display()))?;
    Ok(MediaType::from_extension(extension)?.as_str().to_owned())
}

fn file_name_of(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .with_context(|| format!("{} has no file name", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
