//! Stowage CLI: upload files to configured disks and inspect stored ones.
//!
//! Disks and defaults come from the environment (see `UploaderConfig::from_env`);
//! a `.env` file in the working directory is honoured.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stowage_cli::{catalog, init_tracing, print_json};
use stowage_core::{UploadOptions, UploaderConfig};
use stowage_processing::{
    format_bytes, from_bytes, icon_reference, mime_type_for_filename, to_bytes, InferSniffer,
    MimeSniffer, ToBytes, UploadRequest,
};
use stowage_services::FileUploader;
use stowage_storage::create_disks;
use tokio::io::AsyncWriteExt;

#[derive(Parser)]
#[command(name = "stowage", about = "Store and inspect uploaded files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a local file
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Name to record as the client filename (defaults to the file's name)
        #[arg(long)]
        name: Option<String>,
        /// Disk to store on
        #[arg(long)]
        disk: Option<String>,
        /// public or private; anything else stores as public
        #[arg(long)]
        visibility: Option<String>,
        #[arg(long)]
        user_id: Option<i64>,
        /// Path template, e.g. "uploads/{user_id}/{type}/{filename}"
        #[arg(long)]
        path: Option<String>,
        /// Use a random name and the content-detected extension
        #[arg(long)]
        safe: bool,
        /// MIME type to report (defaults to a lookup by extension)
        #[arg(long)]
        mime: Option<String>,
    },
    /// Print the contents of a stored file
    Get {
        path: String,
        #[arg(long)]
        disk: Option<String>,
    },
    /// Save a stored file locally
    Download {
        path: String,
        /// Destination file
        output: PathBuf,
        #[arg(long)]
        disk: Option<String>,
    },
    /// Public URL of a stored file
    Url {
        path: String,
        #[arg(long)]
        disk: Option<String>,
    },
    /// Backend location of a stored file
    Path {
        path: String,
        #[arg(long)]
        disk: Option<String>,
    },
    /// Metadata of a stored file
    Meta {
        path: String,
        #[arg(long)]
        disk: Option<String>,
    },
    /// Delete a stored file
    Delete {
        path: String,
        /// Succeed even if the file does not exist
        #[arg(long)]
        no_throw: bool,
        #[arg(long)]
        disk: Option<String>,
    },
    /// Read or change visibility
    Visibility {
        #[command(subcommand)]
        sub: VisibilityCommands,
    },
    /// MIME type and icon for a filename
    Mime { filename: String },
    /// Byte-size conversions
    Bytes {
        #[command(subcommand)]
        sub: BytesCommands,
    },
    /// Known extensions and image size presets
    Catalog,
}

#[derive(Subcommand)]
enum VisibilityCommands {
    Get {
        path: String,
        #[arg(long)]
        disk: Option<String>,
    },
    Set {
        path: String,
        visibility: String,
        #[arg(long)]
        disk: Option<String>,
    },
}

#[derive(Subcommand)]
enum BytesCommands {
    /// Human-readable size, e.g. 1536 -> "1.5 KB"
    Format {
        bytes: i128,
        #[arg(long, default_value = "2")]
        precision: u32,
    },
    /// Parse "2KB" style values into bytes
    ToBytes { value: String },
    /// Express bytes in a fixed unit, e.g. 1048576 MB -> "1.00MB"
    FromBytes {
        bytes: i128,
        unit: String,
        #[arg(long, default_value = "2")]
        decimals: usize,
    },
}

async fn build_uploader() -> anyhow::Result<FileUploader> {
    let config = UploaderConfig::from_env().context("Failed to load uploader configuration")?;
    config.validate().context("Invalid uploader configuration")?;
    let disks = create_disks(&config)
        .await
        .context("Failed to initialise disks")?;
    tracing::debug!(disks = ?disks.names(), default_disk = %config.default_disk, "Disks ready");
    Ok(FileUploader::new(config, disks))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            file,
            name,
            disk,
            visibility,
            user_id,
            path,
            safe,
            mime,
        } => {
            let uploader = build_uploader().await?;

            let mut request = UploadRequest::from_file(&file).await;
            if let Some(name) = name {
                let extension = stowage_processing::split_filename(&name).1.to_string();
                request.original_name = name;
                request.extension = extension;
            }
            if let Some(mime) = mime {
                request.mime_type = mime;
            }

            let mut options = UploadOptions::new();
            if safe {
                options = options.safe(true);
            }
            if let Some(disk) = disk {
                options = options.disk(disk);
            }
            if let Some(visibility) = visibility {
                options = options.visibility_str(&visibility);
            }
            if let Some(user_id) = user_id {
                options = options.user_id(user_id);
            }
            if let Some(path) = path {
                options = options.path(path);
            }

            let stored = uploader.store(request, options).await?;
            print_json(&stored)?;
        }
        Commands::Get { path, disk } => {
            let uploader = build_uploader().await?;
            let contents = uploader
                .files()
                .read_contents(&path, disk.as_deref())
                .await?;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&contents).await?;
            stdout.flush().await?;
        }
        Commands::Download { path, output, disk } => {
            let uploader = build_uploader().await?;
            let response = uploader
                .files()
                .download(&path, None, disk.as_deref())
                .await?;
            let content_type = response.content_type.clone();
            let disposition = response.content_disposition.clone();
            let data = response.into_bytes().await?;
            tokio::fs::write(&output, &data)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;
            print_json(&serde_json::json!({
                "output": output.display().to_string(),
                "content_type": content_type,
                "content_disposition": disposition,
                "size": format_bytes(data.len() as u64, 2),
            }))?;
        }
        Commands::Url { path, disk } => {
            let uploader = build_uploader().await?;
            println!("{}", uploader.files().public_url(&path, disk.as_deref())?);
        }
        Commands::Path { path, disk } => {
            let uploader = build_uploader().await?;
            println!("{}", uploader.files().local_path(&path, disk.as_deref())?);
        }
        Commands::Meta { path, disk } => {
            let uploader = build_uploader().await?;
            let meta = uploader.files().meta(&path, disk.as_deref()).await?;
            print_json(&meta)?;
        }
        Commands::Delete {
            path,
            no_throw,
            disk,
        } => {
            let uploader = build_uploader().await?;
            let deleted = uploader
                .files()
                .delete(&path, !no_throw, disk.as_deref())
                .await?;
            print_json(&serde_json::json!({ "path": path, "deleted": deleted }))?;
        }
        Commands::Visibility { sub } => {
            let uploader = build_uploader().await?;
            match sub {
                VisibilityCommands::Get { path, disk } => {
                    let visibility = uploader
                        .files()
                        .visibility(&path, disk.as_deref())
                        .await?;
                    println!("{}", visibility);
                }
                VisibilityCommands::Set {
                    path,
                    visibility,
                    disk,
                } => {
                    let changed = uploader
                        .files()
                        .set_visibility(&path, &visibility, disk.as_deref())
                        .await?;
                    print_json(&serde_json::json!({ "path": path, "changed": changed }))?;
                }
            }
        }
        Commands::Mime { filename } => {
            let sniffer: &dyn MimeSniffer = &InferSniffer;
            let mime = mime_type_for_filename(&filename, Some(sniffer));
            print_json(&serde_json::json!({
                "mime_type": mime,
                "icon": icon_reference(&mime),
            }))?;
        }
        Commands::Bytes { sub } => match sub {
            BytesCommands::Format { bytes, precision } => {
                println!("{}", format_bytes(bytes, precision));
            }
            BytesCommands::ToBytes { value } => match to_bytes(&value) {
                ToBytes::Bytes(bytes) => println!("{}", bytes),
                ToBytes::Unrecognized(original) => println!("{}", original),
            },
            BytesCommands::FromBytes {
                bytes,
                unit,
                decimals,
            } => {
                println!("{}", from_bytes(bytes, &unit, decimals));
            }
        },
        Commands::Catalog => {
            print_json(&catalog())?;
        }
    }

    Ok(())
}
