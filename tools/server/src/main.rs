//! drivemcp - Google Drive tools over the Model Context Protocol.
//!
//! By default the binary serves MCP on stdio. The other subcommands run
//! the same operations from a terminal, which is handy for completing the
//! first authorization before registering the server with a client.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rmcp::{transport::stdio, ServiceExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

use drivemcp_common::DriveId;
use drivemcp_drive::{CredentialManager, DriveClient, InstalledAppFlow};

mod config;
mod render;
mod service;

use config::ServerConfig;
use service::{DriveService, SearchFilesRequest};

#[derive(Parser)]
#[command(name = "drivemcp")]
#[command(about = "drivemcp - Google Drive tools over the Model Context Protocol")]
#[command(version)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file.
    #[arg(long, env = "DRIVEMCP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// OAuth client-secret file downloaded from the Google Cloud console.
    #[arg(long, env = "DRIVEMCP_CREDENTIALS_FILE", global = true)]
    credentials_file: Option<PathBuf>,

    /// File the access and refresh tokens are stored in.
    #[arg(long, env = "DRIVEMCP_TOKEN_FILE", global = true)]
    token_file: Option<PathBuf>,

    /// Print the authorization URL instead of opening a browser.
    #[arg(long, global = true)]
    no_browser: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the Drive tools over MCP on stdio (default).
    Serve,

    /// Obtain credentials, running the browser flow if needed.
    Auth,

    /// List recently modified files.
    List {
        /// Number of files to return.
        #[arg(short = 'n', long, default_value_t = 10)]
        page_size: u32,

        /// Only list files inside this folder.
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Search files by name.
    Search {
        /// Text the file name must contain.
        term: String,

        /// Maximum number of results.
        #[arg(short = 'n', long, default_value_t = 50)]
        max_results: u32,

        /// MIME type or alias (google_sheets, google_docs, pdf, image, ...).
        #[arg(short, long)]
        mime_type: Option<String>,

        /// Only search inside this folder.
        #[arg(short, long)]
        folder: Option<String>,
    },

    /// Show detailed information about one file.
    Info {
        /// Google Drive file ID.
        file_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr: stdout carries the MCP protocol.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli)?;
    let manager = Arc::new(credential_manager(&config));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cmd_serve(manager, &config).await,
        Commands::Auth => cmd_auth(&manager).await,
        Commands::List { page_size, folder } => {
            cmd_list(&manager, &config, page_size, folder).await
        }
        Commands::Search {
            term,
            max_results,
            mime_type,
            folder,
        } => {
            let request = SearchFilesRequest {
                query: term,
                max_results: Some(max_results),
                mime_type,
                folder_id: folder,
            };
            cmd_search(&manager, &config, &request).await
        }
        Commands::Info { file_id } => cmd_info(&manager, &config, &file_id).await,
    }
}

/// Defaults, then the config file, then command-line overrides.
fn load_config(cli: &Cli) -> Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path).context("Failed to load configuration")?,
        None => ServerConfig::default(),
    };

    if let Some(path) = &cli.credentials_file {
        config.credentials_file = path.clone();
    }
    if let Some(path) = &cli.token_file {
        config.token_file = path.clone();
    }
    if cli.no_browser {
        config.open_browser = false;
    }

    Ok(config)
}

fn credential_manager(config: &ServerConfig) -> CredentialManager {
    let flow = if config.open_browser {
        InstalledAppFlow::new()
    } else {
        InstalledAppFlow::without_browser()
    };
    CredentialManager::new(config.credential_config(), Arc::new(flow))
}

async fn drive_client(manager: &CredentialManager, config: &ServerConfig) -> Result<DriveClient> {
    let credential = manager
        .obtain()
        .await
        .context("Failed to obtain Google Drive credentials")?;
    Ok(DriveClient::with_base_url(
        &credential,
        config.api_base_url.clone(),
    )?)
}

/// Serve MCP on stdio until the client disconnects.
async fn cmd_serve(manager: Arc<CredentialManager>, config: &ServerConfig) -> Result<()> {
    manager
        .preflight()
        .context("Cannot start without Google credentials")?;

    info!(
        "Starting drivemcp server (token file: {})",
        config.token_file.display()
    );

    let service = DriveService::new(manager, config.api_base_url.clone())
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}

async fn cmd_auth(manager: &CredentialManager) -> Result<()> {
    let resolved = manager
        .resolve()
        .await
        .context("Failed to obtain Google Drive credentials")?;

    println!("Authenticated ({} credentials).", resolved.source);
    println!("  Token file: {}", manager.config().token_path.display());
    if let Some(expiry) = resolved.credential.expiry {
        println!("  Expires: {}", expiry);
    }

    Ok(())
}

async fn cmd_list(
    manager: &CredentialManager,
    config: &ServerConfig,
    page_size: u32,
    folder: Option<String>,
) -> Result<()> {
    let folder = folder
        .map(DriveId::new)
        .transpose()
        .context("Invalid folder id")?;

    let client = drive_client(manager, config).await?;
    let files = client
        .list_files(page_size, folder.as_ref())
        .await
        .context("Failed to list files")?;

    if files.is_empty() {
        println!("No files found.");
        return Ok(());
    }

    println!("Found {} files:", files.len());
    for file in &files {
        println!("{}", render::file_line(file));
    }

    Ok(())
}

async fn cmd_search(
    manager: &CredentialManager,
    config: &ServerConfig,
    request: &SearchFilesRequest,
) -> Result<()> {
    let client = drive_client(manager, config).await?;
    let files = service::search(&client, request)
        .await
        .context("Failed to search files")?;

    if files.is_empty() {
        println!("No files found matching \"{}\".", request.query);
        return Ok(());
    }

    println!("Found {} files matching \"{}\":", files.len(), request.query);
    for file in &files {
        println!("{}", render::file_line(file));
    }

    Ok(())
}

async fn cmd_info(manager: &CredentialManager, config: &ServerConfig, file_id: &str) -> Result<()> {
    let file_id = DriveId::new(file_id).context("Invalid file id")?;

    let client = drive_client(manager, config).await?;
    let details = client
        .get_file_info(&file_id)
        .await
        .context("Failed to get file info")?;

    let Some(details) = details else {
        anyhow::bail!("File not found: {}", file_id);
    };

    let file = &details.file;
    let or_na = |value: Option<String>| value.unwrap_or_else(|| "N/A".to_string());

    println!("File: {}", file.name);
    println!("  ID: {}", file.id);
    println!("  MIME Type: {}", file.mime_type);
    println!("  Size: {}", file.display_size());
    println!("  Created: {}", or_na(file.created_time.map(|t| t.to_rfc3339())));
    println!("  Modified: {}", or_na(file.modified_time.map(|t| t.to_rfc3339())));
    println!("  Web View Link: {}", or_na(file.web_view_link.clone()));

    for owner in &details.owners {
        println!(
            "  Owner: {} <{}>",
            or_na(owner.display_name.clone()),
            or_na(owner.email_address.clone())
        );
    }
    for permission in &details.permissions {
        println!(
            "  Permission: {} {} {}",
            or_na(permission.role.clone()),
            or_na(permission.kind.clone()),
            permission.email_address.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
