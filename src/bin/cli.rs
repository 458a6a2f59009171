//! safekeep CLI Client
//!
//! Command-line interface for the backup service.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use safekeep::client::{BackupOutcome, DeleteOutcome, ListOutcome, RetrieveOutcome};
use safekeep::config::load_file_list;
use safekeep::{Client, ClientConfig, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// safekeep CLI
#[derive(Parser, Debug)]
#[command(name = "safekeep-cli")]
#[command(about = "Client for the safekeep backup service")]
#[command(version)]
struct Cli {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:65432")]
    server: String,

    /// Fixed client identity (random when omitted)
    #[arg(short, long)]
    identity: Option<u32>,

    /// Payload chunk size in bytes
    #[arg(short, long, default_value = "4096")]
    chunk_size: usize,

    /// Connect/read/write timeout in milliseconds (0 disables)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

/// Local files to back up
#[derive(Args, Debug)]
struct FileSource {
    /// Files to back up
    files: Vec<PathBuf>,

    /// Read additional paths from a file, one per line
    #[arg(short, long)]
    file_list: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List stored files
    List,

    /// Back up local files
    Backup {
        #[command(flatten)]
        source: FileSource,
    },

    /// Retrieve a stored file
    Retrieve {
        /// Name of the stored file
        name: String,

        /// Destination path (defaults to the name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete a stored file
    Delete {
        /// Name of the stored file
        name: String,
    },

    /// Run a full session: list, back up, list, retrieve, delete, retrieve
    Session {
        #[command(flatten)]
        source: FileSource,

        /// Directory for retrieved copies
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,safekeep=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli) -> Result<()> {
    let mut builder = ClientConfig::builder()
        .server_addr(&args.server)
        .chunk_size(args.chunk_size)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms);
    if let Some(identity) = args.identity {
        builder = builder.identity(identity);
    }
    let client = Client::new(builder.build()?);

    tracing::info!("safekeep CLI v{}", safekeep::VERSION);
    tracing::info!("Identity: {}", client.identity());
    tracing::info!("Server: {}", args.server);

    match args.command {
        Commands::List => list(&client),
        Commands::Backup { source } => {
            for path in collect_files(&source)? {
                backup(&client, &path)?;
            }
            Ok(())
        }
        Commands::Retrieve { name, output } => {
            let dest = output.unwrap_or_else(|| PathBuf::from(&name));
            retrieve(&client, &name, &dest)
        }
        Commands::Delete { name } => delete(&client, &name),
        Commands::Session { source, output_dir } => session(&client, &source, &output_dir),
    }
}

fn collect_files(source: &FileSource) -> Result<Vec<PathBuf>> {
    let mut files = source.files.clone();
    if let Some(list) = &source.file_list {
        files.extend(load_file_list(list)?);
    }
    Ok(files)
}

fn list(client: &Client) -> Result<()> {
    match client.list_all()? {
        ListOutcome::Listed(listing) => {
            for name in listing.file_names() {
                println!("{}", name);
            }
        }
        ListOutcome::NoFiles => println!("No files stored for identity {}", client.identity()),
        ListOutcome::ServerError => tracing::error!("Server failed to list files"),
    }
    Ok(())
}

fn backup(client: &Client, path: &Path) -> Result<()> {
    match client.backup_file(path)? {
        BackupOutcome::Stored { filename } => println!("Backed up {}", filename),
        BackupOutcome::ServerError => tracing::error!("Server failed to back up {}", path.display()),
    }
    Ok(())
}

fn retrieve(client: &Client, name: &str, dest: &Path) -> Result<()> {
    match client.retrieve_to_file(name, dest)? {
        RetrieveOutcome::Retrieved(transfer) => {
            if transfer.is_complete() {
                println!("Retrieved {} into {}", transfer.filename, dest.display());
            } else {
                println!(
                    "Retrieved {} into {} (incomplete: {} of {} bytes)",
                    transfer.filename,
                    dest.display(),
                    transfer.received,
                    transfer.declared_size
                );
            }
        }
        RetrieveOutcome::NotFound { filename } => println!("File not found: {}", filename),
        RetrieveOutcome::ServerError => tracing::error!("Server failed to retrieve {}", name),
    }
    Ok(())
}

fn delete(client: &Client, name: &str) -> Result<()> {
    match client.delete(name)? {
        DeleteOutcome::Deleted { filename } => println!("Deleted {}", filename),
        DeleteOutcome::NotFound { filename } => println!("File not found: {}", filename),
        DeleteOutcome::ServerError => tracing::error!("Server failed to delete {}", name),
    }
    Ok(())
}

/// list → backup each → list → retrieve first → delete first → retrieve first
fn session(client: &Client, source: &FileSource, output_dir: &Path) -> Result<()> {
    let files = collect_files(source)?;

    list(client)?;
    for path in &files {
        backup(client, path)?;
    }
    list(client)?;

    let first = files
        .first()
        .and_then(|path| path.file_name())
        .and_then(|name| name.to_str());
    if let Some(name) = first {
        let dest = output_dir.join(name);
        retrieve(client, name, &dest)?;
        delete(client, name)?;

        // The local copy stays; this only checks the server forgot the file
        match client.retrieve(name, &mut std::io::sink())? {
            RetrieveOutcome::NotFound { filename } => println!("Confirmed {} is gone", filename),
            other => tracing::warn!("{} still retrievable after delete: {:?}", name, other),
        }
    }
    Ok(())
}
