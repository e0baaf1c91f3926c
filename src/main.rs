//! atelier - sandboxed workspace file operations.
//!
//! Usage:
//!   atelier -r ROOT list PATH            List files (or directories) under a workspace path
//!   atelier -r ROOT import DEST SRC...   Import external files/directories into the workspace
//!   atelier -r ROOT export SRC DEST      Export a workspace directory to an external path
//!   atelier -r ROOT copy SRC DEST        Copy a workspace directory into another
//!   atelier -r ROOT delete PATH          Move a workspace entry to the trash
//!   atelier -r ROOT rename PATH NAME     Rename a workspace entry in place
//!   atelier -r ROOT move SRC DEST        Move a workspace entry to a new path
//!   atelier --help                       Show help

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tokio_util::sync::CancellationToken;

use atelier_core::WorkspaceConfig;
use atelier_ops::{ConflictDecision, ConflictHandler, CopyOptions, ProgressHandler, WorkspaceService};

#[derive(Parser)]
#[command(
    name = "atelier",
    version,
    about = "Sandboxed workspace file operations",
    long_about = "atelier performs bulk copy, import, export, move, and trash \
                  operations confined to a workspace root directory.\n\n\
                  Every path argument must stay inside the root; relative \
                  paths are resolved against it."
)]
struct Cli {
    /// Workspace root directory; all operations are confined to it
    #[arg(short, long)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List files or directories under a workspace path
    List {
        /// Path to list (defaults to the workspace root)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Recurse into sub directories
        #[arg(short, long)]
        recursive: bool,

        /// List directories instead of files
        #[arg(short, long)]
        directories: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import external files or directories into a workspace directory
    Import {
        /// Destination directory inside the workspace
        destination: PathBuf,

        /// External files and/or directories to import
        #[arg(required = true)]
        sources: Vec<PathBuf>,

        /// How to handle destination collisions
        #[arg(long, value_enum, default_value = "fail")]
        on_conflict: ConflictPolicy,
    },

    /// Export a workspace directory to an external destination
    Export {
        /// Source directory inside the workspace
        source: PathBuf,

        /// External destination directory (created if missing)
        destination: PathBuf,

        /// How to handle destination collisions
        #[arg(long, value_enum, default_value = "fail")]
        on_conflict: ConflictPolicy,
    },

    /// Copy a workspace directory into another workspace directory
    Copy {
        /// Source directory inside the workspace
        source: PathBuf,

        /// Destination parent directory inside the workspace
        destination: PathBuf,

        /// How to handle destination collisions
        #[arg(long, value_enum, default_value = "fail")]
        on_conflict: ConflictPolicy,
    },

    /// Move a workspace file or directory to the trash
    Delete {
        /// Path to delete
        path: PathBuf,
    },

    /// Rename a workspace file or directory in place
    Rename {
        /// Path to rename
        path: PathBuf,

        /// The new name (a leaf name, not a path)
        new_name: String,
    },

    /// Move a workspace file or directory to a new path
    Move {
        /// Source path inside the workspace
        source: PathBuf,

        /// Full destination path inside the workspace
        destination: PathBuf,
    },

    /// Generate a collision-free name for a desired path
    UniqueName {
        /// Desired path
        path: PathBuf,
    },
}

/// Blanket conflict policy applied for the whole run.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum ConflictPolicy {
    /// Abort on the first collision
    #[default]
    Fail,
    /// Overwrite every colliding destination entry
    Overwrite,
    /// Copy colliding entries under generated unique names
    Rename,
}

impl ConflictPolicy {
    fn handler(self) -> Option<ConflictHandler> {
        match self {
            Self::Fail => None,
            Self::Overwrite => Some(Box::new(|_, _| ConflictDecision::OverwriteAll)),
            Self::Rename => Some(Box::new(|_, _| ConflictDecision::RenameAll)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = cli.root.canonicalize().context("Invalid workspace root")?;
    let service = WorkspaceService::new(WorkspaceConfig::new(&root))?;

    match cli.command {
        Command::List {
            path,
            recursive,
            directories,
            json,
        } => run_list(&service, &resolve(&root, path), recursive, directories, json),
        Command::Import {
            destination,
            sources,
            on_conflict,
        } => run_import(&service, sources, &resolve(&root, destination), on_conflict).await,
        Command::Export {
            source,
            destination,
            on_conflict,
        } => run_export(&service, &resolve(&root, source), &destination, on_conflict).await,
        Command::Copy {
            source,
            destination,
            on_conflict,
        } => {
            run_copy(
                &service,
                &resolve(&root, source),
                &resolve(&root, destination),
                on_conflict,
            )
            .await
        }
        Command::Delete { path } => run_delete(&service, &resolve(&root, path)).await,
        Command::Rename { path, new_name } => {
            let renamed = service.rename(&resolve(&root, path), &new_name)?;
            println!("{}", renamed.display());
            Ok(())
        }
        Command::Move {
            source,
            destination,
        } => {
            let source = resolve(&root, source);
            let destination = resolve(&root, destination);
            if source.is_dir() {
                service.move_directory(&source, &destination)?;
            } else {
                service.move_file(&source, &destination)?;
            }
            Ok(())
        }
        Command::UniqueName { path } => {
            println!("{}", service.generate_unique_name(&resolve(&root, path))?);
            Ok(())
        }
    }
}

/// Resolve a user-supplied path against the workspace root.
fn resolve(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

/// List files or directories.
fn run_list(
    service: &WorkspaceService,
    path: &Path,
    recursive: bool,
    directories: bool,
    json: bool,
) -> Result<()> {
    if directories {
        let entries = service.list_directories(path, recursive)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            for entry in &entries {
                println!("{}/", entry.path.display());
            }
            eprintln!("{} directories", entries.len());
        }
    } else {
        let entries = service.list_files(path, recursive)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            for entry in &entries {
                println!(
                    "{:>10}  {}",
                    humansize::format_size(entry.size, humansize::BINARY),
                    entry.path.display()
                );
            }
            eprintln!("{} files", entries.len());
        }
    }

    Ok(())
}

/// Import external items into the workspace.
async fn run_import(
    service: &WorkspaceService,
    sources: Vec<PathBuf>,
    destination: &Path,
    policy: ConflictPolicy,
) -> Result<()> {
    let options = copy_options(policy);
    let completed = service.import(&sources, destination, options).await?;

    if completed {
        eprintln!("Imported into {}", destination.display());
    } else {
        eprintln!("Import cancelled; destination rolled back");
    }
    Ok(())
}

/// Export a workspace directory.
async fn run_export(
    service: &WorkspaceService,
    source: &Path,
    destination: &Path,
    policy: ConflictPolicy,
) -> Result<()> {
    let options = copy_options(policy);
    let completed = service.export(source, destination, options).await?;

    if completed {
        eprintln!("Exported to {}", destination.display());
    } else {
        eprintln!("Export cancelled; destination rolled back");
    }
    Ok(())
}

/// Copy a directory inside the workspace.
async fn run_copy(
    service: &WorkspaceService,
    source: &Path,
    destination: &Path,
    policy: ConflictPolicy,
) -> Result<()> {
    let options = copy_options(policy);

    match service.copy_directory(source, destination, options).await? {
        Some(created) => eprintln!("Copied to {}", created.display()),
        None => eprintln!("Copy cancelled; destination rolled back"),
    }
    Ok(())
}

/// Delete a workspace entry to the trash.
async fn run_delete(service: &WorkspaceService, path: &Path) -> Result<()> {
    if path.is_dir() {
        let observer: atelier_ops::DeleteObserver =
            Box::new(|item: &Path| eprintln!("Deleting {}", item.display()));
        let deleted = service
            .delete_directory(path, Some(observer), cancel_on_ctrl_c())
            .await?;
        if deleted {
            eprintln!("Deleted {}", path.display());
        } else {
            eprintln!("Delete stopped; {} still exists", path.display());
        }
    } else {
        service.delete_file(path)?;
        eprintln!("Deleted {}", path.display());
    }
    Ok(())
}

/// Options shared by the copy-family subcommands.
fn copy_options(policy: ConflictPolicy) -> CopyOptions {
    CopyOptions {
        on_progress: Some(progress_printer()),
        on_conflict: policy.handler(),
        cancel: cancel_on_ctrl_c(),
        settle: None,
    }
}

/// Print item-level progress to stderr.
///
/// The engine reports before and after each item with the same counts; only
/// the first report per item is printed.
fn progress_printer() -> ProgressHandler {
    let last = std::sync::atomic::AtomicUsize::new(usize::MAX);
    Box::new(move |source: &Path, _dest: &Path, current: usize, total: usize| {
        if last.swap(current, std::sync::atomic::Ordering::Relaxed) != current {
            eprintln!("[{current}/{total}] {}", source.display());
        }
    })
}

/// A token cancelled by the first Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let handle = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });
    token
}
