use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli_exec;

#[derive(Parser)]
#[command(name = "cascade")]
#[command(about = "Folder-to-preset import settings manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a project (.cascade)
    Init {
        /// Re-initialize if .cascade already exists
        #[arg(long)]
        force: bool,
        /// Path to initialize (defaults to current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Bind a preset to a folder (paths relative to the project root)
    Bind { folder: PathBuf, preset: PathBuf },

    /// Remove a folder's binding
    Unbind { folder: PathBuf },

    /// Remove every binding for a folder
    UnbindAll { folder: PathBuf },

    /// List folder-preset bindings
    Bindings {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Exclude one preset property from a folder's binding
    Exclude { folder: PathBuf, property: String },

    /// Re-include a previously excluded property
    Include { folder: PathBuf, property: String },

    /// List project presets
    Presets {
        /// Only presets applicable to this asset's importer
        #[arg(long)]
        asset: Option<PathBuf>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which preset an asset resolves to, with inheritance
    Resolve {
        asset: PathBuf,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Apply resolved presets to every asset beneath a folder
    Apply { folder: PathBuf },

    /// Apply settings to assets whose import settings are missing
    Import {
        /// Folder to walk (defaults to the project root)
        path: Option<PathBuf>,
        /// Reapply even when settings already exist
        #[arg(long)]
        all: bool,
    },

    /// Prune bindings whose folder or preset no longer exists
    Validate,

    /// Move a file or folder, keeping stable identifiers
    Mv { from: PathBuf, to: PathBuf },
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Init { force, path } => cli_exec::handle_init_command(force, path),
        Commands::Bind { folder, preset } => cli_exec::handle_bind_command(folder, preset),
        Commands::Unbind { folder } => cli_exec::handle_unbind_command(folder),
        Commands::UnbindAll { folder } => cli_exec::handle_unbind_all_command(folder),
        Commands::Bindings { json } => cli_exec::handle_bindings_command(json),
        Commands::Exclude { folder, property } => {
            cli_exec::handle_exclude_command(folder, property, true)
        }
        Commands::Include { folder, property } => {
            cli_exec::handle_exclude_command(folder, property, false)
        }
        Commands::Presets { asset, json } => cli_exec::handle_presets_command(asset, json),
        Commands::Resolve { asset, json } => cli_exec::handle_resolve_command(asset, json),
        Commands::Apply { folder } => cli_exec::handle_apply_command(folder),
        Commands::Import { path, all } => cli_exec::handle_import_command(path, all),
        Commands::Validate => cli_exec::handle_validate_command(),
        Commands::Mv { from, to } => cli_exec::handle_mv_command(from, to),
    }
}
