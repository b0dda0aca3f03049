// duoctl/src/main.rs

mod build;
mod commands;
mod image;
mod layout;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::layout::{Layout, Size};
use crate::utils::{LogLevel, set_log_level};

#[derive(Parser)]
#[command(name = "duoctl", version, about = "Two-level block filesystem image tool", long_about = None)]
struct Cli {
    /// Only print errors and requested output
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Print every operation
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an image file with an empty root directory
    Format {
        image: PathBuf,
        /// Image size (e.g. 5M, 512K)
        #[arg(short, long, default_value = "5M")]
        size: Size,
        /// Zero every data block too
        #[arg(long)]
        full: bool,
    },
    /// Build an image from layout.toml
    Build {
        /// Layout path
        #[arg(short, long, default_value = "layout.toml")]
        layout: PathBuf,
        /// Output path
        #[arg(short, long, default_value = "disk.img")]
        output: PathBuf,
        /// Only print what would be done, don't write the image
        #[arg(long)]
        dry_run: bool,
    },
    /// Show attributes of a path
    Stat { image: PathBuf, path: String },
    /// List a directory
    Ls {
        image: PathBuf,
        #[arg(default_value = "/")]
        path: String,
    },
    /// Create a directory under the root
    Mkdir { image: PathBuf, path: String },
    /// Remove an empty directory
    Rmdir { image: PathBuf, path: String },
    /// Create an empty file
    Touch { image: PathBuf, path: String },
    /// Remove a file
    Rm { image: PathBuf, path: String },
    /// Copy a host file into the image
    Put {
        image: PathBuf,
        host: PathBuf,
        path: String,
    },
    /// Print a file to stdout
    Cat { image: PathBuf, path: String },
    /// Shrink a file
    Truncate {
        image: PathBuf,
        path: String,
        size: u64,
    },
    /// Verify image consistency
    Check {
        image: PathBuf,
        /// Stop after the first failing phase
        #[arg(long)]
        fail_fast: bool,
    },
    /// Show geometry and usage
    Info { image: PathBuf },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Format { image, size, full } => commands::format(&image, size.bytes(), full),
        Commands::Build {
            layout,
            output,
            dry_run,
        } => {
            let layout = Layout::from_file(&layout)?;
            build::build(&layout, &output, dry_run)
        }
        Commands::Stat { image, path } => commands::stat(&image, &path),
        Commands::Ls { image, path } => commands::ls(&image, &path),
        Commands::Mkdir { image, path } => commands::mkdir(&image, &path),
        Commands::Rmdir { image, path } => commands::rmdir(&image, &path),
        Commands::Touch { image, path } => commands::touch(&image, &path),
        Commands::Rm { image, path } => commands::rm(&image, &path),
        Commands::Put { image, host, path } => commands::put(&image, &host, &path),
        Commands::Cat { image, path } => commands::cat(&image, &path),
        Commands::Truncate { image, path, size } => commands::truncate(&image, &path, size),
        Commands::Check { image, fail_fast } => commands::check(&image, fail_fast),
        Commands::Info { image } => commands::info(&image),
    }
}

fn main() {
    let cli = Cli::parse();
    set_log_level(if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    });

    if let Err(e) = run(cli) {
        log_error!("{e:#}");
        std::process::exit(1);
    }
}
