//! pagestamp CLI - stamps per-industry landing pages from one template.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "pagestamp")]
#[command(about = "Generate service landing pages, sitemap and robots.txt from a template")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to site.toml config file
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter site.toml, services.json and index.html
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate service pages, sitemap.xml and robots.txt
    Build {
        /// Output directory (defaults to config or ".")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail on any template or record warning
        #[arg(long)]
        strict: bool,
    },

    /// Serve generated pages and rebuild when inputs change
    Dev {
        /// Port to listen on
        #[arg(short, long, default_value = "7777")]
        port: u16,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Preview an already generated site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to config output)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Replace mojibake and stray characters in generated pages
    Clean {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes).await?;
        }
        Commands::Build { output, strict } => {
            commands::build::run(&cli.config, output, strict).await?;
        }
        Commands::Dev { port, no_open } => {
            commands::dev::run(&cli.config, port, !no_open).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(&cli.config, port, dir, !no_open).await?;
        }
        Commands::Clean { dry_run } => {
            commands::clean::run(&cli.config, dry_run).await?;
        }
    }

    Ok(())
}
