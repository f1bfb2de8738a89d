mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "press-kit")]
#[command(version, about = "Press section builder and server with link-preview metadata", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize a new site directory
    Init {
        /// Path to the site directory
        path: PathBuf,

        /// Site name used in titles
        #[arg(long)]
        name: Option<String>,

        /// Canonical domain, e.g. https://www.example.com
        #[arg(long)]
        domain: Option<String>,
    },

    /// Validate site.toml and the press feed
    Validate {
        /// Path to the site directory
        path: PathBuf,
    },

    /// Write missing ids into the press feed
    AssignIds {
        /// Path to the site directory
        path: PathBuf,

        /// Show the ids without modifying the feed
        #[arg(long)]
        dry_run: bool,
    },

    /// Build the static site
    Build {
        /// Path to the site directory
        path: PathBuf,

        /// Output directory for generated site
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Serve the site with server-rendered press pages and crawler metadata
    Serve {
        /// Path to the site directory
        path: PathBuf,

        /// Serve a built output directory instead of the site's static/ tree
        #[arg(long)]
        root: Option<PathBuf>,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Origin for the network feed fallback (defaults to the canonical domain)
        #[arg(long)]
        origin: Option<String>,

        /// Reload open pages when site files change
        #[arg(long)]
        watch: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    match cli.command {
        Command::Init { path, name, domain } => commands::init::run(path, name, domain).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::AssignIds { path, dry_run } => commands::assign_ids::run(path, dry_run).await,
        Command::Build { path, output } => commands::build::run(path, output).await,
        Command::Serve {
            path,
            root,
            port,
            origin,
            watch,
        } => {
            commands::serve::run(commands::serve::ServeOptions {
                path,
                root,
                port,
                origin,
                watch,
            })
            .await
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "press-kit", &mut io::stdout());
            Ok(())
        }
    }
}
