//! CLI entry point for hiyah

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hiyah")]
#[command(version)]
#[command(about = "Site engine for a martial-arts school's news and newsletter pages", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch site data and render the static pages
    #[command(alias = "b")]
    Build,

    /// Start a local preview server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Create a new post file and register it in the post index
    New {
        /// Title of the new post
        title: String,

        /// Publication date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Tags to attach to the post (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,

        /// Short summary shown while the post is collapsed
        #[arg(long)]
        summary: Option<String>,
    },

    /// List site content (post, tag, newsletter)
    List {
        /// Type of content to list
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Clean the public folder
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "hiyah=debug,info"
    } else {
        "hiyah=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli.cwd.unwrap_or_else(|| std::env::current_dir().unwrap());

    match cli.command {
        Commands::Build => {
            let site = hiyah::Site::new(&base_dir)?;
            tracing::info!("Building static pages...");
            site.build().await?;
            println!("Generated successfully!");
        }

        Commands::Serve { port, ip } => {
            let site = hiyah::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            hiyah::server::start(&site, &ip, port).await?;
        }

        Commands::New {
            title,
            date,
            tag,
            summary,
        } => {
            let site = hiyah::Site::new(&base_dir)?;
            tracing::info!("Creating new post: {}", title);
            hiyah::commands::new::run(&site, &title, date.as_deref(), &tag, summary.as_deref())?;
        }

        Commands::List { r#type } => {
            let site = hiyah::Site::new(&base_dir)?;
            hiyah::commands::list::run(&site, &r#type).await?;
        }

        Commands::Clean => {
            let site = hiyah::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }
    }

    Ok(())
}
