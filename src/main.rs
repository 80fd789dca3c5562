//! CLI entry point for ekkos-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ekkos-blog")]
#[command(version)]
#[command(about = "Markdown blog content engine with scheduled publishing", long_about = None)]
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
    /// List posts or tags
    List {
        /// What to list (post, all, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only posts carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Print a single post, drafts included
    Show {
        /// Slug of the post (file name without extension)
        slug: String,

        /// Render the body to HTML
        #[arg(long)]
        html: bool,
    },

    /// Show drafts, scheduled and published posts
    Preview,

    /// Serve the posts as a JSON API
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to the configured address)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "ekkos_blog=debug,info"
    } else {
        "ekkos_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List { r#type, tag } => {
            let blog = ekkos_blog::Blog::new(&base_dir)?;
            ekkos_blog::commands::list::run(&blog, &r#type, tag.as_deref())?;
        }

        Commands::Show { slug, html } => {
            let blog = ekkos_blog::Blog::new(&base_dir)?;
            ekkos_blog::commands::show::run(&blog, &slug, html)?;
        }

        Commands::Preview => {
            let blog = ekkos_blog::Blog::new(&base_dir)?;
            ekkos_blog::commands::preview::run(&blog)?;
        }

        Commands::Serve { port, ip } => {
            let blog = ekkos_blog::Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            ekkos_blog::server::start(&blog, &ip, port).await?;
        }

        Commands::Version => {
            println!("ekkos-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
