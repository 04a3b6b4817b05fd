//! CLI entry point for broker-press

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use broker_press::commands::{self, list::ListFilter, new::NewPostOptions};
use broker_press::Site;

#[derive(Parser)]
#[command(name = "broker-press")]
#[command(version)]
#[command(about = "Builds an insurance brokerage's marketing site and Markdown blog", long_about = None)]
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
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new blog post
    New {
        /// Title of the new post
        title: String,

        /// File name to use instead of one derived from the title
        #[arg(short, long)]
        slug: Option<String>,

        /// Mark the post as featured
        #[arg(short, long)]
        featured: bool,

        /// Post category (defaults to blog.default_category)
        #[arg(short = 'C', long)]
        category: Option<String>,

        /// Tag to add; repeat for several
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,

        /// Include draft posts
        #[arg(long)]
        drafts: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Delete the generated output
    Clean,

    /// List blog content
    List {
        /// Type of content to list (posts, featured, tags, categories)
        #[arg(default_value = "posts")]
        r#type: String,

        /// Only posts with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only posts in this category
        #[arg(short = 'C', long)]
        category: Option<String>,
    },

    /// Show one post's metadata
    Show {
        /// Post slug (file name without extension)
        slug: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "broker_press=debug,info"
    } else {
        "broker_press=info"
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
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            commands::init::init_site(&target_dir)?;
            println!("Initialized new site in {:?}", target_dir);
        }

        Commands::New {
            title,
            slug,
            featured,
            category,
            tags,
        } => {
            let site = Site::new(&base_dir)?;
            let options = NewPostOptions {
                slug,
                featured,
                category,
                tags,
            };
            let path = commands::new::create_post(&site, &title, &options)?;
            println!("Created: {:?}", path);
        }

        Commands::Generate { watch, drafts } => {
            let mut site = Site::new(&base_dir)?;
            if drafts {
                site.config.blog.render_drafts = true;
            }
            tracing::info!("Generating static files...");

            site.generate()?;
            println!("Generated successfully!");

            if watch {
                tracing::info!("Watching for file changes...");
                commands::generate::watch(&site).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let site = Site::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            site.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            broker_press::server::start(&site, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let site = Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List {
            r#type,
            tag,
            category,
        } => {
            let site = Site::new(&base_dir)?;
            commands::list::run(&site, &r#type, &ListFilter { tag, category })?;
        }

        Commands::Show { slug } => {
            let site = Site::new(&base_dir)?;
            commands::show::run(&site, &slug)?;
        }

        Commands::Version => {
            println!("broker-press version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
