use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use category_tree::bot::{CommandRouter, Reply};
use category_tree::config::Config;
use category_tree::models::{OwnerId, TableRow};
use category_tree::tree::CategoryTree;
use category_tree::{api, mcp};

#[derive(Parser)]
#[command(name = "ctree")]
#[command(about = "Per-chat category trees with tabular import and export")]
struct Cli {
    /// Database file (overrides CATEGORY_TREE_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Port for HTTP API (overrides CATEGORY_TREE_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Start MCP server via stdio
    Mcp,
    /// Run one chat command, e.g. `ctree exec 42 /addElement Fruit`
    Exec {
        owner: OwnerId,
        /// Command text; words are joined with single spaces
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Write an owner's tree as JSON table rows
    Export {
        owner: OwnerId,
        /// Output file; stdout when omitted
        output: Option<PathBuf>,
    },
    /// Import JSON table rows into an owner's tree
    Import { owner: OwnerId, file: PathBuf },
}

/// Initialize tracing with output to stderr (for MCP and CLI modes) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "category_tree=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // stdout carries protocol frames or command output
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let db = config.open_database()?;
    let app = api::create_router(CommandRouter::new(CategoryTree::new(db)));

    let addr = std::net::SocketAddr::new(config.host, config.port);
    tracing::info!("Starting category tree server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Category tree server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let mut config = Config::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = Some(db);
    }

    match cli.command {
        Some(Commands::Serve { port }) => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(&config).await?;
        }
        Some(Commands::Mcp) => {
            let tree = CategoryTree::new(config.open_database()?);
            mcp::run_stdio_server(tree).await?;
        }
        Some(Commands::Exec { owner, text }) => {
            let tree = CategoryTree::new(config.open_database()?);
            let router = CommandRouter::new(tree);
            match router.handle_text(owner, &text.join(" ")) {
                Reply::Text { text } => println!("{}", text),
                Reply::Document { rows, .. } => {
                    println!("{}", serde_json::to_string_pretty(&rows)?)
                }
            }
        }
        Some(Commands::Export { owner, output }) => {
            let tree = CategoryTree::new(config.open_database()?);
            let rows = tree.export(owner)?;
            let json = serde_json::to_string_pretty(&rows)?;
            match output {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{}", json),
            }
        }
        Some(Commands::Import { owner, file }) => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let rows: Vec<TableRow> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", file.display()))?;

            let tree = CategoryTree::new(config.open_database()?);
            println!("{}", tree.import(owner, rows)?);
        }
        None => serve(&config).await?,
    }

    Ok(())
}
