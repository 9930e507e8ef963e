//! Cartola CLI - import bank statements into Notion
//!
//! ```bash
//! cartola serve                         # Start HTTP server (port 5000)
//! cartola parse cartola.xlsx            # Dump parsed transactions as JSON
//! cartola import cartola.xlsx           # Push a statement to Notion directly
//! ```

use cartola::{import_workbook, parse_workbook_file, NotionClient, TransactionSink};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "cartola")]
#[command(about = "Import bank statement spreadsheets into Notion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Directory with the built frontend
        #[arg(long, default_value = "frontend/dist")]
        static_dir: PathBuf,

        /// Don't serve static files
        #[arg(long)]
        no_static: bool,
    },

    /// Parse a statement and output its transactions as JSON
    Parse {
        /// Input .xlsx file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a statement into Notion
    Import {
        /// Input .xlsx file
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            port,
            static_dir,
            no_static,
        } => cmd_serve(port, (!no_static).then_some(static_dir)).await,

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Import { input } => cmd_import(&input).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(
    port: u16,
    static_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let sink: Arc<dyn TransactionSink> = Arc::new(NotionClient::from_env()?);
    cartola::server::start_server(port, static_dir, sink).await
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing statement: {}", input.display());

    let result = parse_workbook_file(input)?;

    eprintln!("   Sheet: {}", result.sheet_name);
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} transactions", result.transactions.len());

    let json = serde_json::to_string_pretty(&result.transactions)?;
    write_output(&json, output)?;

    Ok(())
}

async fn cmd_import(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Importing: {}", input.display());

    let client = NotionClient::from_env()?;
    eprintln!("   Database: {}", client.database_id());

    let bytes = fs::read(input)?;
    let summary = import_workbook(&bytes, &client).await?;

    eprintln!("\n✨ Done! {} pages created", summary.rows);
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
