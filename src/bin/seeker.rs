//! Interactive search binary.

use std::path::PathBuf;

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use seeker::{HistoryFile, seeker_dirs};

/// Seeker: DuckDuckGo results through a forwarding proxy, one page at a time.
#[derive(Parser)]
#[command(name = "seeker", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Proxy URL, overriding the config file and `SEEKER_PROXY_URL`.
    #[arg(long)]
    proxy: Option<String>,

    /// Run this search before reading commands.
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never interleave with results on stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("seeker=info,seeker_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(seeker_dirs::config_file);
    let repl = seeker::open(&config_path, cli.proxy, HistoryFile::default_location())?;

    println!("Seeker v{}. Type `help` for commands.", env!("CARGO_PKG_VERSION"));

    if !cli.query.is_empty() {
        print!("{}", repl.run_query(&cli.query).await);
    }

    repl.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;
    println!();
    Ok(())
}
