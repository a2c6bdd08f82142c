//! `pubfeed` — render social-feed timestamps and scroll paged feed fixtures.
//!
//! Exercises the relative-time formatter and the infinite-scroll loader
//! from the command line.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pubfeed CLI tool.
#[derive(Parser, Debug)]
#[command(name = "pubfeed", about = "Feed formatting and infinite-scroll playground")]
struct Cli {
    /// Path to config file (default: ~/.pubfeed/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    /// Locale override (en, zh-CN, ja, es).
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Format a timestamp relative to now.
    Ago {
        /// RFC 3339 timestamp (e.g. 2024-02-15T14:30:00Z).
        timestamp: String,
        /// Reference instant (default: the current time).
        #[arg(long)]
        now: Option<String>,
    },

    /// Scroll through a JSON fixture of feed pages.
    Feed {
        /// Pages file.
        #[arg(short = 'f', long = "file")]
        file: String,
        /// Reference instant (default: the current time).
        #[arg(long)]
        now: Option<String>,
        /// Show replies alongside top-level posts.
        #[arg(long)]
        include_replies: bool,
        /// Stop after this many pages.
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Format an integer with thousands separators.
    Number {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },

    /// Show version.
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(config::FeedConfig::default_path);
    let mut config = config::FeedConfig::load(&config_path)?;
    if let Some(locale) = cli.locale {
        config.locale = locale;
        config.validate()?;
    }

    let json_output = match cli.output.as_str() {
        "json" => true,
        "table" => false,
        other => anyhow::bail!("Unknown output format: {} (expected table or json).", other),
    };

    match cli.command {
        Commands::Ago { timestamp, now } => {
            commands::format::ago(&timestamp, now.as_deref(), &config, json_output)?;
        }

        Commands::Feed {
            file,
            now,
            include_replies,
            max_pages,
        } => {
            let file = PathBuf::from(file);
            let args = commands::feed::FeedArgs {
                file: &file,
                now: now.as_deref(),
                include_replies,
                max_pages,
                json: json_output,
            };
            commands::feed::run(args, &config).await?;
        }

        Commands::Number { value } => {
            commands::format::number(value, json_output)?;
        }

        Commands::Version => {
            println!("pubfeed v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
