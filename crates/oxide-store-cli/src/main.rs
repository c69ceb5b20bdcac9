//! oxide-store CLI
//!
//! Renders vendor-specific SQL for a chosen database vendor and version.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oxide_store_core::dialect::SequenceOptions;
use oxide_store_core::{DialectProfile, ProfileConfig};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

/// Vendor-specific SQL rendering.
#[derive(Parser)]
#[command(name = "oxide-store")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database vendor (postgresql, mysql, sqlite, mssql, oracle, derby, h2, db2).
    #[arg(long, env = "OXIDE_STORE_VENDOR", default_value = "generic")]
    vendor: String,

    /// Server version; the vendor default when not specified.
    #[arg(long)]
    db_version: Option<String>,

    /// Capability keys to force on.
    #[arg(long, value_delimiter = ',')]
    enable: Vec<String>,

    /// Capability keys to force off.
    #[arg(long, value_delimiter = ',')]
    disable: Vec<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the row-range clause.
    Paginate {
        #[arg(long, default_value_t = 0)]
        offset: i64,

        #[arg(long, default_value_t = 0)]
        count: i64,

        /// The statement already has an ORDER BY.
        #[arg(long)]
        ordered: bool,
    },

    /// Print CREATE SEQUENCE.
    Sequence {
        #[arg(long)]
        name: String,

        #[arg(long)]
        start: Option<i64>,

        #[arg(long)]
        increment: Option<i64>,

        #[arg(long)]
        min: Option<i64>,

        #[arg(long)]
        max: Option<i64>,

        #[arg(long)]
        cache: Option<i64>,

        /// Also print the statement reading the next value.
        #[arg(long)]
        next: bool,
    },

    /// Print table and sequence DDL for a JSON schema file.
    Ddl {
        #[arg(short, long)]
        schema: PathBuf,

        /// Print DROP statements instead.
        #[arg(long)]
        drop: bool,
    },

    /// Show logical to SQL type mappings.
    Types {
        /// Only this logical type.
        #[arg(long)]
        logical: Option<String>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Check words against the vendor's reserved keywords.
    Keywords {
        #[arg(required = true)]
        words: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ProfileConfig {
        vendor: cli.vendor,
        version: cli.db_version,
        enable: cli.enable,
        disable: cli.disable,
    };
    let profile = DialectProfile::from_config(&config)?;
    debug!(
        vendor = %profile.vendor(),
        version = %profile.version(),
        capabilities = profile.capabilities().len(),
        "built dialect profile"
    );

    match cli.command {
        Commands::Paginate {
            offset,
            count,
            ordered,
        } => {
            println!("{}", commands::paginate(&profile, offset, count, ordered));
        }

        Commands::Sequence {
            name,
            start,
            increment,
            min,
            max,
            cache,
            next,
        } => {
            let options = SequenceOptions {
                start,
                increment,
                min,
                max,
                cache,
                ..SequenceOptions::named(name)
            };
            for sql in commands::sequence(&profile, &options, next)? {
                println!("{sql};");
            }
        }

        Commands::Ddl { schema, drop } => {
            let schema = commands::load_schema(&schema)?;
            for sql in commands::ddl(&profile, &schema, drop)? {
                println!("{sql};");
                println!();
            }
        }

        Commands::Types { logical, json } => {
            let reports = commands::types(&profile, logical.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    println!("{}", report.line());
                }
            }
        }

        Commands::Keywords { words } => {
            for line in commands::keywords(&profile, &words) {
                println!("{line}");
            }
        }
    }

    Ok(())
}
