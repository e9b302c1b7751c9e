//! examforge CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "examforge", version, about = "Exam variant generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate exam variants
    Generate {
        /// Path to a .toml question bank or a directory of banks
        #[arg(long)]
        bank: PathBuf,

        /// Exam config file path
        #[arg(long, default_value = "examforge.toml")]
        config: PathBuf,

        /// Output directory
        #[arg(long, default_value = "./examforge-output")]
        output: PathBuf,

        /// Output format: markdown, html, json, all
        #[arg(long, default_value = "markdown")]
        format: String,

        /// Base seed (overrides the config)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of variants (overrides the config)
        #[arg(long)]
        variants: Option<usize>,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create starter config and example question bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examforge=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            bank,
            config,
            output,
            format,
            seed,
            variants,
        } => commands::generate::execute(bank, config, output, format, seed, variants),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
