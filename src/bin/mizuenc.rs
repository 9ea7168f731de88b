//! Mizuenc CLI - Password-based token encryption
//!
//! Command-line interface for turning a string into an AES-256-GCM token
//! (PBKDF2-derived key) and back.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::process;
use tracing_subscriber::EnvFilter;

use mizuenc::{Encrypter, default_encrypter};

#[derive(Parser)]
#[command(name = "mizuenc")]
#[command(version)]
#[command(about = "Encrypt/decrypt data with AES-256-GCM (PBKDF2-derived key).", long_about = None)]
struct Cli {
    /// Log progress to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a string and print the token
    #[command(alias = "e")]
    Encrypt {
        /// Text to encrypt
        #[arg(value_name = "PLAINTEXT")]
        plaintext: String,
    },

    /// Decrypt a token and print the plaintext
    #[command(alias = "d")]
    Decrypt {
        /// Token previously printed by `mizuenc encrypt`
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    let encrypter = default_encrypter();

    match command {
        Commands::Encrypt { plaintext } => {
            if plaintext.is_empty() {
                bail!("missing plaintext argument");
            }
            let token = encrypter.encrypt(plaintext.as_bytes())?;
            println!("{}", token);
        }
        Commands::Decrypt { token } => {
            if token.is_empty() {
                bail!("missing token argument");
            }
            let plaintext = encrypter.decrypt(&token)?;
            // Plaintext is arbitrary bytes, not necessarily UTF-8.
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&plaintext)
                .context("failed to write plaintext")?;
            stdout.write_all(b"\n").context("failed to write plaintext")?;
            stdout.flush().context("failed to flush stdout")?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
