//! Operator CLI for KeyForge.

mod output;

use std::{fs, path::PathBuf};

use clap::Parser;
use eyre::{bail, WrapErr};
use keyforge_core::{
    generate_accounts, generate_session_keys, LabelConfig, MasterPhrase,
    SessionBackend, SubkeyTool,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate keys for technical accounts as well as session keys from a
/// given mnemonic.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// The core mnemonic phrase from which the keys will be derived
    #[arg(short, long, env = "KEYFORGE_MNEMONIC", hide_env_values = true)]
    mnemonic: String,

    /// Don't print the derived keys to stdout
    #[arg(short, long)]
    quiet: bool,

    /// If set, generate a .env file with all the variables at the provided
    /// path
    #[arg(short, long)]
    envfile: Option<PathBuf>,

    /// JSON file overriding the built-in account and session-key label
    /// tables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Derive session keys by invoking this subkey-compatible binary
    /// instead of the embedded implementation
    #[arg(long, value_name = "BINARY")]
    subkey: Option<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // reject absent input before any derivation begins
    let phrase = MasterPhrase::new(cli.mnemonic)?;

    let config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .wrap_err_with(|| format!("failed to parse {}", path.display()))?
        }
        None => LabelConfig::default(),
    };

    let backend = cli.subkey.map_or(SessionBackend::Embedded, |binary| {
        SessionBackend::External(SubkeyTool::new(binary))
    });

    let accounts = generate_accounts(&phrase, &config.accounts);
    if !cli.quiet {
        output::print_accounts(&accounts.records);
    }

    let session_keys =
        generate_session_keys(&phrase, &config.session_accounts, &backend).await;
    if !cli.quiet {
        output::print_session_keys(&session_keys.records);
    }

    if let Some(path) = &cli.envfile {
        output::write_dotenv(&accounts.records, &session_keys.records, path)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote env file");
    }

    let failed = accounts.failures.len() + session_keys.failures.len();
    if failed > 0 {
        for failure in accounts.failures.iter().chain(&session_keys.failures) {
            eprintln!("error: `{}`: {}", failure.label, failure.error);
        }
        bail!("{failed} label(s) failed; the results above are complete for the rest");
    }

    Ok(())
}
