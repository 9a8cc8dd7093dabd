//! Mailtriage CLI entry point.
//!
//! Reads one email from `--email`, `--email-file` or piped stdin, prints the
//! triage report, and optionally appends the row to a JSON-lines sink.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use mailtriage::analysis::segment::trim_space;
use mailtriage::config::AppConfig;
use mailtriage::credentials::load_credentials;
use mailtriage::logging;
use mailtriage::providers::router::ProviderChoice;
use mailtriage::report::{format_report_line, ReportRow};
use mailtriage::sink::{JsonlSink, RowSink};
use mailtriage::triage::TriageService;

/// Exit status when no email text was supplied.
const EXIT_NO_INPUT: u8 = 2;

/// Mailtriage: summarize and classify an email.
#[derive(Parser)]
#[command(name = "mailtriage", version, about)]
struct Cli {
    /// Model provider: openai, anthropic, mistral, or none for heuristics only.
    #[arg(long, value_parser = parse_choice)]
    provider: Option<String>,

    /// Model name override for the selected provider.
    #[arg(long)]
    model: Option<String>,

    /// Raw email content passed directly; takes precedence over --email-file.
    #[arg(long)]
    email: Option<String>,

    /// Path to a text file with raw email content.
    #[arg(long)]
    email_file: Option<PathBuf>,

    /// Config file path (default: ./mailtriage.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dotenv file with provider API keys (default from config: .env).
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Append the report row as a JSON line to this file.
    #[arg(long)]
    append_to: Option<PathBuf>,

    /// Print the canonical result as JSON instead of the report line.
    #[arg(long)]
    json: bool,
}

fn parse_choice(value: &str) -> Result<String, String> {
    value
        .parse::<ProviderChoice>()
        .map(|_| value.to_owned())
        .map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load_file(cli.config.as_deref()).context("failed to load configuration")?;

    let env_file = cli
        .env_file
        .clone()
        .unwrap_or_else(|| config.provider.credentials_path.clone());
    let credentials = load_credentials(&env_file).context("failed to load credentials")?;

    // Dotenv entries act as environment variables the process did not set.
    config.apply_overrides(|key| {
        std::env::var(key)
            .ok()
            .or_else(|| credentials.get(key).map(str::to_owned))
    });
    if let Some(provider) = &cli.provider {
        config.provider.name = provider.clone();
    }
    if let Some(model) = &cli.model {
        config.provider.models.set_all(model);
    }

    logging::init_cli(&config.logging.level);

    let email_text = read_email_text(&cli)?;
    if email_text.is_empty() {
        eprintln!("No email text provided. Use --email or --email-file or pipe input.");
        return Ok(ExitCode::from(EXIT_NO_INPUT));
    }

    let service = TriageService::from_config(&config.provider, &credentials);
    let result = service.analyze(&email_text).await;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("failed to encode result")?
        );
    } else {
        println!("{}", format_report_line(&result));
    }

    if let Some(path) = cli.append_to.or(config.sink.jsonl_path) {
        let row = ReportRow::from_result(&result);
        match JsonlSink::new(&path).and_then(|sink| sink.append(&row)) {
            Ok(()) => info!(path = %path.display(), "report row appended"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to append report row"),
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Read the email from the flag, the file, or piped stdin, trimmed.
///
/// An empty `--email` counts as absent and falls through to the file.
fn read_email_text(cli: &Cli) -> anyhow::Result<String> {
    let text = if let Some(email) = cli.email.as_ref().filter(|e| !e.is_empty()) {
        email.clone()
    } else if let Some(path) = &cli.email_file {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read email file {}", path.display()))?
    } else if !std::io::stdin().is_terminal() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read email from stdin")?;
        buf
    } else {
        String::new()
    };
    Ok(trim_space(&text).to_owned())
}
