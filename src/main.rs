//! HashPDF command line
//!
//! Seal a file (hash it and print a verification link) or verify a received
//! file against a digest or a verification link.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hashpdf::format::format_file_size;
use hashpdf::hashing::{FileSource, Phase};
use hashpdf::link::ShareTargets;
use hashpdf::verify::{verify_source, VerifyError};
use hashpdf::{
    compute_digest, decode_url, ByteSource, Config, Outcome, Progress, VerificationRequest,
};

#[derive(Parser)]
#[command(name = "hashpdf", version, about = "Client-side document integrity checks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a file and print a verification link to share with the recipient
    Seal {
        /// File to seal
        file: PathBuf,

        /// Page that opens verification links (overrides HASHPDF_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a received file against the sender's digest
    Verify {
        /// File to verify
        file: PathBuf,

        /// Expected SHA-256 digest (hex)
        #[arg(long, conflicts_with = "link")]
        expected: Option<String>,

        /// Verification link received from the sender
        #[arg(long)]
        link: Option<String>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SealReport {
    file_name: Option<String>,
    file_size: u64,
    digest: String,
    link: String,
    message: String,
    share: ShareTargets,
}

const EXIT_SUCCESS: u8 = 0;

/// The file does not match the expected digest
const EXIT_MISMATCH: u8 = 1;

/// No usable expected digest (missing, malformed, or not a verification link)
const EXIT_BAD_INPUT: u8 = 2;

/// Progress line on stderr for an interactive terminal
fn progress_line(label: &'static str) -> impl FnMut(Progress) -> anyhow::Result<()> + Send {
    move |progress: Progress| {
        let status = match progress.phase() {
            Phase::Reading => format!("Reading file... {}", progress),
            Phase::Digesting => "Computing SHA-256 hash...".to_string(),
            Phase::Done => format!("{}\n", label),
        };
        let mut stderr = std::io::stderr().lock();
        write!(stderr, "\r\x1b[2K{}", status)?;
        stderr.flush()?;
        Ok(())
    }
}

async fn seal(
    config: &Config,
    file: PathBuf,
    base_url: Option<String>,
    json: bool,
) -> Result<u8> {
    let source = FileSource::open(&file)
        .await
        .with_context(|| format!("failed to open file: {}", file.display()))?;
    let file_name = source.file_name();

    let mut observer = progress_line("Done!");
    let digest = compute_digest(&source, &config.hash_options(), Some(&mut observer))
        .await
        .with_context(|| format!("failed to hash file: {}", file.display()))?;

    let base_url = base_url.unwrap_or_else(|| config.base_url.clone());
    let request = VerificationRequest::new(digest, file_name.clone());
    let encoded = request.encode(&base_url);
    let share = ShareTargets::new(&encoded, file_name.as_deref());

    if json {
        let report = SealReport {
            file_name,
            file_size: source.len(),
            digest: request.digest.to_string(),
            link: encoded.link,
            message: encoded.message,
            share,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("File:     {} ({})", file.display(), format_file_size(source.len()));
        println!("SHA-256:  {}", request.digest);
        println!("Link:     {}", encoded.link);
        println!();
        println!("{}", encoded.message);
        println!();
        println!("WhatsApp: {}", share.whatsapp);
        println!("Telegram: {}", share.telegram);
        println!("Email:    {}", share.email);
    }

    Ok(EXIT_SUCCESS)
}

async fn verify(
    config: &Config,
    file: PathBuf,
    expected: Option<String>,
    link: Option<String>,
) -> Result<u8> {
    let expected = match (expected, link) {
        (Some(expected), _) => Some(expected),
        (None, Some(link)) => match decode_url(&link) {
            Some(decoded) => {
                if let Some(name) = &decoded.filename {
                    eprintln!("Hash loaded for: {}", name);
                }
                decoded.digest
            }
            None => {
                eprintln!("Not a verification link: {}", link);
                return Ok(EXIT_BAD_INPUT);
            }
        },
        (None, None) => None,
    };

    let source = FileSource::open(&file)
        .await
        .with_context(|| format!("failed to open file: {}", file.display()))?;
    eprintln!("File: {} ({})", file.display(), format_file_size(source.len()));

    let mut observer = progress_line("Comparing...");
    let result = verify_source(
        expected.as_deref(),
        &source,
        &config.hash_options(),
        Some(&mut observer),
    )
    .await
    .map_err(hashpdf::Error::from);

    match result {
        Ok(result) if result.outcome == Outcome::Match => {
            println!("Integrity Verified");
            println!("This file is identical to the original.");
            println!("SHA-256:  {}", result.computed);
            Ok(EXIT_SUCCESS)
        }
        Ok(result) => {
            println!("Integrity Check Failed");
            println!("This file does NOT match the original.");
            println!("Expected: {}", result.expected);
            println!("Got:      {}", result.computed);
            Ok(EXIT_MISMATCH)
        }
        Err(e) if e.is_user_input() => {
            eprintln!("{}", bad_input_hint(&e));
            Ok(EXIT_BAD_INPUT)
        }
        Err(e) => Err(e).with_context(|| format!("failed to hash file: {}", file.display())),
    }
}

fn bad_input_hint(error: &hashpdf::Error) -> String {
    match error {
        hashpdf::Error::Verify(VerifyError::MissingExpectedDigest) => {
            "No expected hash provided: pass --expected or --link".to_string()
        }
        hashpdf::Error::Verify(VerifyError::MalformedExpectedDigest(value)) => {
            format!("Expected hash {:?} is not a 64-character hex SHA-256 digest", value)
        }
        other => other.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hashpdf=info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env().context("invalid configuration")?;
    tracing::debug!(
        base_url = %config.base_url,
        chunk_size = config.chunk_size,
        timeout_secs = ?config.timeout_secs,
        "Loaded configuration"
    );

    let code = match cli.command {
        Commands::Seal { file, base_url, json } => seal(&config, file, base_url, json).await?,
        Commands::Verify { file, expected, link } => verify(&config, file, expected, link).await?,
    };
    Ok(ExitCode::from(code))
}
