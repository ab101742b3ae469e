//! Command-line front end for the jobmatch library.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use jobmatch::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "jobmatch",
    version,
    about = "Extract job postings and move CV files through text channels"
)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a job record from a saved HTML page
    Extract {
        /// URL the page was loaded from
        #[arg(long)]
        url: String,
        /// Saved HTML file
        html: PathBuf,
    },
    /// Encode a file as base64 text
    Encode {
        /// File to encode
        file: PathBuf,
        /// Print a data URL with this MIME type instead of bare text
        #[arg(long)]
        data_url: Option<String>,
    },
    /// Decode base64 text back into a file
    Decode {
        /// File holding the base64 text or data URL
        text: PathBuf,
        /// Where to write the decoded bytes
        #[arg(long)]
        out: PathBuf,
        /// Fail unless exactly this many bytes are decoded
        #[arg(long)]
        expected_len: Option<usize>,
    },
    /// Pair a job page with a CV and print the submission preview
    Assemble {
        /// URL the page was loaded from
        #[arg(long)]
        url: String,
        /// Saved HTML file
        html: PathBuf,
        /// CV file
        cv: PathBuf,
        /// MIME type of the CV
        #[arg(long, default_value = "application/pdf")]
        mime_type: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    if let Err(e) = init_logging(format) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<JobmatchError>() {
                Some(err) => error!(code = err.code(), hint = ?err.user_hint(), "{err}"),
                None => error!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => JobmatchConfig::from_file(path)?,
        None => JobmatchConfig::new(),
    };

    match cli.command {
        Command::Extract { url, html } => {
            let extraction = extract(&config, &url, &html).await?;
            println!("{}", serde_json::to_string_pretty(&extraction)?);
        }
        Command::Encode { file, data_url } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let blob = BinaryTextCodec::with_config(config.codec)
                .encode(&bytes)
                .map_err(JobmatchError::from)?;
            match data_url {
                Some(mime) => println!("{}", blob.to_data_url(&mime)),
                None => println!("{}", blob.encoded_text),
            }
        }
        Command::Decode {
            text,
            out,
            expected_len,
        } => {
            let encoded = tokio::fs::read_to_string(&text)
                .await
                .with_context(|| format!("reading {}", text.display()))?;
            let codec = BinaryTextCodec::with_config(config.codec);
            let bytes = match expected_len {
                Some(len) => codec.decode_blob(&EncodedBlob::new(len, encoded.trim())),
                None => codec.decode(&encoded),
            }
            .map_err(JobmatchError::from)?;
            tokio::fs::write(&out, &bytes)
                .await
                .with_context(|| format!("writing {}", out.display()))?;
            info!(bytes = bytes.len(), out = %out.display(), "Decoded file written");
        }
        Command::Assemble {
            url,
            html,
            cv,
            mime_type,
        } => {
            let extraction = extract(&config, &url, &html).await?;

            let store = Arc::new(MemoryStore::new(config.store.capacity_bytes));
            let library = CvLibrary::with_config(store, config.store.clone(), config.codec.clone());
            let source = FileByteSource::open(&cv, mime_type).await?;
            let stored = library.upload(&source).await?;
            let bytes = library.load_bytes(&stored.id).await?;

            let submission = RecordAssembler::with_config(config.submission)
                .assemble_transferred(
                    extraction.record,
                    bytes,
                    stored.size,
                    &stored.name,
                    &stored.mime_type,
                )
                .map_err(JobmatchError::from)?;

            let preview = json!({
                "strategy": extraction.strategy,
                "jobDetails": submission.job_details_json(),
                "parts": submission.multipart_fields(),
            });
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
    }
    Ok(())
}

async fn extract(config: &JobmatchConfig, url: &str, html: &Path) -> Result<Extraction> {
    let source = tokio::fs::read_to_string(html)
        .await
        .with_context(|| format!("reading {}", html.display()))?;
    let doc = HtmlDocument::parse(url, &source);
    let coordinator = ExtractionCoordinator::with_config(&config.extraction, Arc::new(SystemClock));
    Ok(coordinator.extract(&doc).map_err(JobmatchError::from)?)
}
