use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tokmark::{annotate_document, AnnotatedDocument, AnnotationRequest, Envelope};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tokmark")]
#[command(version = "0.1.0")]
#[command(about = "Annotate tokenizer output with note and track ids", long_about = None)]
struct Args {
    /// Input request JSON, optionally gzip-compressed (reads from stdin if not specified)
    input: Option<PathBuf>,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the tokenizer named in the request
    #[arg(short, long)]
    tokenizer: Option<String>,

    /// Override the request's program-aware flag
    #[arg(long)]
    use_programs: Option<bool>,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,

    /// Log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let envelope = Envelope::from(run(&args));
    let success = envelope.success;
    if let Some(error) = &envelope.error {
        tracing::error!(%error, "annotation failed");
    }

    match write_envelope(&envelope, &args) {
        Ok(()) if success => ExitCode::SUCCESS,
        Ok(()) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "failed to write output");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> tokmark::error::Result<AnnotatedDocument> {
    let mut request = match &args.input {
        Some(path) => AnnotationRequest::from_path(path)?,
        None => AnnotationRequest::from_reader(io::stdin().lock())?,
    };

    if let Some(tokenizer) = &args.tokenizer {
        request.config.tokenizer = tokenizer.clone();
    }
    if let Some(use_programs) = args.use_programs {
        request.config.use_programs = use_programs;
    }

    annotate_document(request)
}

fn write_envelope(envelope: &Envelope<AnnotatedDocument>, args: &Args) -> tokmark::error::Result<()> {
    let json_string = if args.compact {
        serde_json::to_string(envelope)?
    } else {
        serde_json::to_string_pretty(envelope)?
    };

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}
