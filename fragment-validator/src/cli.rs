use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use fragment_validator::{
    ContentValidator, DEFAULT_MAX_FILE_SIZE, DiskFile, FsSourceConfig, ValidationConfig, Verdict,
    output, user_message, validate_fs,
};
use tracing_subscriber::EnvFilter;

pub const EXIT_ACCEPTED: i32 = 0;
pub const EXIT_REJECTED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "fragment-validator",
    version,
    about = "Validate fragment content against its declared media type"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also parse the text of uploaded JSON files
    #[arg(long, global = true)]
    pub validate_json_files: bool,

    /// Also run the CSV structure check on typed CSV content
    #[arg(long, global = true)]
    pub validate_csv_text: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a single piece of content
    Check {
        /// Declared media type, e.g. `text/markdown` or `image/png`
        #[arg(long = "type", value_name = "MEDIA_TYPE")]
        media_type: String,

        /// File to validate as an upload
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Typed content to validate
        #[arg(long, default_value = "")]
        text: String,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate every fragment file under the given paths
    Scan {
        /// Files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Glob patterns to exclude (repeatable)
        #[arg(long)]
        exclude: Vec<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Maximum size of a single file in bytes
        #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
        max_file_size: u64,

        /// Follow symbolic links (may leave the scan root)
        #[arg(long)]
        follow_links: bool,
    },
}

/// Parse arguments, run the command and return the process exit code.
pub async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = ValidationConfig::default();
    config.validate_json_files = cli.validate_json_files;
    config.validate_csv_text = cli.validate_csv_text;
    let validator = ContentValidator::new(config);

    match cli.command {
        Commands::Check {
            media_type,
            file,
            text,
            json,
        } => check(&validator, &media_type, file, &text, json).await,
        Commands::Scan {
            paths,
            exclude,
            json,
            max_file_size,
            follow_links,
        } => {
            let mut fs_config = FsSourceConfig::default();
            fs_config.paths = paths;
            fs_config.exclude = exclude;
            fs_config.limits.max_file_size = max_file_size;
            fs_config.follow_links = follow_links;
            scan(&validator, &fs_config, json).await
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

async fn check(
    validator: &ContentValidator,
    media_type: &str,
    file: Option<PathBuf>,
    text: &str,
    json: bool,
) -> Result<i32> {
    let upload = file.map(DiskFile::new);
    let result = validator.validate(media_type, text, upload.as_ref()).await;
    let message = user_message(&result);

    let code = match &result {
        Ok(Verdict::Accepted) => EXIT_ACCEPTED,
        Ok(Verdict::Rejected(_)) => EXIT_REJECTED,
        Err(_) => EXIT_ERROR,
    };

    if json {
        let body = serde_json::json!({
            "type": media_type,
            "accepted": code == EXIT_ACCEPTED,
            "message": message,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else if code == EXIT_ACCEPTED {
        println!("{} {media_type}", "\u{2713} accepted".green());
    } else {
        println!("{} {message}", "\u{2717}".red());
    }
    Ok(code)
}

async fn scan(validator: &ContentValidator, fs_config: &FsSourceConfig, json: bool) -> Result<i32> {
    let report = validate_fs(fs_config, validator).await?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        output::write_json(&report, &mut out)?;
    } else {
        output::write_human(&report, &mut out)?;
    }
    out.flush()?;

    Ok(if report.ok { EXIT_ACCEPTED } else { EXIT_REJECTED })
}
