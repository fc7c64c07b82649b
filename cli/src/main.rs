use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::Parser;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use xsd2json_convert::{
    ConvertConfig, ConvertError, OutputFormat, convert_str, format_report,
};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "xsd2json", version = PACKAGE_VERSION)]
#[command(about = "Convert an XML Schema (XSD) file into a JSON Schema draft-04 file")]
struct Cli {
    /// XSD file to convert.
    #[arg(short = 'i', long = "in", value_name = "XSD")]
    input: PathBuf,
    /// JSON Schema file to write.
    #[arg(short = 'o', long = "out", value_name = "JSON")]
    output: PathBuf,
    /// Domain used as the base of `$id` (default: https://example.com).
    #[arg(short = 'd', long = "dom", value_name = "DOMAIN")]
    domain: Option<String>,
    /// YAML file with conversion settings.
    #[arg(long, value_name = "YAML")]
    config: Option<PathBuf>,
    /// Output format (overrides the config file).
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Also write a conversion report to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("failed to load config '{}': {source}", .path.display())]
    Config { path: PathBuf, source: ConvertError },
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to convert '{}': {source}", .path.display())]
    Convert { path: PathBuf, source: ConvertError },
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::Config { .. } => 1,
            Self::Read { .. } | Self::Write { .. } => 2,
            Self::Convert { .. } => 3,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) => ConvertConfig::load(path).map_err(|source| CliError::Config {
            path: path.clone(),
            source,
        })?,
        None => ConvertConfig::default(),
    };
    if let Some(domain) = cli.domain {
        config = config.with_domain(domain);
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    if config.generated_at.is_none() {
        config.generated_at = source_date_epoch()?;
    }
    let config = config.with_names(file_name(&cli.input), file_name(&cli.output));
    debug!(?config, "resolved configuration");

    let xsd = fs::read_to_string(&cli.input).map_err(|source| CliError::Read {
        path: cli.input.clone(),
        source,
    })?;
    let conversion = convert_str(&xsd, &config).map_err(|source| CliError::Convert {
        path: cli.input.clone(),
        source,
    })?;

    let text = conversion.render(&config).map_err(|source| CliError::Convert {
        path: cli.input.clone(),
        source,
    })?;
    write_file(&cli.output, &text)?;

    if let Some(path) = &cli.report {
        let report = format_report(&conversion.report, report_format(path))
            .map_err(|source| CliError::Convert {
                path: cli.input.clone(),
                source,
            })?;
        write_file(path, &report)?;
    }

    if conversion.diagnostics.is_empty() {
        info!("{}", conversion.report.summary());
    } else {
        warn!("{}", conversion.report.summary());
    }
    Ok(())
}

/// Reproducible builds pin the timestamp through `SOURCE_DATE_EPOCH`.
fn source_date_epoch() -> Result<Option<DateTime<Utc>>, CliError> {
    let Ok(value) = std::env::var("SOURCE_DATE_EPOCH") else {
        return Ok(None);
    };
    let invalid = || CliError::Usage(format!("invalid SOURCE_DATE_EPOCH '{value}'"));
    let seconds: i64 = value.trim().parse().map_err(|_| invalid())?;
    DateTime::from_timestamp(seconds, 0).map(Some).ok_or_else(invalid)
}

fn report_format(path: &Path) -> OutputFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => OutputFormat::Yaml,
        _ => OutputFormat::Json,
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_flags_parse() {
        let cli = Cli::try_parse_from([
            "xsd2json", "--in", "a/pain.xsd", "--out", "b/pain.json", "--dom", "https://x.org",
            "--format", "yaml",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("a/pain.xsd"));
        assert_eq!(cli.domain.as_deref(), Some("https://x.org"));
        assert_eq!(cli.format, Some(OutputFormat::Yaml));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_missing_output_is_usage_error() {
        let err = Cli::try_parse_from(["xsd2json", "--in", "a.xsd"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_file_name_strips_directories() {
        assert_eq!(file_name(Path::new("/tmp/out/pain.001.json")), "pain.001.json");
        assert_eq!(file_name(Path::new("schema.xsd")), "schema.xsd");
    }

    #[test]
    fn test_report_format_follows_extension() {
        assert_eq!(report_format(Path::new("r.yml")), OutputFormat::Yaml);
        assert_eq!(report_format(Path::new("r.json")), OutputFormat::Json);
        assert_eq!(report_format(Path::new("report")), OutputFormat::Json);
    }

    #[test]
    fn test_exit_codes_by_kind() {
        let io = || std::io::Error::other("boom");
        assert_eq!(CliError::Usage(String::new()).exit_code(), 1);
        assert_eq!(
            CliError::Read { path: PathBuf::new(), source: io() }.exit_code(),
            2
        );
        assert_eq!(
            CliError::Convert {
                path: PathBuf::new(),
                source: ConvertError::Xml { position: 0, message: String::new() },
            }
            .exit_code(),
            3
        );
    }
}
