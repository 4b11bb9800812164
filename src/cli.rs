//! Command-line parsing for the `certgen` binary.

use std::path::PathBuf;

use thiserror::Error;

use crate::record::CertificateRecord;

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// `--csv <path>`; wins over single-record flags.
    Batch(PathBuf),
    /// `--title` and `--author` (plus optional fields).
    Single(CertificateRecord),
    /// Nothing usable was supplied.
    Usage,
}

/// Parsed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub mode: Mode,
    pub config: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub help: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    #[error("Unknown flag: {0}")]
    UnknownFlag(String),
    #[error("Missing value for {0}")]
    MissingValue(String),
    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

/// Parse the arguments that follow the program name.
pub fn parse_args<I, S>(args: I) -> Result<Cli, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut csv = None;
    let mut title = None;
    let mut author = None;
    let mut received = None;
    let mut published = None;
    let mut doi = None;
    let mut config = None;
    let mut assets_dir = None;
    let mut output_dir = None;
    let mut dry_run = false;
    let mut help = false;

    let mut iter = args.into_iter().map(Into::<String>::into);
    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .ok_or_else(|| CliError::MissingValue(arg.clone()))
        };
        match arg.as_str() {
            "--csv" => csv = Some(PathBuf::from(value()?)),
            "--title" => title = Some(value()?),
            "--author" => author = Some(value()?),
            "--received" => received = Some(value()?),
            "--published" => published = Some(value()?),
            "--doi" => doi = Some(value()?),
            "--config" => config = Some(PathBuf::from(value()?)),
            "--assets-dir" => assets_dir = Some(PathBuf::from(value()?)),
            "--output-dir" | "-o" => output_dir = Some(PathBuf::from(value()?)),
            "--dry-run" => dry_run = true,
            "--help" | "-h" => help = true,
            other if other.starts_with('-') => {
                return Err(CliError::UnknownFlag(other.to_string()))
            }
            other => return Err(CliError::UnexpectedArgument(other.to_string())),
        }
    }

    let non_empty = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
    let mode = match (csv, non_empty(&title) && non_empty(&author)) {
        (Some(path), _) => Mode::Batch(path),
        (None, true) => Mode::Single(CertificateRecord::with_defaults(
            title.unwrap_or_default(),
            author.unwrap_or_default(),
            received.filter(|s| !s.is_empty()),
            published.filter(|s| !s.is_empty()),
            doi.filter(|s| !s.is_empty()),
        )),
        (None, false) => Mode::Usage,
    };

    Ok(Cli {
        mode,
        config,
        assets_dir,
        output_dir,
        dry_run,
        help,
    })
}

pub fn usage(prog: &str) -> String {
    format!(
        "certgen – publication certificate generator

Usage:
  {prog} --title <TITLE> --author <AUTHOR> [--received <DATE>] [--published <DATE>] [--doi <DOI>]
  {prog} --csv <FILE>

Options:
  --csv <FILE>          Batch mode: one certificate per CSV row
                        (columns: title, author, received, published, doi)
  --title, --author     Single-certificate mode; omitted dates and DOI become \"TBD\"
  --config <FILE>       Load generator settings from a JSON file
  --assets-dir <DIR>    Directory holding template.html, signature.svg, Amsterdam.ttf
                        and the renderer script (default: current directory)
  --output-dir, -o      Destination for generated PDFs (default: output)
  --dry-run             Fill templates but skip the external renderer
  --help, -h            Print this message

Example:
  {prog} --title \"My Article\" --author \"John Doe\" \\
    --received \"Jan 1, 2026\" --published \"Feb 1, 2026\" --doi \"10.xxx/air.001\""
    )
}
