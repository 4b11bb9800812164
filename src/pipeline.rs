//! Pipeline – drives certificate records through template filling and
//! rendering, one at a time.
//!
//! Every error is fatal: the first failing record ends the run and later
//! records are never attempted.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::batch::read_batch;
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::output::{ensure_output_dir, output_path_for};
use crate::record::CertificateRecord;
use crate::render::{render_to_pdf, PdfRenderer};
use crate::templates::Template;

/// What a successful batch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub generated: usize,
    pub output_dir: PathBuf,
    /// Artifact paths in the order they were written. May repeat when
    /// authors share a slug.
    pub paths: Vec<PathBuf>,
}

/// Certificate generator bound to one configuration and one renderer.
pub struct Generator<R> {
    config: GeneratorConfig,
    template: Template,
    renderer: R,
}

impl<R: PdfRenderer> Generator<R> {
    /// Load the template up front so a missing template aborts before any
    /// output is produced.
    pub fn new(config: GeneratorConfig, renderer: R) -> Result<Self> {
        let template = Template::load(&config)?;
        Ok(Self {
            config,
            template,
            renderer,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Generate a single certificate and return its path.
    pub fn generate_one(&self, record: &CertificateRecord, out: &mut dyn Write) -> Result<PathBuf> {
        ensure_output_dir(&self.config.output_dir)?;
        self.render_record(record, out)
    }

    /// Generate certificates for `records` in order, stopping at the first
    /// failure.
    pub fn generate_batch(
        &self,
        records: &[CertificateRecord],
        out: &mut dyn Write,
    ) -> Result<BatchSummary> {
        ensure_output_dir(&self.config.output_dir)?;

        let mut claimed: HashMap<PathBuf, &str> = HashMap::new();
        let mut paths = Vec::with_capacity(records.len());
        for record in records {
            let path = output_path_for(&self.config.output_dir, &record.author);
            if let Some(previous) = claimed.insert(path.clone(), &record.author) {
                log::warn!(
                    "'{}' and '{}' share {}; the later certificate replaces the earlier one",
                    previous,
                    record.author,
                    path.display()
                );
            }
            paths.push(self.render_record(record, out)?);
        }

        let summary = BatchSummary {
            generated: paths.len(),
            output_dir: self.config.output_dir.clone(),
            paths,
        };
        report(
            out,
            format_args!(
                "\nDone! {} certificate(s) in {}/",
                summary.generated,
                summary.output_dir.display()
            ),
        );
        Ok(summary)
    }

    /// Read `csv_path` and generate one certificate per row.
    ///
    /// The CSV is parsed completely first, so header errors leave the output
    /// directory untouched.
    pub fn generate_from_csv(&self, csv_path: &Path, out: &mut dyn Write) -> Result<BatchSummary> {
        let records = read_batch(csv_path)?;
        log::info!(
            "batch {}: {} record(s)",
            csv_path.display(),
            records.len()
        );
        self.generate_batch(&records, out)
    }

    /// Start → Filled → Rendered → Reported for one record.
    fn render_record(&self, record: &CertificateRecord, out: &mut dyn Write) -> Result<PathBuf> {
        let path = output_path_for(&self.config.output_dir, &record.author);
        report(
            out,
            format_args!("Generating: {} — {}", record.author, record.title),
        );

        let html = self.template.fill(record);
        render_to_pdf(&self.renderer, &html, &path)?;

        report(out, format_args!("  -> {}", path.display()));
        log::info!("wrote {}", path.display());
        Ok(path)
    }
}

/// Progress goes to the caller's sink; a broken sink is not worth aborting
/// a render over.
fn report(out: &mut dyn Write, line: std::fmt::Arguments<'_>) {
    if let Err(e) = writeln!(out, "{line}") {
        log::debug!("progress output failed: {e}");
    }
}

/// Convenience for callers that only hold a config: build a generator and
/// run one record through it.
pub fn generate_certificate<R: PdfRenderer>(
    config: GeneratorConfig,
    renderer: R,
    record: &CertificateRecord,
) -> Result<PathBuf> {
    Generator::new(config, renderer)?.generate_one(record, &mut std::io::sink())
}

impl<R> std::fmt::Debug for Generator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field("template", &self.template.path())
            .finish_non_exhaustive()
    }
}
