//! # certgen – Template-driven publication certificates
//!
//! Fills an HTML certificate template with article metadata and hands the
//! result to an external HTML → PDF renderer. The pipeline stages are:
//!
//! 1. **Read** – CLI fields or a CSV batch → [`record::CertificateRecord`]s ([`batch`])
//! 2. **Fill** – substitute placeholders, resolve assets ([`templates`])
//! 3. **Name** – derive `certificate-<slug>.pdf` ([`slug`], [`output`])
//! 4. **Render** – run the external renderer on a temporary HTML file ([`render`])
//!
//! [`pipeline::Generator`] ties the stages together. Processing is strictly
//! sequential and the first error aborts the run.

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod slug;
pub mod templates;

// Re-exports for convenience
pub use config::{GeneratorConfig, RendererConfig};
pub use error::CertError;
pub use pipeline::{generate_certificate, BatchSummary, Generator};
pub use record::CertificateRecord;
pub use render::{CommandRenderer, NoopRenderer, PdfRenderer};
pub use slug::slugify;
