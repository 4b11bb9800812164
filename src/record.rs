//! The per-certificate metadata record.

use serde::{Deserialize, Serialize};

/// Placeholder used for optional fields omitted in single-record mode.
pub const DEFAULT_FIELD: &str = "TBD";

/// One certificate to generate. Every field is opaque free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub title: String,
    pub author: String,
    pub received: String,
    pub published: String,
    pub doi: String,
}

impl CertificateRecord {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        received: impl Into<String>,
        published: impl Into<String>,
        doi: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            received: received.into(),
            published: published.into(),
            doi: doi.into(),
        }
    }

    /// Build a record from individually supplied fields, filling omitted
    /// optional fields with [`DEFAULT_FIELD`].
    pub fn with_defaults(
        title: impl Into<String>,
        author: impl Into<String>,
        received: Option<String>,
        published: Option<String>,
        doi: Option<String>,
    ) -> Self {
        let or_default = |v: Option<String>| v.unwrap_or_else(|| DEFAULT_FIELD.to_string());
        Self::new(
            title,
            author,
            or_default(received),
            or_default(published),
            or_default(doi),
        )
    }
}
