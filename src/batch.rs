//! CSV batch input.
//!
//! The header row must name `title`, `author`, `received`, `published` and
//! `doi`. Column order is free and extra columns are ignored.

use std::io;
use std::path::Path;

use crate::error::{CertError, Result};
use crate::record::CertificateRecord;

pub const REQUIRED_COLUMNS: [&str; 5] = ["title", "author", "received", "published", "doi"];

/// Read every record from the CSV file at `path`, in row order.
///
/// Header problems are reported before any row is parsed.
pub fn read_batch(path: &Path) -> Result<Vec<CertificateRecord>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CertError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    read_records(reader).map_err(|e| match e {
        BatchReadError::Csv(source) => CertError::Csv {
            path: path.to_path_buf(),
            source,
        },
        BatchReadError::MissingColumn(column) => CertError::MissingColumn { column },
    })
}

/// Same as [`read_batch`] over any reader; errors carry no file path.
pub fn read_batch_from<R: io::Read>(input: R) -> Result<Vec<CertificateRecord>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    read_records(reader).map_err(|e| match e {
        BatchReadError::Csv(source) => CertError::Csv {
            path: "<input>".into(),
            source,
        },
        BatchReadError::MissingColumn(column) => CertError::MissingColumn { column },
    })
}

enum BatchReadError {
    Csv(csv::Error),
    MissingColumn(&'static str),
}

impl From<csv::Error> for BatchReadError {
    fn from(e: csv::Error) -> Self {
        BatchReadError::Csv(e)
    }
}

fn read_records<R: io::Read>(
    mut reader: csv::Reader<R>,
) -> std::result::Result<Vec<CertificateRecord>, BatchReadError> {
    let headers = reader.headers()?.clone();
    let mut index = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in index.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or(BatchReadError::MissingColumn(column))?;
    }
    let [title, author, received, published, doi] = index;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let field = |i: usize| row.get(i).unwrap_or_default().to_string();
        records.push(CertificateRecord::new(
            field(title),
            field(author),
            field(received),
            field(published),
            field(doi),
        ));
    }
    log::debug!("read {} record(s) from batch input", records.len());
    Ok(records)
}
