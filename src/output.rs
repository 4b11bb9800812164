//! Output directory management and artifact naming.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CertError, Result};
use crate::slug::slugify;

/// Create `dir` and any missing parents. A no-op when it already exists.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| CertError::filesystem(dir, e))?;
    log::debug!("output directory ready: {}", dir.display());
    Ok(())
}

/// File name of the certificate for `author`. Depends on the author only.
pub fn file_name_for(author: &str) -> String {
    format!("certificate-{}.pdf", slugify(author))
}

/// Full artifact path for `author` inside `dir`.
pub fn output_path_for(dir: &Path, author: &str) -> PathBuf {
    dir.join(file_name_for(author))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_depends_only_on_author() {
        let dir = Path::new("out");
        assert_eq!(
            output_path_for(dir, "Jane Doe"),
            PathBuf::from("out/certificate-jane-doe.pdf")
        );
        assert_eq!(
            output_path_for(dir, "A. Smith"),
            output_path_for(dir, "a-smith")
        );
    }

    #[test]
    fn ensure_output_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b").join("output");
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_output_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn ensure_output_dir_fails_on_file() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("occupied");
        fs::write(&file, b"x").unwrap();
        let err = ensure_output_dir(&file).unwrap_err();
        assert!(matches!(err, CertError::Filesystem { .. }));
    }
}
