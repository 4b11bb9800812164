//! Generator configuration – the paths and renderer command that the
//! pipeline runs against. Loadable from JSON; every field has a default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CertError, Result};

/// How to launch the external HTML → PDF renderer.
///
/// The renderer is invoked as `program args... <input.html> <output.pdf>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory for the renderer process (default: inherited).
    pub working_dir: Option<PathBuf>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: "node".to_string(),
            args: vec!["render-pdf.js".to_string()],
            working_dir: None,
        }
    }
}

/// Everything the certificate pipeline needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// HTML template containing the placeholder tokens.
    pub template_path: PathBuf,
    /// Signature image referenced by the template (`src="signature.svg"`).
    pub signature_path: PathBuf,
    /// Font file referenced by the template (`url('Amsterdam.ttf')`).
    pub font_path: PathBuf,
    /// Destination directory for generated PDFs.
    pub output_dir: PathBuf,
    pub renderer: RendererConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("template.html"),
            signature_path: PathBuf::from("signature.svg"),
            font_path: PathBuf::from("Amsterdam.ttf"),
            output_dir: PathBuf::from("output"),
            renderer: RendererConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load a config from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CertError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        serde_json::from_str(&text).map_err(|e| CertError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// Rebase every relative path on `base`, and run the renderer from `base`
    /// unless a working directory is already set.
    ///
    /// Absolute paths are left alone.
    pub fn with_base_dir(mut self, base: &Path) -> Self {
        let rebase = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };
        self.template_path = rebase(self.template_path);
        self.signature_path = rebase(self.signature_path);
        self.font_path = rebase(self.font_path);
        self.output_dir = rebase(self.output_dir);
        self.renderer.working_dir = Some(match self.renderer.working_dir.take() {
            Some(dir) => rebase(dir),
            None => base.to_path_buf(),
        });
        self
    }
}
