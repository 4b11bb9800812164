//! PDF rendering – hands a filled HTML document to an external renderer.
//!
//! The renderer is a separate process that turns an HTML file into a PDF
//! file. [`PdfRenderer`] is the seam: [`CommandRenderer`] shells out,
//! [`NoopRenderer`] accepts everything and writes nothing.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::RendererConfig;
use crate::error::{CertError, Result};

/// Something that converts an HTML file on disk into a PDF file on disk.
///
/// Both paths are absolute. Implementations block until the PDF is written
/// or the conversion has failed.
pub trait PdfRenderer {
    fn render(&self, input_html: &Path, output_pdf: &Path) -> Result<()>;
}

impl<R: PdfRenderer + ?Sized> PdfRenderer for &R {
    fn render(&self, input_html: &Path, output_pdf: &Path) -> Result<()> {
        (**self).render(input_html, output_pdf)
    }
}

impl<R: PdfRenderer + ?Sized> PdfRenderer for Box<R> {
    fn render(&self, input_html: &Path, output_pdf: &Path) -> Result<()> {
        (**self).render(input_html, output_pdf)
    }
}

/// Runs `program args... <input.html> <output.pdf>` and waits for it.
///
/// There is no timeout: a renderer that never exits stalls the caller.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: config.working_dir.clone(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl PdfRenderer for CommandRenderer {
    fn render(&self, input_html: &Path, output_pdf: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg(input_html).arg(output_pdf);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        log::debug!("running renderer: {cmd:?}");

        let output = cmd.output().map_err(|source| CertError::RendererLaunch {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(CertError::RendererInvocation {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            log::debug!("renderer: {}", stdout.trim_end());
        }
        Ok(())
    }
}

/// Accepts every request and produces no file.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl PdfRenderer for NoopRenderer {
    fn render(&self, input_html: &Path, output_pdf: &Path) -> Result<()> {
        log::info!(
            "dry run: would render {} -> {}",
            input_html.display(),
            output_pdf.display()
        );
        Ok(())
    }
}

/// Write `html` next to `output_path`, run `renderer` on it and remove the
/// temporary file again whatever the outcome.
///
/// The directory of `output_path` must already exist.
pub fn render_to_pdf(renderer: &dyn PdfRenderer, html: &str, output_path: &Path) -> Result<()> {
    let output_path = absolute(output_path)?;
    let dir = output_path.parent().unwrap_or_else(|| Path::new("."));
    let stem = output_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("certificate");

    // Removed on drop, so every return path below cleans up.
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{stem}-"))
        .suffix(".html")
        .tempfile_in(dir)
        .map_err(|e| CertError::filesystem(dir, e))?;
    temp.write_all(html.as_bytes())
        .and_then(|_| temp.flush())
        .map_err(|e| CertError::filesystem(temp.path(), e))?;

    let input = temp.path().to_path_buf();
    log::debug!("rendering {} -> {}", input.display(), output_path.display());
    let result = renderer.render(&input, &output_path);

    if let Err(e) = temp.close() {
        log::warn!("could not remove {}: {e}", input.display());
    }
    result
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| CertError::filesystem(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;

    /// Records what it saw while the temporary input still existed.
    #[derive(Default)]
    struct Inspecting {
        seen: RefCell<Vec<(PathBuf, PathBuf, String)>>,
        fail: bool,
    }

    impl PdfRenderer for Inspecting {
        fn render(&self, input_html: &Path, output_pdf: &Path) -> Result<()> {
            let body = fs::read_to_string(input_html).unwrap();
            self.seen
                .borrow_mut()
                .push((input_html.to_path_buf(), output_pdf.to_path_buf(), body));
            if self.fail {
                return Err(CertError::RendererInvocation {
                    code: Some(1),
                    stderr: "boom".to_string(),
                });
            }
            fs::write(output_pdf, b"%PDF-1.4 fake").unwrap();
            Ok(())
        }
    }

    #[test]
    fn temp_input_is_adjacent_absolute_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("certificate-jane.pdf");
        let renderer = Inspecting::default();

        render_to_pdf(&renderer, "<p>hi</p>", &out).unwrap();

        let seen = renderer.seen.borrow();
        let (input, output, body) = &seen[0];
        assert!(input.is_absolute());
        assert!(output.is_absolute());
        assert_eq!(input.parent(), out.parent());
        assert_eq!(input.extension().and_then(|e| e.to_str()), Some("html"));
        assert_eq!(body, "<p>hi</p>");
        assert!(!input.exists());
        assert!(out.exists());
    }

    #[test]
    fn temp_input_is_removed_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("certificate-jane.pdf");
        let renderer = Inspecting {
            fail: true,
            ..Default::default()
        };

        let err = render_to_pdf(&renderer, "<p>hi</p>", &out).unwrap_err();
        assert!(matches!(err, CertError::RendererInvocation { .. }));
        assert!(!renderer.seen.borrow()[0].0.exists());
        assert!(!out.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_output_dir_is_a_filesystem_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nope").join("certificate-x.pdf");
        let err = render_to_pdf(&NoopRenderer, "", &out).unwrap_err();
        assert!(matches!(err, CertError::Filesystem { .. }));
    }

    #[test]
    fn launch_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CommandRenderer::new("certgen-no-such-renderer-binary");
        let err = render_to_pdf(&renderer, "", &dir.path().join("c.pdf")).unwrap_err();
        assert!(matches!(err, CertError::RendererLaunch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn command_renderer_passes_paths_as_trailing_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("certificate-a.pdf");
        let renderer = CommandRenderer::new("sh")
            .arg("-c")
            .arg(r#"cp "$1" "$2""#)
            .arg("render");

        render_to_pdf(&renderer, "<h1>copied</h1>", &out).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "<h1>copied</h1>");
    }

    #[cfg(unix)]
    #[test]
    fn command_renderer_captures_stderr_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CommandRenderer::new("sh")
            .arg("-c")
            .arg("echo 'navigation timeout' >&2; exit 3")
            .arg("render");

        let err = render_to_pdf(&renderer, "", &dir.path().join("c.pdf")).unwrap_err();
        match err {
            CertError::RendererInvocation { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr.trim(), "navigation timeout");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn command_renderer_runs_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        fs::write(work.path().join("marker"), "from-workdir").unwrap();
        let renderer = CommandRenderer::new("sh")
            .arg("-c")
            .arg(r#"cp marker "$2""#)
            .arg("render")
            .current_dir(work.path());

        let out = dir.path().join("c.pdf");
        render_to_pdf(&renderer, "", &out).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "from-workdir");
    }
}
