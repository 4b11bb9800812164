//! Certificate template loading and placeholder substitution.
//!
//! The template is plain HTML with literal `{{TOKEN}}` markers. Substitution
//! is verbatim: field values are inserted without any markup escaping.

use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::GeneratorConfig;
use crate::error::{CertError, Result};
use crate::record::CertificateRecord;

pub const TITLE_TOKEN: &str = "{{ARTICLE_TITLE}}";
pub const AUTHOR_TOKEN: &str = "{{AUTHOR_NAME}}";
pub const RECEIVED_TOKEN: &str = "{{RECEIVED_DATE}}";
pub const PUBLISHED_TOKEN: &str = "{{PUBLISHED_DATE}}";
pub const DOI_TOKEN: &str = "{{DOI}}";

/// Optional tokens sized from the text length of the title / author.
pub const TITLE_FONT_SIZE_TOKEN: &str = "{{TITLE_FONT_SIZE}}";
pub const NAME_FONT_SIZE_TOKEN: &str = "{{NAME_FONT_SIZE}}";

/// Pixel font sizes that keep long titles and names inside their boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSizes {
    pub title_px: u32,
    pub name_px: u32,
}

impl FontSizes {
    pub fn for_record(record: &CertificateRecord) -> Self {
        let title_len = record.title.chars().count();
        let name_len = record.author.chars().count();

        let title_px = match title_len {
            0..=60 => 28,
            61..=100 => 24,
            101..=150 => 21,
            151..=200 => 18,
            _ => 16,
        };
        let name_px = match name_len {
            0..=15 => 52,
            16..=25 => 44,
            26..=35 => 38,
            _ => 32,
        };
        Self { title_px, name_px }
    }
}

/// A loaded template with its asset references already resolved.
#[derive(Debug, Clone)]
pub struct Template {
    path: PathBuf,
    html: String,
}

impl Template {
    /// Read the template named by `config` and point its signature image and
    /// font references at absolute `file://` locations.
    pub fn load(config: &GeneratorConfig) -> Result<Self> {
        let html = fs::read_to_string(&config.template_path).map_err(|source| {
            CertError::TemplateMissing {
                path: config.template_path.clone(),
                source,
            }
        })?;
        let html = resolve_asset(html, &config.signature_path, |name| {
            format!("src=\"{name}\"")
        });
        let html = resolve_asset(html, &config.font_path, |name| format!("url('{name}')"));
        log::debug!("loaded template {}", config.template_path.display());
        Ok(Self {
            path: config.template_path.clone(),
            html,
        })
    }

    /// Wrap an in-memory template. Asset references are used as written.
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            path: PathBuf::new(),
            html: html.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Substitute the record's fields into the template.
    pub fn fill(&self, record: &CertificateRecord) -> String {
        let sizes = FontSizes::for_record(record);
        self.html
            .replace(TITLE_TOKEN, &record.title)
            .replace(AUTHOR_TOKEN, &record.author)
            .replace(RECEIVED_TOKEN, &record.received)
            .replace(PUBLISHED_TOKEN, &record.published)
            .replace(DOI_TOKEN, &record.doi)
            .replace(TITLE_FONT_SIZE_TOKEN, &sizes.title_px.to_string())
            .replace(NAME_FONT_SIZE_TOKEN, &sizes.name_px.to_string())
    }
}

/// Rewrite the relative reference to `asset` into an absolute `file://`
/// locator. When the asset is missing the reference stays as written.
fn resolve_asset(html: String, asset: &Path, reference: impl Fn(&str) -> String) -> String {
    let Some(name) = asset.file_name().and_then(|n| n.to_str()) else {
        return html;
    };
    let absolute = match fs::canonicalize(asset) {
        Ok(p) if p.is_file() => p,
        _ => {
            log::warn!(
                "asset {} not found; leaving template reference untouched",
                asset.display()
            );
            return html;
        }
    };
    let locator = file_uri(&absolute);
    html.replace(&reference(name), &reference(&locator))
}

/// Bytes left as-is in a locator: unreserved characters and the separator.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Percent-encoded `file://` locator for an absolute path.
///
/// Spaces, quotes, `#` and `%` are escaped so the locator survives both URL
/// parsing and a CSS `url('...')` wrapper.
pub fn file_uri(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    match s.strip_prefix('/') {
        Some(rest) => format!("file:///{}", utf8_percent_encode(rest, PATH_SEGMENT)),
        // Windows: keep the drive prefix (`C:`) literal.
        None => match s.split_once('/') {
            Some((drive, rest)) => {
                format!("file:///{drive}/{}", utf8_percent_encode(rest, PATH_SEGMENT))
            }
            None => format!("file:///{s}"),
        },
    }
}

/// Minimal certificate template carrying every token and both asset
/// references. Handy for fixtures and smoke tests.
pub fn sample_certificate_template() -> &'static str {
    r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<style>
  @font-face { font-family: 'Amsterdam'; src: url('Amsterdam.ttf') format('truetype'); }
  .article-title { font-size: {{TITLE_FONT_SIZE}}px; }
  .author-name { font-family: 'Amsterdam', cursive; font-size: {{NAME_FONT_SIZE}}px; }
</style>
</head>
<body>
  <div class="cert-title">Certificate of Publication</div>
  <div class="article-title">&ldquo;{{ARTICLE_TITLE}}&rdquo;</div>
  <div class="author-name">{{AUTHOR_NAME}}</div>
  <div class="row"><span class="label">Received:</span><span class="val">{{RECEIVED_DATE}}</span></div>
  <div class="row"><span class="label">Published:</span><span class="val">{{PUBLISHED_DATE}}</span></div>
  <div class="row"><span class="label">DOI:</span><span class="val">{{DOI}}</span></div>
  <img class="sig-svg" src="signature.svg" alt="Editor-in-Chief">
</body>
</html>
"##
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKENS: [&str; 5] = [
        TITLE_TOKEN,
        AUTHOR_TOKEN,
        RECEIVED_TOKEN,
        PUBLISHED_TOKEN,
        DOI_TOKEN,
    ];

    fn record() -> CertificateRecord {
        CertificateRecord::new(
            "On Things",
            "Jane Doe",
            "January 11, 2026",
            "February 10, 2026",
            "10.70729/air.2026.0201",
        )
    }

    fn fixture_dir(with_assets: bool) -> (tempfile::TempDir, GeneratorConfig) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("template.html"), sample_certificate_template()).unwrap();
        if with_assets {
            fs::write(dir.path().join("signature.svg"), "<svg/>").unwrap();
            fs::write(dir.path().join("Amsterdam.ttf"), [0u8; 4]).unwrap();
        }
        let config = GeneratorConfig::default().with_base_dir(dir.path());
        (dir, config)
    }

    #[test]
    fn fill_replaces_every_token() {
        let html = Template::from_html(sample_certificate_template()).fill(&record());
        for token in TOKENS {
            assert!(!html.contains(token), "{token} left in output");
        }
        assert!(!html.contains(TITLE_FONT_SIZE_TOKEN));
        assert!(!html.contains(NAME_FONT_SIZE_TOKEN));
        assert!(html.contains("&ldquo;On Things&rdquo;"));
        assert!(html.contains("10.70729/air.2026.0201"));
    }

    #[test]
    fn fill_does_not_escape_markup() {
        let mut r = record();
        r.title = "<b>Bold</b> & brave".to_string();
        let html = Template::from_html("<p>{{ARTICLE_TITLE}}</p>").fill(&r);
        assert_eq!(html, "<p><b>Bold</b> & brave</p>");
    }

    #[test]
    fn font_sizes_scale_with_length() {
        let mut r = record();
        assert_eq!(
            FontSizes::for_record(&r),
            FontSizes {
                title_px: 28,
                name_px: 52
            }
        );
        r.title = "x".repeat(120);
        r.author = "y".repeat(30);
        assert_eq!(
            FontSizes::for_record(&r),
            FontSizes {
                title_px: 21,
                name_px: 38
            }
        );
        r.title = "x".repeat(201);
        r.author = "y".repeat(36);
        assert_eq!(
            FontSizes::for_record(&r),
            FontSizes {
                title_px: 16,
                name_px: 32
            }
        );
    }

    #[test]
    fn load_resolves_present_assets() {
        let (dir, config) = fixture_dir(true);
        let template = Template::load(&config).unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();

        let sig = file_uri(&root.join("signature.svg"));
        let font = file_uri(&root.join("Amsterdam.ttf"));
        assert!(template.html().contains(&format!("src=\"{sig}\"")));
        assert!(template.html().contains(&format!("url('{font}')")));
        assert!(!template.html().contains("src=\"signature.svg\""));
    }

    #[test]
    fn load_leaves_missing_assets_untouched() {
        let (_dir, config) = fixture_dir(false);
        let template = Template::load(&config).unwrap();
        assert!(template.html().contains("src=\"signature.svg\""));
        assert!(template.html().contains("url('Amsterdam.ttf')"));
    }

    #[test]
    fn missing_template_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::default().with_base_dir(dir.path());
        let err = Template::load(&config).unwrap_err();
        assert!(matches!(err, CertError::TemplateMissing { .. }));
    }

    #[test]
    fn file_uri_prefixes_absolute_paths() {
        assert_eq!(
            file_uri(Path::new("/srv/certs/signature.svg")),
            "file:///srv/certs/signature.svg"
        );
    }

    #[test]
    fn file_uri_escapes_reserved_characters() {
        assert_eq!(
            file_uri(Path::new("/srv/American Impact Review/c#1/it's/100%/signature.svg")),
            "file:///srv/American%20Impact%20Review/c%231/it%27s/100%25/signature.svg"
        );
    }

    #[test]
    fn load_resolves_assets_under_awkward_directory_names() {
        let parent = tempfile::tempdir().unwrap();
        let assets = parent.path().join("O'Brien certs #1");
        fs::create_dir(&assets).unwrap();
        fs::write(assets.join("template.html"), sample_certificate_template()).unwrap();
        fs::write(assets.join("signature.svg"), "<svg/>").unwrap();
        fs::write(assets.join("Amsterdam.ttf"), [0u8; 4]).unwrap();
        let config = GeneratorConfig::default().with_base_dir(&assets);

        let template = Template::load(&config).unwrap();

        let root = fs::canonicalize(&assets).unwrap();
        let font = file_uri(&root.join("Amsterdam.ttf"));
        assert!(font.contains("O%27Brien%20certs%20%231/Amsterdam.ttf"));
        assert!(template.html().contains(&format!("url('{font}')")));
        assert!(template
            .html()
            .contains(&format!("src=\"{}\"", file_uri(&root.join("signature.svg")))));
        assert!(!template.html().contains("O'Brien"));
    }
}
