//! Filesystem-safe name normalisation.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum slug length, in characters.
pub const MAX_SLUG_CHARS: usize = 80;

struct SlugPatterns {
    disallowed: Regex,
    separators: Regex,
    hyphens: Regex,
}

fn patterns() -> &'static SlugPatterns {
    static PATTERNS: OnceLock<SlugPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| SlugPatterns {
        disallowed: Regex::new(r"[^\w\s-]").expect("valid slug regex"),
        separators: Regex::new(r"[\s_]+").expect("valid slug regex"),
        hyphens: Regex::new(r"-+").expect("valid slug regex"),
    })
}

/// Turn a display name into a lowercase, hyphenated slug.
///
/// Word characters survive, punctuation is dropped, whitespace and
/// underscores become single hyphens. The result is capped at
/// [`MAX_SLUG_CHARS`] characters. Distinct inputs may share a slug.
pub fn slugify(text: &str) -> String {
    let p = patterns();
    let lowered = text.to_lowercase();
    let text = lowered.trim();
    let text = p.disallowed.replace_all(text, "");
    let text = p.separators.replace_all(&text, "-");
    let text = p.hyphens.replace_all(&text, "-");
    text.chars().take(MAX_SLUG_CHARS).collect()
}
