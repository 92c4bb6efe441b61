//! Resource locator derivation
//!
//! Maps a (version, book, chapter) position to the audio resource locator
//! `{base_url}/{version}/{book_slug}/{chapter}[.ext]`. The base URL, default
//! version, slug normalization and optional file extension are deployment
//! conventions injected through [`LocatorConfig`]; nothing here reads the
//! ambient environment, and no single convention is hard-coded as
//! authoritative.

use serde::{Deserialize, Serialize};

/// How book names are normalized into a locator path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlugStyle {
    /// Lowercase with spaces replaced by hyphens: "1 Corinthians" ->
    /// "1-corinthians".
    Plain,

    /// Like `Plain`, but a leading "1"/"2"/"3" becomes a roman ordinal:
    /// "1 Corinthians" -> "i-corinthians".
    RomanNumeralPrefix,
}

/// Deployment configuration for locator derivation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Base URL of the audio CDN, without a trailing slash.
    pub base_url: String,

    /// Default translation identifier, e.g. "kjv".
    pub version: String,

    /// Book name normalization convention.
    pub slug_style: SlugStyle,

    /// Optional file extension appended to the chapter segment.
    pub extension: Option<String>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            version: "kjv".to_string(),
            slug_style: SlugStyle::Plain,
            extension: None,
        }
    }
}

impl LocatorConfig {
    /// Locator for a chapter under the given version.
    pub fn locator(&self, version: &str, book: &str, chapter: u32) -> String {
        let base = self.base_url.trim_end_matches('/');
        let slug = book_slug(book, self.slug_style);
        match &self.extension {
            Some(ext) => format!("{}/{}/{}/{}.{}", base, version, slug, chapter, ext),
            None => format!("{}/{}/{}/{}", base, version, slug, chapter),
        }
    }

    /// Locator for a chapter under the configured default version.
    pub fn locator_for(&self, book: &str, chapter: u32) -> String {
        self.locator(&self.version, book, chapter)
    }
}

/// Normalize a book name into a locator path segment.
pub fn book_slug(name: &str, style: SlugStyle) -> String {
    let lowered = name.trim().to_lowercase();
    let slug = match style {
        SlugStyle::Plain => lowered,
        SlugStyle::RomanNumeralPrefix => match lowered.split_once(' ') {
            Some(("1", rest)) => format!("i {}", rest),
            Some(("2", rest)) => format!("ii {}", rest),
            Some(("3", rest)) => format!("iii {}", rest),
            _ => lowered,
        },
    };
    slug.replace(' ', "-")
}
