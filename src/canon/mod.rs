//! Canon index for Lectio
//!
//! This module holds the fixed, ordered catalog of the 66 books of the
//! canon: name, testament and chapter count for each, in canonical order
//! (Old Testament first, then New Testament). The catalog is embedded in
//! the binary as JSON and parsed once at startup; there is no mutation API.
//! Sequence order is the authoritative ordering for wraparound navigation.

mod navigator;

pub use navigator::{next_position, previous_position};

use crate::utils::error::{LectioError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Embedded canon catalog, in the interchange format of `CanonEntry`.
const CATALOG_JSON: &str = include_str!("catalog.json");

static BUILTIN: Lazy<Canon> = Lazy::new(|| {
    let entries: Vec<CanonEntry> =
        serde_json::from_str(CATALOG_JSON).expect("embedded canon catalog is valid JSON");
    Canon::from_entries(entries).expect("embedded canon catalog is consistent")
});

/// Which half of the canon a book belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Testament {
    #[serde(rename = "Old Testament")]
    Old,

    #[serde(rename = "New Testament")]
    New,
}

/// One book of the canon
///
/// Entries are immutable once the [`Canon`] is constructed. `chapters` is
/// always at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonEntry {
    /// Canonical book name, e.g. "Genesis" or "1 Corinthians"
    pub name: String,

    /// Testament the book belongs to
    pub testament: Testament,

    /// Number of chapters in the book
    pub chapters: u32,
}

/// The ordered catalog of books
///
/// Lookup by name is case-insensitive, since collaborators may pass either
/// casing.
#[derive(Debug, Clone)]
pub struct Canon {
    entries: Vec<CanonEntry>,
    by_name: HashMap<String, usize>,
}

impl Canon {
    /// The built-in 66-book catalog, parsed once on first use.
    pub fn builtin() -> &'static Canon {
        &BUILTIN
    }

    /// Build a canon from an ordered list of entries.
    ///
    /// Validates the catalog invariants: at least one entry, unique names
    /// (ignoring case), and a chapter count of at least 1 per book.
    pub fn from_entries(entries: Vec<CanonEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(LectioError::Catalog("catalog has no entries".to_string()));
        }

        let mut by_name = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if entry.chapters == 0 {
                return Err(LectioError::Catalog(format!(
                    "book '{}' has zero chapters",
                    entry.name
                )));
            }
            if by_name.insert(entry.name.to_lowercase(), index).is_some() {
                return Err(LectioError::Catalog(format!(
                    "duplicate book name '{}'",
                    entry.name
                )));
            }
        }

        Ok(Self { entries, by_name })
    }

    /// Parse a catalog in the JSON interchange format and build a canon.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<CanonEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Look up a book by name, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<&CanonEntry> {
        self.index_of(name).map(|i| &self.entries[i])
    }

    /// Ordinal of a book in canonical order, ignoring case.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    /// Book at the given ordinal, if in range.
    pub fn entry_at(&self, ordinal: usize) -> Option<&CanonEntry> {
        self.entries.get(ordinal)
    }

    /// First book in canonical order.
    pub fn first(&self) -> &CanonEntry {
        &self.entries[0]
    }

    /// Last book in canonical order.
    pub fn last(&self) -> &CanonEntry {
        &self.entries[self.entries.len() - 1]
    }

    /// Number of books in the catalog.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All books in canonical order.
    pub fn entries(&self) -> &[CanonEntry] {
        &self.entries
    }

    /// Books of one testament, in canonical order.
    ///
    /// This is the read surface the book-picker views consume; they hold no
    /// catalog logic of their own.
    pub fn books_of(&self, testament: Testament) -> impl Iterator<Item = &CanonEntry> {
        self.entries.iter().filter(move |e| e.testament == testament)
    }
}
