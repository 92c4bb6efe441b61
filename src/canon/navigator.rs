//! Position navigation over the canon
//!
//! Pure functions computing the next and previous (book, chapter) pair in
//! canonical order, with wraparound at both ends of the catalog. Both
//! functions are total: a book name that does not resolve degrades to the
//! documented fallback instead of failing. They are exercised by the natural
//! end-of-chapter transition, explicit next/previous commands, and the
//! boundary crossings triggered by fast-forward and rewind.

use super::{Canon, CanonEntry};

/// Next (book, chapter) pair after the given position.
///
/// Within a book, this is the next chapter. Past the last chapter of a book
/// it moves to chapter 1 of the next book, and past the last chapter of the
/// last book it wraps to chapter 1 of the first. An unknown book name falls
/// back to the start of the canon.
pub fn next_position<'a>(canon: &'a Canon, book: &str, chapter: u32) -> (&'a CanonEntry, u32) {
    let index = match canon.index_of(book) {
        Some(index) => index,
        None => return (canon.first(), 1),
    };
    let entry = canon.entry_at(index).expect("index_of returns valid ordinals");

    if chapter < entry.chapters {
        return (entry, chapter + 1);
    }

    match canon.entry_at(index + 1) {
        Some(next) => (next, 1),
        None => (canon.first(), 1),
    }
}

/// Previous (book, chapter) pair before the given position.
///
/// Symmetric to [`next_position`]: within a book the previous chapter, at
/// chapter 1 the last chapter of the previous book, and at the very start of
/// the canon a wrap to the last chapter of the last book. An unknown book
/// name falls back to the end of the canon, mirroring the forward fallback.
pub fn previous_position<'a>(canon: &'a Canon, book: &str, chapter: u32) -> (&'a CanonEntry, u32) {
    let last = canon.last();
    let index = match canon.index_of(book) {
        Some(index) => index,
        None => return (last, last.chapters),
    };
    let entry = canon.entry_at(index).expect("index_of returns valid ordinals");

    if chapter > 1 {
        return (entry, chapter - 1);
    }

    match index.checked_sub(1).and_then(|i| canon.entry_at(i)) {
        Some(previous) => (previous, previous.chapters),
        None => (last, last.chapters),
    }
}
