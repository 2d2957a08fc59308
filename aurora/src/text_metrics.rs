//! Text metrics for flattened document text
//!
//! Word, character and paragraph counting plus a reading-time estimate.
//! Everything here is pure: the same input always yields the same output
//! and nothing is cached between calls.

use regex::Regex;
use std::sync::OnceLock;

/// Average adult reading speed used for the reading-time estimate
pub const WORDS_PER_MINUTE: usize = 225;

/// A newline, any amount of whitespace, then another newline
static BLANK_LINE: OnceLock<Regex> = OnceLock::new();

fn blank_line() -> &'static Regex {
    BLANK_LINE.get_or_init(|| Regex::new(r"\n\s*\n").expect("blank-line pattern is valid"))
}

/// Counts the three live metrics of a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    /// Number of whitespace-separated tokens
    pub word_count: usize,

    /// Number of characters (Unicode scalar values) in the flattened text
    ///
    /// Characters outside the Basic Multilingual Plane, such as most emoji,
    /// count once here but twice in a UTF-16 `String.length`.
    pub character_count: usize,

    /// Number of paragraphs
    pub paragraph_count: usize,
}

impl Metrics {
    /// Measure flattened text, taking the paragraph count from the caller
    ///
    /// The document model knows its own block structure, so the paragraph
    /// count is supplied rather than guessed from blank lines.
    ///
    /// # Parameters
    /// * `text` - Flattened document text
    /// * `paragraph_count` - Number of top-level blocks in the document
    pub fn from_text(text: &str, paragraph_count: usize) -> Self {
        Self {
            word_count: count_words(text),
            character_count: count_characters(text),
            paragraph_count,
        }
    }

    /// Reading-time estimate for this word count
    pub fn reading_time(&self) -> String {
        estimate_reading_time(self.word_count)
    }
}

/// Count the words in a text string
///
/// A word is any maximal run of non-whitespace characters. Spaces, tabs
/// and newlines all separate words; punctuation does not.
pub fn count_words(text: &str) -> usize {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed.split_whitespace().count()
}

/// Count the characters in a text string
///
/// Counts Unicode scalar values, so a UTF-16 length can be larger.
pub fn count_characters(text: &str) -> usize {
    text.chars().count()
}

/// Count paragraphs separated by one or more blank lines
///
/// Any non-blank input has at least one paragraph, even when it contains
/// no blank-line separator at all. This is a heuristic over plain text;
/// a live document counts its top-level blocks instead.
pub fn count_paragraphs(text: &str) -> usize {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }

    let paragraphs = blank_line()
        .split(trimmed)
        .filter(|segment| !segment.trim().is_empty())
        .count();

    paragraphs.max(1)
}

/// Estimate the reading time for a number of words
///
/// # Returns
/// * `"< 1 min"` when there is nothing to read
/// * `"1 min"` for up to one minute of reading
/// * `"{n} mins"` otherwise, rounding up
pub fn estimate_reading_time(word_count: usize) -> String {
    let minutes = word_count.div_ceil(WORDS_PER_MINUTE);
    match minutes {
        0 => "< 1 min".to_string(),
        1 => "1 min".to_string(),
        n => format!("{} mins", n),
    }
}
