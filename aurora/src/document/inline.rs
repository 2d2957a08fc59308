//! Offset-based edits on inline content
//!
//! Offsets count characters; a line break counts as one. Every edit
//! leaves the content normalized: no empty runs and no two adjacent runs
//! with the same format.

use super::node::{Format, FormatFlags, Inline, TextRun};

/// Total length in characters
pub fn len(inlines: &[Inline]) -> usize {
    inlines.iter().map(Inline::len).sum()
}

/// Split inline content at a character offset
///
/// Offsets past the end split at the end.
pub fn split_at(inlines: Vec<Inline>, offset: usize) -> (Vec<Inline>, Vec<Inline>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut position = 0;

    for inline in inlines {
        let length = inline.len();
        if position + length <= offset {
            left.push(inline);
        } else if position >= offset {
            right.push(inline);
        } else {
            // Only text runs can straddle the offset
            if let Inline::Text(run) = inline {
                let byte = byte_index(&run.text, offset - position);
                let (head, tail) = run.text.split_at(byte);
                left.push(Inline::Text(TextRun::with_format(head, run.format)));
                right.push(Inline::Text(TextRun::with_format(tail, run.format)));
            }
        }
        position += length;
    }

    (left, right)
}

/// Merge adjacent runs with equal formatting and drop empty runs
pub fn normalize(inlines: &mut Vec<Inline>) {
    let mut merged: Vec<Inline> = Vec::with_capacity(inlines.len());
    for inline in inlines.drain(..) {
        match inline {
            Inline::Text(run) if run.is_empty() => {}
            Inline::Text(run) => {
                if let Some(Inline::Text(last)) = merged.last_mut() {
                    if last.format == run.format {
                        last.text.push_str(&run.text);
                        continue;
                    }
                }
                merged.push(Inline::Text(run));
            }
            Inline::LineBreak => merged.push(Inline::LineBreak),
        }
    }
    *inlines = merged;
}

/// Insert inline nodes at an offset
pub fn insert(inlines: &mut Vec<Inline>, offset: usize, inserted: Vec<Inline>) {
    let (mut left, right) = split_at(std::mem::take(inlines), offset);
    left.extend(inserted);
    left.extend(right);
    normalize(&mut left);
    *inlines = left;
}

/// Insert formatted text at an offset
pub fn insert_text(inlines: &mut Vec<Inline>, offset: usize, text: &str, format: FormatFlags) {
    insert(
        inlines,
        offset,
        vec![Inline::Text(TextRun::with_format(text, format))],
    );
}

/// Remove the characters in `start..end`
pub fn delete(inlines: &mut Vec<Inline>, start: usize, end: usize) {
    if end <= start {
        return;
    }
    let (mut left, rest) = split_at(std::mem::take(inlines), start);
    let (_, right) = split_at(rest, end - start);
    left.extend(right);
    normalize(&mut left);
    *inlines = left;
}

/// Turn a format on or off for the characters in `start..end`
pub fn set_format(inlines: &mut Vec<Inline>, start: usize, end: usize, format: Format, on: bool) {
    if end <= start {
        return;
    }
    let (mut left, rest) = split_at(std::mem::take(inlines), start);
    let (mut middle, right) = split_at(rest, end - start);
    for inline in middle.iter_mut() {
        if let Inline::Text(run) = inline {
            run.format.set(format, on);
        }
    }
    left.extend(middle);
    left.extend(right);
    normalize(&mut left);
    *inlines = left;
}

/// Format of the text at a caret offset
///
/// The caret takes the format of the character before it, or of the
/// first run when it sits at the start.
pub fn format_at(inlines: &[Inline], offset: usize) -> FormatFlags {
    let mut position = 0;
    let mut first = None;
    for inline in inlines {
        if let Inline::Text(run) = inline {
            if first.is_none() {
                first = Some(run.format);
            }
            let length = run.len();
            if offset > position && offset <= position + length {
                return run.format;
            }
        }
        position += inline.len();
    }
    first.unwrap_or_default()
}

/// Byte index of the `chars`-th character, clamped to the end
fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(TextRun::new(s))
    }

    fn bold(s: &str) -> Inline {
        Inline::Text(TextRun::with_format(s, FormatFlags::new().with(Format::Bold)))
    }

    #[test]
    fn test_split_inside_run() {
        let (left, right) = split_at(vec![text("héllo")], 2);
        assert_eq!(left, vec![text("hé")]);
        assert_eq!(right, vec![text("llo")]);
    }

    #[test]
    fn test_split_at_boundaries() {
        let content = vec![text("ab"), Inline::LineBreak, text("cd")];
        let (left, right) = split_at(content.clone(), 0);
        assert!(left.is_empty());
        assert_eq!(right, content);

        let (left, right) = split_at(content.clone(), 3);
        assert_eq!(left, vec![text("ab"), Inline::LineBreak]);
        assert_eq!(right, vec![text("cd")]);

        let (left, right) = split_at(content.clone(), 99);
        assert_eq!(left, content);
        assert!(right.is_empty());
    }

    #[test]
    fn test_insert_text_merges_runs() {
        let mut content = vec![text("helo")];
        insert_text(&mut content, 3, "l", FormatFlags::new());
        assert_eq!(content, vec![text("hello")]);

        insert_text(&mut content, 5, "!", FormatFlags::new().with(Format::Bold));
        assert_eq!(content, vec![text("hello"), bold("!")]);
    }

    #[test]
    fn test_delete_across_runs() {
        let mut content = vec![text("ab"), bold("cd"), text("ef")];
        delete(&mut content, 1, 5);
        assert_eq!(content, vec![text("af")]);
    }

    #[test]
    fn test_set_format_splits_and_merges() {
        let mut content = vec![text("hello world")];
        set_format(&mut content, 6, 11, Format::Bold, true);
        assert_eq!(content, vec![text("hello "), bold("world")]);

        set_format(&mut content, 0, 11, Format::Bold, false);
        assert_eq!(content, vec![text("hello world")]);
    }

    #[test]
    fn test_format_at_caret() {
        let content = vec![text("ab"), bold("cd")];
        assert_eq!(format_at(&content, 0), FormatFlags::new());
        assert_eq!(format_at(&content, 2), FormatFlags::new());
        assert!(format_at(&content, 3).bold);
        assert!(format_at(&content, 4).bold);
        assert_eq!(format_at(&[], 0), FormatFlags::new());
    }
}
