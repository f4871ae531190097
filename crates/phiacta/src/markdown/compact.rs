//! Single-line card previews.
//!
//! Cards are rendered inline, so block constructs (headings, quotes, list
//! items, paragraphs) are flattened into one run of text and links become
//! their label. Math spans pass through byte for byte.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::math;
use super::truncate::truncate_preserving_math;

fn block_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Heading, (nested) block quote, bullet item, ordered item.
        Regex::new(r"^(?:#{1,6}[ \t]+|(?:>[ \t]?)+|[-*+][ \t]+|\d{1,9}[.)][ \t]+)")
            .expect("valid block marker regex pattern")
    })
}

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").expect("valid link regex pattern")
    })
}

fn spaces_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]{2,}").expect("valid whitespace regex pattern"))
}

/// Build the compact preview shown on claim cards.
///
/// The content is first cut with [`truncate_preserving_math`], then flattened
/// so the result holds no block-level Markdown.
#[must_use]
pub fn compact_preview(content: &str, max: usize) -> String {
    let truncated = truncate_preserving_math(content, max);
    flatten_blocks(&truncated)
}

/// Flatten block-level Markdown into a single line, leaving math untouched.
#[must_use]
pub fn flatten_blocks(content: &str) -> String {
    let unlinked = unlink(content);
    let content = unlinked.as_ref();
    let mut out = String::with_capacity(content.len());

    for segment in math::segments(content) {
        if segment.is_math {
            out.push_str(segment.text);
            continue;
        }

        let starts_line = segment.start == 0 || content[..segment.start].ends_with('\n');
        out.push_str(&flatten_text(segment.text, starts_line));
    }

    out.trim().to_string()
}

/// Replace `[label](url)` with `label` across the whole text.
///
/// Labels may contain math. A link is kept as written when its brackets or
/// URL fall inside a math span.
fn unlink(content: &str) -> Cow<'_, str> {
    let math: Vec<Range<usize>> = math::segments(content)
        .into_iter()
        .filter(|segment| segment.is_math)
        .map(|segment| segment.start..segment.start + segment.text.len())
        .collect();
    let in_math =
        |range: Range<usize>| math.iter().any(|m| m.start < range.end && range.start < m.end);

    link_regex().replace_all(content, |caps: &Captures<'_>| {
        let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
            return String::new();
        };
        let opening = whole.start()..label.start();
        let closing = label.end()..whole.end();
        if in_math(opening) || in_math(closing) {
            whole.as_str().to_string()
        } else {
            label.as_str().to_string()
        }
    })
}

fn flatten_text(text: &str, starts_line: bool) -> String {
    let lines: Vec<String> = text
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let line = line.trim_end_matches('\r');
            if i > 0 || starts_line {
                let line = line.trim_start();
                block_marker_regex().replace(line, "").into_owned()
            } else {
                line.to_string()
            }
        })
        .collect();

    let joined = lines.join(" ");
    spaces_regex().replace_all(&joined, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_paragraphs_join() {
        assert_eq!(flatten_blocks("# Title\n\nBody text."), "Title Body text.");
    }

    #[test]
    fn test_lists_and_quotes() {
        assert_eq!(flatten_blocks("> quoted\n- one\n2. two"), "quoted one two");
    }

    #[test]
    fn test_links_become_labels() {
        assert_eq!(flatten_blocks("see [the paper](https://x.org/p)"), "see the paper");
    }

    #[test]
    fn test_link_label_with_math_becomes_label() {
        assert_eq!(flatten_blocks("see [the $x$ result](https://x.org)"), "see the $x$ result");
        assert_eq!(
            compact_preview("- [bound $$n^2$$](https://x.org/b) holds", 200),
            "bound $$n^2$$ holds"
        );
    }

    #[test]
    fn test_math_is_untouched() {
        let text = "A $[a](b)$ and\n$$\n- x\n$$";
        assert_eq!(flatten_blocks(text), "A $[a](b)$ and $$\n- x\n$$");
    }

    #[test]
    fn test_hash_mid_line_is_kept() {
        assert_eq!(flatten_blocks("issue #12 fixed"), "issue #12 fixed");
    }

    #[test]
    fn test_compact_preview_truncates_first() {
        let content = format!("# Heading\n{}", "w".repeat(300));
        let preview = compact_preview(&content, 20);
        assert_eq!(preview, format!("Heading {}...", "w".repeat(10)));
    }
}
