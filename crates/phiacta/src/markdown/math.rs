//! Math delimiter state machine.
//!
//! Tracks inline math (`$...$`) and display math (`$$...$$`) for structural
//! balance checks. `$$` is always one atomic token; it is never read as two
//! inline delimiters.

/// Where the scanner is relative to math spans.
///
/// `start` is the byte offset of the opening delimiter of the span that is
/// currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MathState {
    /// Plain text, no open span.
    #[default]
    Text,
    /// Inside `$...$`.
    Inline { start: usize },
    /// Inside `$$...$$`.
    Display { start: usize },
}

impl MathState {
    /// Byte offset where the open span began, if one is open.
    #[must_use]
    pub const fn open_span_start(self) -> Option<usize> {
        match self {
            Self::Text => None,
            Self::Inline { start } | Self::Display { start } => Some(start),
        }
    }

    /// Whether no span is open.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Text)
    }

    /// Transition on a single `$` found at byte offset `at`.
    #[must_use]
    const fn on_dollar(self, at: usize) -> Self {
        match self {
            Self::Text => Self::Inline { start: at },
            Self::Inline { .. } => Self::Text,
            // A lone `$` inside display math is content.
            Self::Display { .. } => self,
        }
    }

    /// Transition on a `$$` token starting at byte offset `at`.
    #[must_use]
    const fn on_double_dollar(self, at: usize) -> Self {
        match self {
            Self::Text => Self::Display { start: at },
            Self::Display { .. } => Self::Text,
            // Consumed whole inside inline math without changing state.
            Self::Inline { .. } => self,
        }
    }
}

/// Walk the delimiter tokens of `text`, calling
/// `visit(before, after, token_start, token_end)` for each, and return the final state.
fn walk(text: &str, mut visit: impl FnMut(MathState, MathState, usize, usize)) -> MathState {
    let bytes = text.as_bytes();
    let mut state = MathState::Text;
    let mut i = 0;

    // `$` is ASCII, so byte-wise stepping never lands inside a multi-byte
    // character when it matches.
    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        let (next, end) = if bytes.get(i + 1) == Some(&b'$') {
            (state.on_double_dollar(i), i + 2)
        } else {
            (state.on_dollar(i), i + 1)
        };
        visit(state, next, i, end);
        state = next;
        i = end;
    }

    state
}

/// Scan `text` left to right and return the state after its last character.
#[must_use]
pub fn scan(text: &str) -> MathState {
    walk(text, |_, _, _, _| {})
}

/// A run of `text` that is either plain text or one math span with its delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    /// Byte offset of the run in the scanned string.
    pub start: usize,
    pub text: &'a str,
    pub is_math: bool,
}

/// Split `text` into alternating plain and math runs.
///
/// A span left open at the end of `text` is reported as math, unterminated.
#[must_use]
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;

    let end_state = walk(text, |before, after, token_start, token_end| {
        if before.is_closed() && !after.is_closed() {
            push_segment(&mut out, text, last, token_start, false);
            last = token_start;
        } else if !before.is_closed() && after.is_closed() {
            push_segment(&mut out, text, last, token_end, true);
            last = token_end;
        }
    });
    push_segment(&mut out, text, last, text.len(), !end_state.is_closed());

    out
}

fn push_segment<'a>(
    out: &mut Vec<Segment<'a>>,
    text: &'a str,
    start: usize,
    end: usize,
    is_math: bool,
) {
    if end > start {
        out.push(Segment { start, text: &text[start..end], is_math });
    }
}

/// Whether every math span opened in `text` is also closed in it.
#[must_use]
pub fn is_balanced(text: &str) -> bool {
    scan(text).is_closed()
}
