//! Length-bounded truncation that never splits a math span.

use std::borrow::Cow;

use super::math;

/// Marker appended to every truncated preview.
pub const ELLIPSIS: &str = "...";

/// Truncate `content` to at most `max` characters without cutting a math span.
///
/// Content that already fits is returned untouched (borrowed, no ellipsis).
/// Otherwise the first `max` characters are scanned for math delimiters; if
/// the scan ends inside an open `$...$` or `$$...$$` span, the text is cut
/// back to just before that span's opening delimiter. Trailing whitespace is
/// trimmed and [`ELLIPSIS`] appended.
///
/// Lengths are counted in `char`s. Delimiters past the cutoff are never
/// looked at, so unbalanced math later in the text cannot affect the result.
///
/// ```
/// use phiacta::markdown::truncate_preserving_math;
///
/// assert_eq!(truncate_preserving_math("short text", 200), "short text");
/// assert_eq!(truncate_preserving_math("see $x^2 + y^2$ here", 8), "see...");
/// ```
#[must_use]
pub fn truncate_preserving_math(content: &str, max: usize) -> Cow<'_, str> {
    let Some((cutoff, _)) = content.char_indices().nth(max) else {
        return Cow::Borrowed(content);
    };

    let candidate = &content[..cutoff];
    let safe = match math::scan(candidate).open_span_start() {
        Some(start) => &candidate[..start],
        None => candidate,
    };

    let kept = safe.trim_end();
    let mut out = String::with_capacity(kept.len() + ELLIPSIS.len());
    out.push_str(kept);
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}
