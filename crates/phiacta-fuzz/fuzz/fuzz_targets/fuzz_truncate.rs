#![no_main]

use libfuzzer_sys::fuzz_target;
use phiacta::markdown::{ELLIPSIS, compact_preview, scan, truncate_preserving_math};

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let Ok(content) = std::str::from_utf8(rest) else {
        return;
    };
    let max = usize::from(first);

    let out = truncate_preserving_math(content, max);
    if content.chars().count() <= max {
        assert_eq!(out, content);
    } else {
        let prefix = out.strip_suffix(ELLIPSIS).expect("truncated output ends with ellipsis");
        assert!(content.starts_with(prefix));
        assert!(prefix.chars().count() <= max);
        assert!(scan(prefix).is_closed());
    }

    let _ = compact_preview(content, max);
});
