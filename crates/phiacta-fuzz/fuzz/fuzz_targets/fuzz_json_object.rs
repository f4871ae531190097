#![no_main]

use libfuzzer_sys::fuzz_target;
use phiacta::models::{Claim, Namespace, PaginatedResponse, Review, SearchResponse};

fuzz_target!(|data: &[u8]| {
    // First try to parse as valid JSON
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(data) {
        // Then try each model type
        let _ = serde_json::from_value::<Claim>(json.clone());
        let _ = serde_json::from_value::<Review>(json.clone());
        let _ = serde_json::from_value::<SearchResponse>(json.clone());
        if let Ok(page) = serde_json::from_value::<PaginatedResponse<Namespace>>(json) {
            let _ = phiacta::namespace::build_namespace_tree(&page.items);
        }
    }
});
