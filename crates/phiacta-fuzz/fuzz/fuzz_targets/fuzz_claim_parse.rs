#![no_main]

use libfuzzer_sys::fuzz_target;
use phiacta::models::Claim;

fuzz_target!(|data: &[u8]| {
    // Parsing arbitrary bytes should only ever return Ok or Err
    if let Ok(claim) = serde_json::from_slice::<Claim>(data) {
        let _ = claim.verification_badge();
        let _ = claim.short_id();
    }
});
