#![no_main]

use libfuzzer_sys::fuzz_target;
use revertir::config::DetectorConfig;
use revertir::revdocs::{read_revdocs, revdocs_to_reverts};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a JSON-lines stream; malformed lines surface as
    // errors and must never panic
    let config = DetectorConfig {
        radius: 3,
        use_sha1: data.first().is_some_and(|b| b & 1 == 1),
    };
    for revert in revdocs_to_reverts(read_revdocs(data), &config).flatten() {
        assert!(!revert.reverteds().is_empty());
    }
});
