#![no_main]

use dotembed::EmbeddedSourceBlob;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(blob) = EmbeddedSourceBlob::parse(data) {
        if let Ok(content) = blob.decode() {
            assert_eq!(content.len(), blob.uncompressed_len());
        }
    }
});
