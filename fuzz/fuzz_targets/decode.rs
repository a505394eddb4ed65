#![no_main]
use hashseq_rs::{Codec, Config};
use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;

static CODEC: Lazy<Codec> =
    Lazy::new(|| Codec::new(&Config::new("random-salt").min_length(6)).unwrap());

fuzz_target!(|data: &[u8]| {
    if let Ok(values) = CODEC.decode(&String::from_utf8_lossy(data)) {
        // Anything that decodes must be exactly what encoding produces.
        assert_eq!(CODEC.encode(&values).unwrap(), String::from_utf8_lossy(data));
    }
});
