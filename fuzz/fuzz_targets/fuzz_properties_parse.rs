//! Fuzz target for job properties parsing.
//!
//! Parsing accepts any text, so the target checks that it never panics and
//! that whatever it produces resolves without panicking either.

#![no_main]

use c2g_config::{resolve, PropertyBag};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let bag = PropertyBag::parse(text);
        let _ = resolve(&bag);
    }
});
