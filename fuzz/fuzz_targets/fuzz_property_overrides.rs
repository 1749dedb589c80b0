//! Fuzz target for `--prop key=value` overrides.

#![no_main]

use c2g_common::Error;
use c2g_config::PropertyBag;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|overrides: Vec<String>| {
    let mut bag = PropertyBag::new();
    match bag.apply_overrides(&overrides) {
        Ok(()) => assert!(bag.len() <= overrides.len()),
        Err(Error::InvalidOverride(_)) => {}
        Err(other) => panic!("unexpected override error: {other}"),
    }
});
