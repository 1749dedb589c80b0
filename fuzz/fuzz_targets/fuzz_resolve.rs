//! Fuzz target for job configuration resolution.
//!
//! Builds bags from arbitrary values for the recognized keys and checks that
//! resolution is deterministic and never reports an internal defect.

#![no_main]

use arbitrary::Arbitrary;
use c2g_config::keys::*;
use c2g_config::{resolve, PropertyBag};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    keyspace: Option<String>,
    table: Option<String>,
    host: Option<String>,
    format: Option<String>,
    save_mode: Option<String>,
    path: Option<String>,
    catalog: Option<String>,
    query: Option<String>,
    extra: Vec<(String, String)>,
}

fuzz_target!(|input: Input| {
    let mut bag = PropertyBag::new();
    for (key, value) in input.extra {
        bag.insert(key, value);
    }
    let fields = [
        (INPUT_KEYSPACE, input.keyspace),
        (INPUT_TABLE, input.table),
        (INPUT_HOST, input.host),
        (OUTPUT_FORMAT, input.format),
        (OUTPUT_SAVE_MODE, input.save_mode),
        (OUTPUT_PATH, input.path),
        (INPUT_CATALOG, input.catalog),
        (INPUT_QUERY, input.query),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            bag.insert(key, value);
        }
    }

    let first = resolve(&bag);
    assert_eq!(first, resolve(&bag));
    if let Err(report) = first {
        assert!(!report.is_empty());
        assert!(!report.has_internal_defect());
    }
});
