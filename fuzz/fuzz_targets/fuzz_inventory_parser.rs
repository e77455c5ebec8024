//! Fuzz target for inventory JSON parsing and indexing.
//!
//! Goal: loading an inventory should **never panic** on any input.
//! It may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_inventory_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = compguard_store::fuzz::parse_and_index(text);
    }
});
