//! Fuzz target for lenient version parsing.
//!
//! Goal: the parser should **never panic**, and anything it accepts must order
//! consistently against itself.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_version_parser
//! ```

#![no_main]

use arbitrary::Arbitrary;
use compguard_domain::evaluators::parse_version_lenient;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct VersionPair {
    left: String,
    right: String,
}

fuzz_target!(|input: VersionPair| {
    if input.left.len() > 128 || input.right.len() > 128 {
        return;
    }

    let left = parse_version_lenient(&input.left);
    let right = parse_version_lenient(&input.right);

    if let Some(l) = &left {
        assert_eq!(l.cmp(l), std::cmp::Ordering::Equal);
    }
    if let (Some(l), Some(r)) = (left, right) {
        assert_eq!(l.cmp(&r), r.cmp(&l).reverse());
    }
});
