//! Fuzz target for the DSN parser.
//!
//! Feeds arbitrary strings to the parser and the default resolver.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_dsn_parser
//! ```

#![no_main]

use chconf_options::parse_dsn;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // The parser should never panic, only return errors
        if let Ok(options) = parse_dsn(input) {
            let once = options.with_defaults();
            assert_eq!(once.clone().with_defaults(), once);
        }
    }
});
