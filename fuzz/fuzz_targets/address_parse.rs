#![no_main]

use heritage_core::Address;
use libfuzzer_sys::fuzz_target;
use std::str::FromStr;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing arbitrary text must return Ok or Err, never panic.
    // Anything accepted must print back to a string that parses to the same address.
    if let Ok(address) = Address::from_str(s) {
        let printed = address.to_string();
        assert_eq!(Address::from_str(&printed).ok(), Some(address));
        let _ = address.short();
    }
});
