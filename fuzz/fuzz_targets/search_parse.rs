#![no_main]

use libfuzzer_sys::fuzz_target;
use wire::{object_to_search_string, search_string_to_object};

fuzz_target!(|data: &[u8]| {
    let search = String::from_utf8_lossy(data);
    let parsed = search_string_to_object(&search);

    // Stringifying a parse and parsing again must be a fixed point.
    let text = object_to_search_string(&parsed);
    let reparsed = search_string_to_object(&text);
    assert_eq!(reparsed, parsed);
    assert_eq!(object_to_search_string(&reparsed), text);
});
