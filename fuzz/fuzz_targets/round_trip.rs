#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(value) = jsontext::parse(text) else {
        return;
    };
    // Anything the reader accepts must render back to text the reader
    // accepts again, producing an equal tree.
    let rendered = value.to_string();
    let reparsed = jsontext::parse(&rendered).expect("rendered output must parse");
    assert_eq!(value, reparsed);
});
