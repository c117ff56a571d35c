#![no_main]

use libfuzzer_sys::fuzz_target;

use easy_snmp::{Invocation, parse_result};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // printed varbind lines
    for line in text.lines() {
        let result = parse_result(line);
        let _ = result.try_converted_value();
    }

    // command tokens, split the way a shell would
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let _ = Invocation::parse(&tokens);
});
