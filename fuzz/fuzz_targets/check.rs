#![no_main]

use colit::frontend::typechecker;
use libfuzzer_sys::fuzz_target;

// Literal resolution must report errors, never panic, whatever the input.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = typechecker::check_source(s);
    }
});
