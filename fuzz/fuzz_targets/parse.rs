#![no_main]

use colit::frontend::{lexer, parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Ignore invalid UTF-8
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(tokens) = lexer::lex(s) {
            let _ = parser::parse(&tokens);
        }
    }
});
