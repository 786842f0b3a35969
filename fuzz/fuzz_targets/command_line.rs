//! Fuzz target for tokenizing and compiling command lines.
//!
//! Run with: cargo +nightly fuzz run command_line
//!
//! Properties checked:
//! - No panics for any input, in either compile mode or arity policy
//! - Prefix mode never consumes more words than it was given
//! - A compiled command reports the kind its first word names

#![no_main]

use libfuzzer_sys::fuzz_target;
use zippatch::command::{ArityPolicy, CommandKind, Compiler, split_line};

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(words) = split_line(line) else {
        return;
    };

    for arity in [ArityPolicy::Legacy, ArityPolicy::Strict] {
        let compiler = Compiler::new(arity);

        if let Ok(compiled) = compiler.compile(&words) {
            assert!(compiled.consumed <= words.len());
        }

        if let Ok(compiled) = compiler.compile_line(&words) {
            assert!(compiled.consumed <= words.len());
            if let Some(command) = compiled.command {
                assert_eq!(Some(command.kind()), CommandKind::from_alias(&words[0]));
            }
        }
    }
});
