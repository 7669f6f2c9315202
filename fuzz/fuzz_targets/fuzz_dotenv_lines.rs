#![no_main]

use std::io::BufRead;

use arbitrary::Arbitrary;
use envtype::{EnvStore, MemoryEnv, load_reader_into};
use libfuzzer_sys::fuzz_target;

/// Structured input: lines joined with '\n' before loading
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    lines: Vec<String>,
}

fuzz_target!(|input: FuzzInput| {
    let content = input.lines.join("\n");
    let store = MemoryEnv::new();
    let summary = load_reader_into(&store, content.as_bytes());

    // Same line splitting as the loader, which also drops a CR left at EOF
    let lines: Vec<String> = content
        .as_bytes()
        .lines()
        .map_while(Result::ok)
        .map(|l| l.strip_suffix('\r').map(str::to_string).unwrap_or(l))
        .collect();

    // Every line is accounted for exactly once
    assert_eq!(summary.lines(), lines.len());
    assert!(store.len() <= summary.applied);

    // NUL bytes make the store reject entries; skip the value check then
    if content.contains('\0') {
        return;
    }

    // The last assignment of each key wins
    let assignments: Vec<(&str, &str)> = lines
        .iter()
        .filter(|l| !l.starts_with('#'))
        .filter_map(|l| l.split_once('='))
        .filter(|(k, _)| !k.is_empty())
        .collect();

    for (key, _) in &assignments {
        let last = assignments
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v);
        assert_eq!(Some(store.get(key).as_str()), last);
    }
});
