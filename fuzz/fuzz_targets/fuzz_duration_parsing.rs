#![no_main]

use envtype::{EnvStore, MemoryEnv, declare, parse_duration};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // parse_duration must never panic and must be deterministic
    let first = parse_duration(data);
    let second = parse_duration(data);
    assert_eq!(first, second, "parse_duration should be deterministic");

    // Anything accepted also resolves through the typed accessor
    if let Ok(expected) = first {
        let store = MemoryEnv::new();
        if store.set("FUZZ", data).is_ok() {
            let resolved = declare("FUZZ")
                .as_duration()
                .required()
                .resolve_from(&store)
                .expect("accepted literal should resolve");
            assert_eq!(resolved, expected);
        }
    }
});
