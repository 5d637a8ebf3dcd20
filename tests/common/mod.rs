#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use dotenv_rs::{EnvMap, EnvValue, parse_str};

/// Parse `input`, panicking with the error and input on failure.
pub fn parse_ok(input: &str) -> EnvMap {
    parse_str(input).unwrap_or_else(|e| {
        panic!(
            "failed to parse: {e}\n\
             --- input ---\n{input}"
        )
    })
}

/// Parse a single assignment and return its value.
pub fn value_of(input: &str) -> EnvValue {
    let env = parse_ok(input);
    assert_eq!(env.len(), 1, "expected one entry in {input:?}");
    env[0].clone()
}

/// Write `contents` to `name` inside `dir`.
pub fn write_env(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write env file");
    path
}
