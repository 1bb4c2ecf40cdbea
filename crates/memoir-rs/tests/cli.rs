//! End-to-end runs of the `memoir` command surface.

use clap::Parser;
use memoir_rs::cli::{Cli, run};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn invoke(base: &Path, args: &[&str]) -> anyhow::Result<Value> {
    let config = base.join("memoir.json5");
    let config = config.to_string_lossy().to_string();
    let mut argv = vec!["memoir", "--config", config.as_str()];
    argv.extend_from_slice(args);
    run(Cli::try_parse_from(argv)?, base)
}

fn contents(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|messages| {
            messages
                .iter()
                .filter_map(|message| message["content"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn append_recent_and_profile_round_trip() {
    let temp = tempdir().expect("tempdir");
    fs::write(
        temp.path().join("memoir.json5"),
        r#"{ memory: { backend: "sqlite", path: "data/memory.db", recent_limit: 3 } }"#,
    )
    .expect("config");

    for idx in 0..4 {
        invoke(temp.path(), &["append", "u1", "user", &format!("m{idx}")]).expect("append");
    }
    assert!(temp.path().join("data").join("memory.db").exists());

    let recent = invoke(temp.path(), &["recent", "u1"]).expect("recent");
    assert_eq!(contents(&recent), vec!["m1", "m2", "m3"]);
    let recent = invoke(temp.path(), &["recent", "u1", "--limit", "1"]).expect("recent");
    assert_eq!(contents(&recent), vec!["m3"]);

    let profile = invoke(temp.path(), &["set-profile", "u1", "city=Paris", "lang=fr"])
        .expect("set-profile");
    assert_eq!(profile, json!({ "city": "Paris", "lang": "fr" }));

    let observed = invoke(temp.path(), &["observe", "u1", "Call me maybe, my name is Zoe"])
        .expect("observe");
    assert_eq!(observed, json!({ "name": "zoe" }));
    let profile = invoke(temp.path(), &["profile", "u1"]).expect("profile");
    assert_eq!(
        profile,
        json!({ "city": "Paris", "lang": "fr", "name": "zoe" })
    );
}

#[test]
fn rejects_unknown_role() {
    let temp = tempdir().expect("tempdir");
    fs::write(
        temp.path().join("memoir.json5"),
        r#"{ memory: { backend: "jsonl" } }"#,
    )
    .expect("config");
    assert!(invoke(temp.path(), &["append", "u1", "system", "hi"]).is_err());
    let recent = invoke(temp.path(), &["recent", "u1"]).expect("recent");
    assert!(contents(&recent).is_empty());
    assert!(temp.path().join("chat_history").is_dir());
}

#[test]
fn invalid_config_is_reported() {
    let temp = tempdir().expect("tempdir");
    fs::write(
        temp.path().join("memoir.json5"),
        "{ memory: { recent_limit: 0 } }",
    )
    .expect("config");
    let err = invoke(temp.path(), &["profile", "u1"]).expect_err("invalid config");
    assert!(format!("{err:#}").contains("memory.recent_limit"));
}
