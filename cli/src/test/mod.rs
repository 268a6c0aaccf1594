#![allow(clippy::unwrap_used)]

use predicates::prelude::{
    predicate::str::{contains, is_empty},
    PredicateBooleanExt,
};
use test_context::TestContext;


#[test]
fn test_profile_arg() {
    // --profile-path beats SIMPLENOTE_PROFILE
    let ctx = TestContext::new();
    std::fs::write(ctx.path("work.toml"), "username = \"work@example.com\"\n").unwrap();

    let assert = ctx
        .command()
        .env("SIMPLENOTE_PROFILE", "wrong_profile")
        .args(["--profile-path", ctx.path("work.toml").to_str().unwrap()])
        .arg("config")
        .assert();

    assert
        .success()
        .stdout(
            contains(r#""username": "work@example.com""#)
                .and(contains(r#""profile_exists": true"#)),
        )
        .stderr(is_empty());
}

#[test]
fn test_profile_env_names_profile_in_config_dir() {
    let ctx = TestContext::new();
    let profiles = ctx.path("config").join("simplenote").join("profiles");
    std::fs::create_dir_all(&profiles).unwrap();
    std::fs::write(
        profiles.join("home.toml"),
        "username = \"home@example.com\"\ndialect = \"legacy\"\nnotes_path = \"home.json\"\n",
    )
    .unwrap();

    let assert = ctx
        .command()
        .env("SIMPLENOTE_PROFILE", "home")
        .arg("config")
        .assert();

    assert.success().stdout(
        contains(r#""username": "home@example.com""#)
            .and(contains(r#""dialect": "legacy""#))
            .and(contains(r#""notes_path": "home.json""#)),
    );
}

#[test]
fn test_config_never_prints_secrets() {
    let ctx = TestContext::new();

    let assert = ctx
        .command()
        .env("SIMPLENOTE_PASSWORD", "hunter2")
        .args(["config", "SECRETKEY", "me@example.com"])
        .assert();

    assert.success().stdout(
        contains(r#""password": "***""#)
            .and(contains(r#""username": "me@example.com""#))
            .and(contains("hunter2").not())
            .and(contains("SECRETKEY").not()),
    );
}

#[test]
fn test_config_defaults() {
    let ctx = TestContext::new();

    let assert = ctx.command().arg("config").assert();

    assert.success().stdout(
        contains(r#""notes_path": "notes.json""#)
            .and(contains(r#""log_path": "log.txt""#))
            .and(contains(r#""dialect": "simperium""#))
            .and(contains(r#""profile_exists": false"#)),
    );
}

#[test]
fn test_missing_credentials_fail() {
    let ctx = TestContext::new();

    let assert = ctx.command().arg("download-all").assert();

    assert
        .failure()
        .code(1)
        .stdout(is_empty())
        .stderr(contains("Error: No username given"));
}

#[test]
fn test_broken_profile_fails() {
    let ctx = TestContext::new();
    std::fs::write(ctx.path("bad.toml"), "username = [").unwrap();

    let assert = ctx
        .command()
        .args(["--profile-path", "bad.toml", "config"])
        .assert();

    assert
        .failure()
        .stderr(contains("Failed to deserialize profile"));
}
