//! Tests for error reporting, exit codes and CLI flags.

use predicates::prelude::*;

use crate::support::*;
use crate::{skip_without_git, skip_without_sh};

#[test]
fn test_help_lists_command_groups() {
    let t = Test::new();

    t.cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("kafka")
            .and(predicate::str::contains("vault"))
            .and(predicate::str::contains("fleet")),
    );
}

#[test]
fn test_sync_help_mentions_dry_run() {
    let t = Test::new();

    t.cmd()
        .args(["kafka", "sync", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.run(&["unknown-command"]);

    assert_failure(&output);
}

#[test]
fn test_missing_required_flag_exits_one() {
    let t = Test::new();
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.run(&["kafka", "diff", "--kafka", &kafka]);

    assert_failure(&output);
    assert_stderr_contains(&output, "--env");
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("opskit "));
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.run(&["completions", "bash"]);

    assert_success(&output);
    assert_stdout_contains(&output, "opskit");
}

#[test]
fn test_empty_source_store_fails() {
    let t = Test::new();
    let env = t.store("env.json", &[("broker-key", "A")]);
    let kafka = t.store("kafka.json", &[]);

    let output = t.diff(&env, &kafka, "blue");

    assert_failure(&output);
    assert_stderr_contains(&output, "has no secrets");
    assert_stdout_contains(&output, "check the --kafka store");
}

#[test]
fn test_missing_source_file_counts_as_empty() {
    let t = Test::new();
    let env = t.store("env.json", &[]);
    let kafka = locator(&t.path("missing.json"));

    let output = t.sync_yes(&env, &kafka, "blue");

    assert_failure(&output);
    assert_stderr_contains(&output, "has no secrets");
}

#[test]
fn test_invalid_color_fails() {
    let t = Test::new();
    let env = t.store("env.json", &[]);
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.diff(&env, &kafka, "purple");

    assert_failure(&output);
    assert_stderr_contains(&output, "invalid color 'purple'");
}

#[test]
fn test_invalid_color_in_store_fails() {
    let t = Test::new();
    let env = t.store("env.json", &[("kafka-active-color", "teal")]);
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.run(&["kafka", "diff", "--env", &env, "--kafka", &kafka]);

    assert_failure(&output);
    assert_stderr_contains(&output, "invalid color 'teal'");
}

#[test]
fn test_missing_color_suggests_flag() {
    let t = Test::new();
    let env = t.store("env.json", &[]);
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.run(&["kafka", "diff", "--env", &env, "--kafka", &kafka]);

    assert_failure(&output);
    assert_stderr_contains(&output, "active color unknown");
    assert_stdout_contains(&output, "pass --color");
}

#[test]
fn test_invalid_store_locator_fails() {
    let t = Test::new();
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.diff("x", &kafka, "blue");

    assert_failure(&output);
    assert_stderr_contains(&output, "invalid store 'x'");
}

#[test]
fn test_broken_config_fails() {
    let t = Test::new();
    t.config("[kafka\n");
    let env = t.store("env.json", &[]);
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.diff(&env, &kafka, "blue");

    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config");
}

#[test]
fn test_fleet_without_config_section_fails() {
    let t = Test::new();

    let output = t.run(&["fleet", "branches"]);

    assert_failure(&output);
    assert_stderr_contains(&output, "missing config field: fleet");
    assert_stdout_contains(&output, "[fleet]");
}

#[cfg(unix)]
#[test]
fn test_vault_access_denied_suggests_login() {
    skip_without_sh!();
    let t = Test::new();
    t.fake_tool(
        "az",
        "echo \"ERROR: (Forbidden) The user does not have secrets list permission on key vault 'kv-prod-env'\" >&2\nexit 1",
    );

    let output = t.run(&["vault", "list", "kv-prod-env"]);

    assert_failure(&output);
    assert_stderr_contains(&output, "access denied to kv-prod-env");
    assert_stdout_contains(&output, "az login");
}

#[cfg(unix)]
#[test]
fn test_subscription_passed_to_every_az_call() {
    skip_without_sh!();
    let t = Test::new();
    let log = t.home.path().join("az.log");
    t.fake_tool(
        "az",
        &format!(
            "echo \"$@\" >> '{}'\ncase \"$3\" in\n  list) echo '[\"kafka-broker-key-blue\"]' ;;\n  show) echo '\"B\"' ;;\nesac",
            log.display()
        ),
    );
    t.config("[azure]\nsubscription = \"sub-123\"\n");
    let env = t.store("env.json", &[]);

    let output = t.diff(&env, "kv-kafka-prod", "blue");

    assert_success(&output);
    assert_stdout_contains(&output, "+ kafka-broker-key-blue → kafka-broker-key");
    let calls = std::fs::read_to_string(&log).unwrap();
    assert!(!calls.is_empty());
    for line in calls.lines() {
        assert!(line.contains("--subscription sub-123"), "call without subscription: {}", line);
    }
}

#[cfg(unix)]
#[test]
fn test_confluent_not_logged_in() {
    skip_without_sh!();
    let t = Test::new();
    t.fake_tool(
        "confluent",
        "echo 'Error: you must log in to Confluent Cloud: run `confluent login`' >&2\nexit 1",
    );

    let output = t.run(&["kafka", "clusters"]);

    assert_failure(&output);
    assert_stderr_contains(&output, "confluent is not authorized");
    assert_stdout_contains(&output, "run: confluent login");
}

#[cfg(unix)]
#[test]
fn test_confluent_clusters_table() {
    skip_without_sh!();
    let t = Test::new();
    t.fake_tool(
        "confluent",
        r#"echo '[{"id":"lkc-1","name":"prod-blue","type":"DEDICATED","provider":"azure","region":"westeurope","status":"UP"}]'"#,
    );

    let output = t.run(&["kafka", "clusters"]);

    assert_success(&output);
    assert_stdout_contains(&output, "ID");
    assert_stdout_contains(&output, "lkc-1");
    assert_stdout_contains(&output, "prod-blue");
}

#[test]
fn test_fleet_missing_directory() {
    skip_without_git!();
    let t = Test::new();
    t.config(&fleet_config(&t.path("nowhere"), &[]));

    let output = t.run(&["fleet", "status"]);

    assert_failure(&output);
    assert_stderr_contains(&output, "fleet directory does not exist");
}
