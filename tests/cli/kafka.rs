//! Tests for `opskit kafka diff` and `opskit kafka sync`.

use crate::support::*;

#[test]
fn test_diff_shows_plan_without_writing() {
    let t = Test::new();
    let env = t.store("env.json", ENV_SECRETS);
    let kafka = t.store("kafka.json", KAFKA_SECRETS);
    let before = t.read_store("env.json");

    let output = t.diff(&env, &kafka, "blue");

    assert_success(&output);
    assert_stdout_contains(&output, "~ kafka-broker-api-secret-blue → kafka-broker-api-secret");
    assert_stdout_contains(&output, "+ kafka-broker-bootstrap-blue → kafka-broker-bootstrap");
    assert_stdout_contains(
        &output,
        "- kafka-broker-legacy-endpoint  (broker credential, not in the blue cluster)",
    );
    assert_stdout_excludes(&output, "database-url");
    assert_stdout_excludes(&output, "BS-2");
    assert_eq!(t.read_store("env.json"), before);
}

#[test]
fn test_diff_changed_secret() {
    let t = Test::new();
    let env = t.store("env.json", &[("broker-key", "A")]);
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.diff(&env, &kafka, "blue");

    assert_success(&output);
    assert_stdout_contains(&output, "~ broker-key-blue → broker-key");
    assert_stdout_excludes(&output, "+ ");
}

#[test]
fn test_diff_new_secret_into_empty_store() {
    let t = Test::new();
    let env = t.store("env.json", &[]);
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.diff(&env, &kafka, "blue");

    assert_success(&output);
    assert_stdout_contains(&output, "+ broker-key-blue → broker-key");
}

#[test]
fn test_diff_in_sync_ignores_unrelated() {
    let t = Test::new();
    let env = t.store("env.json", &[("broker-key", "A"), ("unrelated-setting", "X")]);
    let kafka = t.store("kafka.json", &[("broker-key-blue", "A")]);

    let output = t.diff(&env, &kafka, "blue");

    assert_success(&output);
    assert_stdout_contains(&output, "already in sync");
    assert_stdout_excludes(&output, "unrelated-setting");
}

#[test]
fn test_diff_reports_broker_key_mismatch_without_prompting() {
    let t = Test::new();
    let env = t.store("env.json", ENV_SECRETS);
    let kafka = t.store("kafka.json", KAFKA_SECRETS);

    let output = t.diff(&env, &kafka, "green");

    assert_success(&output);
    assert_stdout_contains(&output, "kafka-broker-api-key differs from the active cluster");
    assert_stdout_contains(&output, "~ kafka-broker-api-key-green → kafka-broker-api-key");
}

#[test]
fn test_sync_yes_copies_new_and_changed() {
    let t = Test::new();
    let env = t.store("env.json", ENV_SECRETS);
    let kafka = t.store("kafka.json", KAFKA_SECRETS);

    let output = t.sync_yes(&env, &kafka, "blue");

    assert_success(&output);
    assert_stdout_contains(&output, "copied 2 secrets");
    assert_store(
        &t.read_store("env.json"),
        &[
            ("kafka-active-color", "blue"),
            ("kafka-broker-api-key", "BK-2"),
            ("kafka-broker-api-secret", "BS-2"),
            ("kafka-schema-registry-api-key", "SK-1"),
            ("kafka-broker-legacy-endpoint", "old.example:9092"),
            ("database-url", "postgres://db/app"),
            ("kafka-broker-bootstrap", "blue.example:9092"),
        ],
    );
}

#[test]
fn test_sync_never_deletes_obsolete() {
    let t = Test::new();
    let env = t.store("env.json", ENV_SECRETS);
    let kafka = t.store("kafka.json", KAFKA_SECRETS);

    let output = t.sync_yes(&env, &kafka, "blue");

    assert_success(&output);
    assert_stdout_contains(&output, "1 obsolete secret left in place");
    assert!(t
        .read_store("env.json")
        .iter()
        .any(|(k, _)| k == "kafka-broker-legacy-endpoint"));
}

#[test]
fn test_sync_is_idempotent() {
    let t = Test::new();
    let env = t.store("env.json", ENV_SECRETS);
    let kafka = t.store("kafka.json", KAFKA_SECRETS);

    assert_success(&t.sync_yes(&env, &kafka, "blue"));
    let after_first = t.read_store("env.json");

    let output = t.sync_yes(&env, &kafka, "blue");

    assert_success(&output);
    assert_stdout_contains(&output, "already in sync");
    assert_eq!(t.read_store("env.json"), after_first);
}

#[test]
fn test_sync_answer_yes_from_stdin() {
    let t = Test::new();
    let env = t.store("env.json", &[]);
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.sync_answering(&env, &kafka, "blue", "y\n");

    assert_success(&output);
    assert_stderr_contains(&output, "[yes/no/skip]");
    assert_store(&t.read_store("env.json"), &[("broker-key", "B")]);
}

#[test]
fn test_sync_reprompts_on_invalid_answer() {
    let t = Test::new();
    let env = t.store("env.json", &[]);
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.sync_answering(&env, &kafka, "blue", "perhaps\nyes\n");

    assert_success(&output);
    assert_stderr_contains(&output, "please answer yes/no/skip");
    assert_store(&t.read_store("env.json"), &[("broker-key", "B")]);
}

#[test]
fn test_sync_skip_writes_nothing() {
    let t = Test::new();
    let env = t.store("env.json", &[("broker-key", "A")]);
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.sync_answering(&env, &kafka, "blue", "skip\n");

    assert_success(&output);
    assert_stdout_contains(&output, "skipped");
    assert_store(&t.read_store("env.json"), &[("broker-key", "A")]);
}

#[test]
fn test_sync_no_aborts() {
    let t = Test::new();
    let env = t.store("env.json", &[("broker-key", "A")]);
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.sync_answering(&env, &kafka, "blue", "n\n");

    assert_failure(&output);
    assert_stderr_contains(&output, "aborted");
    assert_store(&t.read_store("env.json"), &[("broker-key", "A")]);
}

#[test]
fn test_sync_without_terminal_or_yes_declines() {
    let t = Test::new();
    let env = t.store("env.json", &[]);
    let kafka = t.store("kafka.json", &[("broker-key-blue", "B")]);

    let output = t.run(&["kafka", "sync", "--env", &env, "--kafka", &kafka, "--color", "blue"]);

    assert_failure(&output);
    assert_stderr_contains(&output, "aborted");
    assert!(t.read_store("env.json").is_empty());
}

#[test]
fn test_sync_dry_run_writes_nothing() {
    let t = Test::new();
    let env = t.store("env.json", ENV_SECRETS);
    let kafka = t.store("kafka.json", KAFKA_SECRETS);
    let before = t.read_store("env.json");

    let output = t.run(&[
        "--yes", "kafka", "sync", "--env", &env, "--kafka", &kafka, "--color", "blue", "--dry-run",
    ]);

    assert_success(&output);
    assert_stdout_contains(&output, "dry run");
    assert_eq!(t.read_store("env.json"), before);
}

#[test]
fn test_sync_dry_run_reports_broker_mismatch_without_prompt() {
    let t = Test::new();
    let env = t.store("env.json", ENV_SECRETS);
    let kafka = t.store("kafka.json", KAFKA_SECRETS);
    let before = t.read_store("env.json");

    let output = t.run_with_input(
        &[
            "kafka", "sync", "--env", &env, "--kafka", &kafka, "--color", "green", "--dry-run",
        ],
        "",
    );

    assert_success(&output);
    assert_stdout_contains(&output, "kafka-broker-api-key differs from the active cluster");
    assert_stdout_contains(&output, "green cluster");
    assert_stdout_contains(&output, "dry run: nothing written");
    assert_eq!(t.read_store("env.json"), before);
}

#[test]
fn test_sync_color_read_from_env_store() {
    let t = Test::new();
    let env = t.store("env.json", ENV_SECRETS);
    let kafka = t.store("kafka.json", KAFKA_SECRETS);

    let output = t.run(&["--yes", "kafka", "sync", "--env", &env, "--kafka", &kafka]);

    assert_success(&output);
    assert_stdout_contains(&output, "blue cluster");
    assert!(t
        .read_store("env.json")
        .contains(&("kafka-broker-api-secret".to_string(), "BS-2".to_string())));
}

#[test]
fn test_sync_broker_mismatch_declined() {
    let t = Test::new();
    let env = t.store("env.json", ENV_SECRETS);
    let kafka = t.store("kafka.json", KAFKA_SECRETS);
    let before = t.read_store("env.json");

    let output = t.sync_answering(&env, &kafka, "green", "no\n");

    assert_failure(&output);
    assert_stderr_contains(&output, "Broker api key 'kafka-broker-api-key' differs");
    assert_eq!(t.read_store("env.json"), before);
}

#[test]
fn test_sync_broker_mismatch_confirmed() {
    let t = Test::new();
    let env = t.store("env.json", ENV_SECRETS);
    let kafka = t.store("kafka.json", KAFKA_SECRETS);

    let output = t.sync_answering(&env, &kafka, "green", "yes\nyes\n");

    assert_success(&output);
    assert!(t
        .read_store("env.json")
        .contains(&("kafka-broker-api-key".to_string(), "BK-1".to_string())));
}

#[test]
fn test_sync_schema_registry_mismatch_is_fatal() {
    let t = Test::new();
    let env = t.store("env.json", &[("kafka-schema-registry-api-key", "SK-old")]);
    let kafka = t.store(
        "kafka.json",
        &[("kafka-schema-registry-api-key-blue", "SK-new")],
    );

    let output = t.sync_yes(&env, &kafka, "blue");

    assert_failure(&output);
    assert_stderr_contains(&output, "schema registry api key");
    assert_store(
        &t.read_store("env.json"),
        &[("kafka-schema-registry-api-key", "SK-old")],
    );
}

#[test]
fn test_custom_api_key_names_from_config() {
    let t = Test::new();
    t.config("[kafka]\nschema_registry_api_key = \"sr-key\"\n");
    let env = t.store("env.json", &[("sr-key", "old")]);
    let kafka = t.store("kafka.json", &[("sr-key-blue", "new")]);

    let output = t.sync_yes(&env, &kafka, "blue");

    assert_failure(&output);
    assert_stderr_contains(&output, "'sr-key'");
}
