//! Test fixtures and constants.

/// Colored store of a cluster pair after a blue rotation.
pub const KAFKA_SECRETS: &[(&str, &str)] = &[
    ("kafka-broker-api-key-blue", "BK-2"),
    ("kafka-broker-api-key-green", "BK-1"),
    ("kafka-broker-api-secret-blue", "BS-2"),
    ("kafka-broker-api-secret-green", "BS-1"),
    ("kafka-schema-registry-api-key-blue", "SK-1"),
    ("kafka-schema-registry-api-key-green", "SK-1"),
    ("kafka-broker-bootstrap-blue", "blue.example:9092"),
];

/// Colorless store still pointing at the green cluster.
pub const ENV_SECRETS: &[(&str, &str)] = &[
    ("kafka-active-color", "blue"),
    ("kafka-broker-api-key", "BK-2"),
    ("kafka-broker-api-secret", "BS-1"),
    ("kafka-schema-registry-api-key", "SK-1"),
    ("kafka-broker-legacy-endpoint", "old.example:9092"),
    ("database-url", "postgres://db/app"),
];

/// Fleet config pointing at `directory`.
pub fn fleet_config(directory: &std::path::Path, blacklist: &[&str]) -> String {
    let blacklist: Vec<String> = blacklist.iter().map(|b| format!("\"{}\"", b)).collect();
    format!(
        "[fleet]\ndirectory = \"{}\"\nblacklist = [{}]\n",
        directory.display().to_string().replace('\\', "\\\\"),
        blacklist.join(", ")
    )
}
