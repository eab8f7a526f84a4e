use std::env;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use aptscout_cli::commands::{commute, config, doctor, search};
use aptscout_core::TravelMode;
use aptscout_inventory::fixtures;
use serde_json::Value;

#[test]
fn search_prints_matching_listings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dataset = fixtures::write_fixture(dir.path()).expect("fixture");

    with_env(&[("APTSCOUT_DATASET_PATH", path_str(&dataset))], || {
        let result = search::run("Austin", "TX", 2000.0);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let rows = payload.as_array().expect("array");
        let ids: Vec<&str> = rows.iter().filter_map(|row| row["id"].as_str()).collect();
        assert_eq!(ids, vec!["1002", "1004", "1007"]);
    });
}

#[test]
fn search_without_matches_explains_the_empty_result() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dataset = fixtures::write_fixture(dir.path()).expect("fixture");

    with_env(&[("APTSCOUT_DATASET_PATH", path_str(&dataset))], || {
        let result = search::run("Austin", "TX", 900.0);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["count"], 0);
        assert_eq!(payload["message"], "No apartments found in Austin, TX under $900.");
    });
}

#[test]
fn search_reports_unavailable_dataset_with_dedicated_exit_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.csv");

    with_env(&[("APTSCOUT_DATASET_PATH", path_str(&missing))], || {
        let result = search::run("Austin", "TX", 2500.0);
        assert_eq!(result.exit_code, search::EXIT_UNAVAILABLE);
        assert_eq!(result.output, r#"{"error":"Database is unavailable."}"#);
    });
}

#[test]
fn search_returns_config_failure_for_invalid_timeout() {
    with_env(&[("APTSCOUT_MAPS_TIMEOUT_SECS", "0")], || {
        let result = search::run("Austin", "TX", 2500.0);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "search");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn commute_without_credential_prints_error_line() {
    with_env(&[], || {
        let result =
            commute::run(vec!["30.2672,-97.7431".to_string()], "Airport", TravelMode::Driving);
        assert_eq!(result.exit_code, commute::EXIT_COMMUTE_FAILED);
        assert!(result.output.starts_with("Error connecting to Maps MCP:"));
        assert!(result.output.contains("API key"));
    });
}

#[test]
fn commute_with_unreachable_server_fails_softly() {
    with_env(
        &[
            ("APTSCOUT_MAPS_COMMAND", "/nonexistent/aptscout-maps-server"),
            ("APTSCOUT_MAPS_API_KEY", "test-key"),
        ],
        || {
            let result =
                commute::run(vec!["30.2672,-97.7431".to_string()], "Airport", TravelMode::Walking);
            assert_eq!(result.exit_code, commute::EXIT_COMMUTE_FAILED);
            assert!(result.output.starts_with("Error connecting to Maps MCP:"));
        },
    );
}

#[test]
fn commute_rejects_bad_origins_before_spawning() {
    with_env(&[("APTSCOUT_MAPS_API_KEY", "test-key")], || {
        let result = commute::run(vec!["downtown".to_string()], "Airport", TravelMode::Driving);
        assert_eq!(result.exit_code, commute::EXIT_COMMUTE_FAILED);
        assert!(result.output.contains("`downtown`"));
    });
}

#[test]
fn config_attributes_sources_and_redacts_key() {
    with_env(
        &[
            ("GOOGLE_MAPS_API_KEY", "AIzaSyD-0123456789abcdef"),
            ("APTSCOUT_MAPS_TIMEOUT_SECS", "45"),
        ],
        || {
            let result = config::run();
            assert_eq!(result.exit_code, 0);

            let output = result.output;
            assert!(!output.contains("0123456789abcdef"));
            assert!(output.contains("- maps.api_key = AIza*** (source: env (GOOGLE_MAPS_API_KEY))"));
            assert!(output
                .contains("- maps.timeout_secs = 45 (source: env (APTSCOUT_MAPS_TIMEOUT_SECS))"));
            assert!(output.contains("- maps.tool_name = maps_distance_matrix (source: default)"));
        },
    );
}

#[test]
fn doctor_passes_when_everything_is_ready() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dataset = fixtures::write_fixture(dir.path()).expect("fixture");
    let executable = env::current_exe().expect("test binary path");

    with_env(
        &[
            ("APTSCOUT_DATASET_PATH", path_str(&dataset)),
            ("APTSCOUT_MAPS_COMMAND", path_str(&executable)),
            ("APTSCOUT_MAPS_API_KEY", "test-key"),
        ],
        || {
            let result = doctor::run(true);
            let report = parse_payload(&result.output);

            assert_eq!(report["overall_status"], "pass", "report: {report}");
            assert_eq!(result.exit_code, 0);
            assert_eq!(check_status(&report, "dataset_availability"), "pass");
            assert_eq!(check_status(&report, "maps_command"), "pass");
        },
    );
}

#[test]
fn doctor_flags_missing_dataset_and_credential() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("missing.csv");

    with_env(&[("APTSCOUT_DATASET_PATH", path_str(&missing))], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, doctor::EXIT_NOT_READY);

        let report = parse_payload(&result.output);
        assert_eq!(report["overall_status"], "fail");
        assert_eq!(check_status(&report, "config_validation"), "pass");
        assert_eq!(check_status(&report, "dataset_availability"), "fail");
        assert_eq!(check_status(&report, "maps_credential"), "fail");
    });
}

#[test]
fn doctor_skips_dependent_checks_when_config_is_invalid() {
    with_env(&[("APTSCOUT_MAPS_TIMEOUT_SECS", "not-a-number")], || {
        let result = doctor::run(false);
        assert_eq!(result.exit_code, doctor::EXIT_NOT_READY);

        assert!(result.output.starts_with("doctor: one or more readiness checks failed"));
        assert!(result.output.contains("- [fail] config_validation:"));
        assert!(result.output.contains("- [skip] dataset_availability:"));
        assert!(result.output.contains("- [skip] maps_command:"));
    });
}

fn check_status<'a>(report: &'a Value, name: &str) -> &'a str {
    report["checks"]
        .as_array()
        .and_then(|checks| checks.iter().find(|check| check["name"] == name))
        .and_then(|check| check["status"].as_str())
        .unwrap_or("missing")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "APTSCOUT_DATASET_PATH",
        "APTSCOUT_MAPS_COMMAND",
        "APTSCOUT_MAPS_ARGS",
        "APTSCOUT_MAPS_API_KEY",
        "APTSCOUT_MAPS_API_KEY_ENV",
        "APTSCOUT_MAPS_TOOL_NAME",
        "APTSCOUT_MAPS_TIMEOUT_SECS",
        "APTSCOUT_LOGGING_LEVEL",
        "APTSCOUT_LOGGING_FORMAT",
        "APTSCOUT_LOG_LEVEL",
        "APTSCOUT_LOG_FORMAT",
        "GOOGLE_MAPS_API_KEY",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
