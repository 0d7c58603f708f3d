//! Structural and semantic validation of inbound test-run payloads.
//!
//! Pure functions over the raw JSON body, run before any persistence
//! attempt:
//! - Every violation is collected; no rule short-circuits its siblings
//! - Errors carry the JSON path so clients can locate each problem
//! - Valid payloads deserialize losslessly into `domain::run::TestRun`

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Run identifiers carry the `tr_` namespace prefix with at least four
/// trailing characters, e.g. `tr_build_42`.
static RUN_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^tr_[A-Za-z0-9_-]{4,}$").unwrap());

const SUMMARY_COUNTS: [&str; 6] = [
    "total_test_cases",
    "passed",
    "failed",
    "flaky",
    "skipped",
    "duration_ms",
];

const SUITE_COUNTS: [&str; 4] = ["total_cases", "passed", "failed", "duration_ms"];

const CASE_STATUSES: [&str; 4] = ["passed", "failed", "flaky", "skipped"];

/// Validates a raw run payload. An empty vector means the payload is valid
/// and safe to deserialize into `TestRun`.
pub fn validate_run(payload: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    match payload.get("run_id") {
        None => errors.push("run_id is required".to_string()),
        Some(Value::String(run_id)) => {
            if run_id.trim().is_empty() {
                errors.push("run_id must be a non-empty string".to_string());
            } else if !RUN_ID_PATTERN.is_match(run_id) {
                errors.push(
                    "run_id must start with 'tr_' followed by at least 4 characters \
                     (letters, digits, '_' or '-')"
                        .to_string(),
                );
            }
        }
        Some(_) => errors.push("run_id must be a string".to_string()),
    }

    require_string(payload, "environment", &mut errors);

    match payload.get("started_at") {
        None => errors.push("started_at is required".to_string()),
        Some(Value::String(ts)) => {
            if DateTime::parse_from_rfc3339(ts).is_err() {
                errors.push("started_at must be an RFC 3339 date-time".to_string());
            }
        }
        Some(_) => errors.push("started_at must be a string".to_string()),
    }

    match payload.get("summary") {
        None => errors.push("summary is required".to_string()),
        Some(Value::Object(_)) => {
            let summary = &payload["summary"];
            for field in SUMMARY_COUNTS {
                require_count(summary, field, &format!("summary.{}", field), &mut errors);
            }
        }
        Some(_) => errors.push("summary must be an object".to_string()),
    }

    match payload.get("test_suites") {
        None | Some(Value::Null) => {}
        Some(Value::Array(suites)) => {
            for (i, suite) in suites.iter().enumerate() {
                validate_suite(suite, i, &mut errors);
            }
        }
        Some(_) => errors.push("test_suites must be an array".to_string()),
    }

    errors
}

fn validate_suite(suite: &Value, index: usize, errors: &mut Vec<String>) {
    let path = format!("test_suites[{}]", index);
    if !suite.is_object() {
        errors.push(format!("{} must be an object", path));
        return;
    }

    match suite.get("suite_name") {
        None => errors.push(format!("{}.suite_name is required", path)),
        Some(Value::String(name)) if !name.trim().is_empty() => {}
        Some(_) => errors.push(format!("{}.suite_name must be a non-empty string", path)),
    }

    for field in SUITE_COUNTS {
        require_count(suite, field, &format!("{}.{}", path, field), errors);
    }

    match suite.get("test_cases") {
        None | Some(Value::Null) => {}
        Some(Value::Array(cases)) => {
            for (j, case) in cases.iter().enumerate() {
                validate_case(case, &format!("{}.test_cases[{}]", path, j), errors);
            }
        }
        Some(_) => errors.push(format!("{}.test_cases must be an array", path)),
    }
}

fn validate_case(case: &Value, path: &str, errors: &mut Vec<String>) {
    if !case.is_object() {
        errors.push(format!("{} must be an object", path));
        return;
    }

    match case.get("name") {
        None => errors.push(format!("{}.name is required", path)),
        Some(Value::String(name)) if !name.trim().is_empty() => {}
        Some(_) => errors.push(format!("{}.name must be a non-empty string", path)),
    }

    match case.get("status") {
        None => errors.push(format!("{}.status is required", path)),
        Some(Value::String(status)) if CASE_STATUSES.contains(&status.as_str()) => {}
        Some(_) => errors.push(format!(
            "{}.status must be one of: passed, failed, flaky, skipped",
            path
        )),
    }

    require_count(case, "duration_ms", &format!("{}.duration_ms", path), errors);
}

fn require_string(payload: &Value, key: &str, errors: &mut Vec<String>) {
    match payload.get(key) {
        None => errors.push(format!("{} is required", key)),
        Some(Value::String(value)) if !value.trim().is_empty() => {}
        Some(_) => errors.push(format!("{} must be a non-empty string", key)),
    }
}

fn require_count(parent: &Value, key: &str, path: &str, errors: &mut Vec<String>) {
    match parent.get(key) {
        None => errors.push(format!("{} is required", path)),
        Some(value) if value.as_u64().is_some() => {}
        Some(_) => errors.push(format!("{} must be a non-negative integer", path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "run_id": "tr_build_42",
            "environment": "staging",
            "started_at": "2026-08-01T10:30:00Z",
            "summary": {
                "total_test_cases": 3,
                "passed": 2,
                "failed": 1,
                "flaky": 0,
                "skipped": 0,
                "duration_ms": 900
            },
            "test_suites": [
                {
                    "suite_name": "checkout",
                    "total_cases": 3,
                    "passed": 2,
                    "failed": 1,
                    "duration_ms": 900,
                    "test_cases": [
                        {"name": "adds item", "status": "passed", "duration_ms": 300},
                        {"name": "applies coupon", "status": "failed", "duration_ms": 400,
                         "error_message": "expected 9.99, got 12.99"},
                        {"name": "empty cart", "status": "passed", "duration_ms": 200}
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_valid_payload_has_no_errors() {
        assert!(validate_run(&valid_payload()).is_empty());
    }

    #[test]
    fn test_valid_payload_deserializes() {
        let run: crate::domain::run::TestRun =
            serde_json::from_value(valid_payload()).unwrap();
        assert_eq!(run.run_id, "tr_build_42");
        assert_eq!(run.test_suites[0].test_cases.len(), 3);
    }

    #[test]
    fn test_missing_run_id() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("run_id");
        let errors = validate_run(&payload);
        assert!(errors.iter().any(|e| e == "run_id is required"));
    }

    #[test]
    fn test_run_id_without_prefix_rejected() {
        let mut payload = valid_payload();
        payload["run_id"] = json!("bad-id");
        let errors = validate_run(&payload);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("tr_"));
    }

    #[test]
    fn test_run_id_prefix_needs_minimum_length() {
        let mut payload = valid_payload();
        payload["run_id"] = json!("tr_ab");
        assert_eq!(validate_run(&payload).len(), 1);

        payload["run_id"] = json!("tr_abcd");
        assert!(validate_run(&payload).is_empty());
    }

    #[test]
    fn test_all_violations_collected_together() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("environment");
        payload["summary"]["passed"] = json!("two");
        let errors = validate_run(&payload);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e == "environment is required"));
        assert!(errors
            .iter()
            .any(|e| e == "summary.passed must be a non-negative integer"));
    }

    #[test]
    fn test_unparseable_timestamp() {
        let mut payload = valid_payload();
        payload["started_at"] = json!("yesterday at noon");
        let errors = validate_run(&payload);
        assert_eq!(errors, vec!["started_at must be an RFC 3339 date-time"]);
    }

    #[test]
    fn test_negative_summary_count() {
        let mut payload = valid_payload();
        payload["summary"]["failed"] = json!(-1);
        let errors = validate_run(&payload);
        assert_eq!(
            errors,
            vec!["summary.failed must be a non-negative integer"]
        );
    }

    #[test]
    fn test_summary_missing_entirely() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("summary");
        assert_eq!(validate_run(&payload), vec!["summary is required"]);
    }

    #[test]
    fn test_test_suites_must_be_array() {
        let mut payload = valid_payload();
        payload["test_suites"] = json!({"suite_name": "checkout"});
        assert_eq!(validate_run(&payload), vec!["test_suites must be an array"]);
    }

    #[test]
    fn test_suite_and_case_errors_are_indexed() {
        let mut payload = valid_payload();
        payload["test_suites"][0]["suite_name"] = json!("");
        payload["test_suites"][0]["test_cases"][1]["status"] = json!("errored");
        let errors = validate_run(&payload);
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| e == "test_suites[0].suite_name must be a non-empty string"));
        assert!(errors.iter().any(|e| e
            == "test_suites[0].test_cases[1].status must be one of: passed, failed, flaky, skipped"));
    }

    #[test]
    fn test_absent_test_suites_is_fine() {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove("test_suites");
        assert!(validate_run(&payload).is_empty());
    }
}
