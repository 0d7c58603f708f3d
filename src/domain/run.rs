use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TestRun {
    pub run_id: String,
    pub environment: String,
    pub started_at: String,
    pub summary: RunSummary,
    #[serde(default)]
    pub test_suites: Vec<TestSuite>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RunSummary {
    pub total_test_cases: u64,
    pub passed: u64,
    pub failed: u64,
    pub flaky: u64,
    pub skipped: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TestSuite {
    pub suite_name: String,
    pub total_cases: u64,
    pub passed: u64,
    pub failed: u64,
    pub duration_ms: u64,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TestCase {
    pub name: String,
    pub status: CaseStatus,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Passed,
    Failed,
    Flaky,
    Skipped,
}

/// Outcome of the atomic run insert. `Duplicate` is a success signal, not
/// an error; a unique-key violation on (project_id, run_id) maps here and
/// nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunInsert {
    Created,
    Duplicate,
}
