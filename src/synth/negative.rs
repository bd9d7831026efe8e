use crate::analyzer::model::DetectedElements;
use crate::synth::ids::IdAllocator;
use crate::synth::test_case::{Category, Priority, TestCase};
use crate::synth::{PAYLOAD_TYPES, TEXT_ENTRY_TYPES, field_label};

pub const SQL_INJECTION_PAYLOAD: &str = "admin' OR '1'='1";

pub const XSS_PAYLOAD: &str = "<script>alert(\"XSS\")</script>";

/// Fields that get injection payload tests.
pub const MAX_PAYLOAD_FIELDS: usize = 10;

struct LoginScenario {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    steps: [&'static str; 4],
    expected: &'static str,
    priority: Priority,
}

const LOGIN_SCENARIOS: [LoginScenario; 5] = [
    LoginScenario {
        id: "NEG_LOGIN_001",
        name: "Login with empty username",
        description: "Verify error message when username is empty",
        steps: [
            "Navigate to login page",
            "Leave username field empty",
            "Enter password",
            "Click login button",
        ],
        expected: "Error message should be displayed",
        priority: Priority::High,
    },
    LoginScenario {
        id: "NEG_LOGIN_002",
        name: "Login with empty password",
        description: "Verify error message when password is empty",
        steps: [
            "Navigate to login page",
            "Enter username",
            "Leave password field empty",
            "Click login button",
        ],
        expected: "Error message should be displayed",
        priority: Priority::High,
    },
    LoginScenario {
        id: "NEG_LOGIN_003",
        name: "Login with invalid credentials",
        description: "Verify error message for invalid credentials",
        steps: [
            "Navigate to login page",
            "Enter invalid username: invalid_user",
            "Enter invalid password: invalid_pass",
            "Click login button",
        ],
        expected: "Invalid credentials error should be displayed",
        priority: Priority::High,
    },
    LoginScenario {
        id: "NEG_LOGIN_004",
        name: "Login with SQL injection attempt",
        description: "Verify system handles SQL injection attempts",
        steps: [
            "Navigate to login page",
            "Enter username: admin' OR '1'='1",
            "Enter password: test",
            "Click login button",
        ],
        expected: "SQL injection should be blocked",
        priority: Priority::Critical,
    },
    LoginScenario {
        id: "NEG_LOGIN_005",
        name: "Login with XSS attempt",
        description: "Verify system handles XSS attacks",
        steps: [
            "Navigate to login page",
            "Enter username: <script>alert(\"XSS\")</script>",
            "Enter password: test",
            "Click login button",
        ],
        expected: "XSS attack should be prevented",
        priority: Priority::Critical,
    },
];

const PAYLOADS: [(&str, &str, &str); 2] = [
    ("_SQLI", "SQL injection attempt", SQL_INJECTION_PAYLOAD),
    ("_XSS", "XSS script injection", XSS_PAYLOAD),
];

pub fn generate(detected: &DetectedElements, ids: &mut IdAllocator) -> Vec<TestCase> {
    let mut cases: Vec<TestCase> = LOGIN_SCENARIOS
        .iter()
        .map(|s| {
            TestCase::new(ids.claim(s.id.to_string()), Category::Negative, s.priority, s.name)
                .describe(s.description)
                .steps(s.steps)
                .expected(s.expected)
        })
        .collect();

    for field in &detected.fields {
        let name = &field.name;
        if field.required {
            cases.push(
                TestCase::new(
                    ids.issue_with_suffix("NEG_INPUT_", name, "_EMPTY"),
                    Category::Negative,
                    Priority::Medium,
                    format!("Empty {} field test", name),
                )
                .describe(format!("Verify {} field validation for empty input", name))
                .steps([
                    format!("Leave {} field empty", name),
                    "Submit form".to_string(),
                    "Verify validation error".to_string(),
                ])
                .expected("Validation error should be displayed")
                .field(name),
            );
        }
        if field.is_type(TEXT_ENTRY_TYPES) {
            cases.push(
                TestCase::new(
                    ids.issue_with_suffix("NEG_INPUT_", name, "_BOUNDARY"),
                    Category::Negative,
                    Priority::Medium,
                    format!("Boundary value test for {}", name),
                )
                .describe(format!("Test {} with boundary values", name))
                .steps([
                    format!("Enter very long text in {} field", name),
                    "Submit form".to_string(),
                    "Verify validation".to_string(),
                ])
                .expected("Field should handle boundary values correctly")
                .field(name),
            );
        }
    }

    let payload_fields = detected
        .fields
        .iter()
        .filter(|f| f.is_type(PAYLOAD_TYPES))
        .take(MAX_PAYLOAD_FIELDS);
    for field in payload_fields {
        let label = field_label(field);
        for (suffix, what, payload) in PAYLOADS {
            let mut case = TestCase::new(
                ids.issue_with_suffix("NEG_SECURITY_", label, suffix),
                Category::Negative,
                Priority::Critical,
                format!("{} in {}", what, label),
            )
            .describe(format!(
                "Test how {} handles {} payloads",
                label,
                what.to_lowercase()
            ))
            .steps([
                format!("Locate field: {}", label),
                format!("Enter payload: {}", payload),
                "Submit the enclosing form or action".to_string(),
                "Observe application response".to_string(),
            ])
            .expected("Application should reject or sanitize the malicious payload")
            .field(&field.name);
            case.field_id = field.id.clone();
            case.malicious_payload = Some(payload.to_string());
            cases.push(case);
        }
    }

    cases
}
