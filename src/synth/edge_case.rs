use crate::analyzer::model::{DetectedElements, Field};
use crate::login::credentials::Credentials;
use crate::synth::ids::IdAllocator;
use crate::synth::test_case::{Category, Priority, TestCase};
use crate::synth::{TEXT_ENTRY_TYPES, page_url};

/// Text-entry fields that get edge-case tests.
pub const MAX_EDGE_FIELDS: usize = 10;

/// Paginated tables that get a pagination edge test.
pub const MAX_EDGE_TABLES: usize = 5;

pub fn generate(
    detected: &DetectedElements,
    credentials: &Credentials,
    ids: &mut IdAllocator,
) -> Vec<TestCase> {
    let url = page_url(detected);
    let mut cases = Vec::new();

    let eligible: Vec<&Field> = detected
        .fields
        .iter()
        .filter(|f| f.is_type(TEXT_ENTRY_TYPES))
        .collect();
    // Required fields are capped on their own so every required entry field
    // up to the cap is covered, whatever its position.
    let required: Vec<&Field> = detected
        .required_fields()
        .filter(|f| f.is_type(TEXT_ENTRY_TYPES))
        .take(MAX_EDGE_FIELDS)
        .collect();

    for field in eligible.iter().take(MAX_EDGE_FIELDS) {
        let name = &field.name;
        cases.push(
            TestCase::new(
                ids.issue("EDGE_MAX_LENGTH_", name),
                Category::EdgeCase,
                Priority::Medium,
                format!("Maximum Length Test - {}", name),
            )
            .describe("Test field accepts maximum allowed characters")
            .steps([
                format!("Navigate to page: {}", url),
                format!("Locate field: {}", name),
                "Generate input with maximum allowed length".to_string(),
                "Enter maximum length value".to_string(),
                "Verify field accepts the input".to_string(),
                "Verify field truncates or validates correctly".to_string(),
            ])
            .expected("Field should handle maximum length input correctly")
            .field(name)
            .test_type("boundary"),
        );

        if required.iter().any(|r| std::ptr::eq(*r, *field)) {
            cases.push(empty_required(url, field, ids));
        }

        cases.push(
            TestCase::new(
                ids.issue("EDGE_SPECIAL_CHARS_", name),
                Category::EdgeCase,
                Priority::Medium,
                format!("Special Characters Test - {}", name),
            )
            .describe("Test field handling of special characters")
            .steps([
                format!("Navigate to page: {}", url),
                format!("Locate field: {}", name),
                "Enter value with special characters (!@#$%^&*)".to_string(),
                "Verify field accepts or rejects correctly".to_string(),
                "Verify proper sanitization or validation".to_string(),
            ])
            .expected("Field should handle special characters appropriately")
            .field(name)
            .test_type("validation"),
        );
    }

    // Required fields past the first batch of entry fields.
    for field in required
        .iter()
        .filter(|r| !eligible.iter().take(MAX_EDGE_FIELDS).any(|e| std::ptr::eq(*e, **r)))
    {
        cases.push(empty_required(url, field, ids));
    }

    let paginated = detected
        .table_details
        .iter()
        .take(MAX_EDGE_TABLES)
        .filter(|t| t.pagination.exists);
    for table in paginated {
        cases.push(
            TestCase::new(
                ids.issue("EDGE_TABLE_PAGINATION_", &table.id),
                Category::EdgeCase,
                Priority::Medium,
                format!("Table Pagination Edge Case - {}", table.id),
            )
            .describe("Test table pagination edge cases (first, last, empty)")
            .steps([
                format!("Navigate to page: {}", url),
                format!("Locate table: {}", table.id),
                "Navigate to first page".to_string(),
                "Verify first page displays correctly".to_string(),
                "Navigate to last page".to_string(),
                "Verify last page displays correctly".to_string(),
                "Test empty table scenario (if applicable)".to_string(),
                "Verify pagination controls work correctly".to_string(),
            ])
            .expected("Table pagination should handle edge cases correctly")
            .test_type("pagination"),
        );
    }

    if !detected.buttons.is_empty() {
        cases.push(
            TestCase::new(
                ids.claim("EDGE_RAPID_CLICKS".into()),
                Category::EdgeCase,
                Priority::Medium,
                "Rapid Button Clicks Test",
            )
            .describe("Test behavior when button is clicked rapidly multiple times")
            .steps([
                format!("Navigate to page: {}", url),
                "Locate a submit/submit-like button".to_string(),
                "Click button rapidly 3-5 times".to_string(),
                "Verify system handles rapid clicks correctly".to_string(),
                "Verify no duplicate submissions occur".to_string(),
                "Verify button state updates correctly".to_string(),
            ])
            .expected("System should prevent duplicate submissions from rapid clicks")
            .test_type("concurrency"),
        );
    }

    if credentials.is_present() {
        cases.push(
            TestCase::new(
                ids.claim("EDGE_SESSION_TIMEOUT".into()),
                Category::EdgeCase,
                Priority::High,
                "Session Timeout Test",
            )
            .describe("Test behavior when session expires")
            .steps([
                "Login to system",
                "Wait for session to timeout (or simulate timeout)",
                "Attempt to perform an action",
                "Verify session expired message is displayed",
                "Verify user is redirected to login page",
                "Verify user can login again after timeout",
            ])
            .expected("System should handle session timeout gracefully")
            .test_type("session"),
        );
    }

    cases
}

fn empty_required(url: &str, field: &Field, ids: &mut IdAllocator) -> TestCase {
    let name = &field.name;
    TestCase::new(
        ids.issue("EDGE_EMPTY_REQUIRED_", name),
        Category::EdgeCase,
        Priority::High,
        format!("Empty Required Field Test - {}", name),
    )
    .describe("Test validation when required field is empty")
    .steps([
        format!("Navigate to page: {}", url),
        format!("Locate required field: {}", name),
        "Leave field empty".to_string(),
        "Attempt to submit form".to_string(),
        "Verify error message is displayed".to_string(),
        "Verify form does not submit".to_string(),
    ])
    .expected("Required field should show validation error when empty")
    .field(name)
    .test_type("validation")
}
