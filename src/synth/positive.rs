use crate::analyzer::model::DetectedElements;
use crate::login::credentials::Credentials;
use crate::synth::ids::IdAllocator;
use crate::synth::test_case::{Category, Priority, TestCase};
use crate::synth::page_url;

const NON_ENTRY_TYPES: &[&str] = &["password", "hidden", "submit", "button"];

pub fn generate(
    detected: &DetectedElements,
    credentials: &Credentials,
    ids: &mut IdAllocator,
) -> Vec<TestCase> {
    let mut cases = Vec::new();

    if credentials.is_present() {
        cases.push(
            TestCase::new(
                ids.claim("POS_LOGIN_001".into()),
                Category::Positive,
                Priority::High,
                "Valid Login Test",
            )
            .describe("Verify user can login with valid credentials")
            .steps([
                format!("Navigate to {}", page_url(detected)),
                format!("Enter username: {}", credentials.login_id),
                "Enter password: [hidden]".to_string(),
                "Click login button".to_string(),
                "Verify successful login".to_string(),
            ])
            .expected("User should be logged in successfully"),
        );
    }

    for field in detected.fields.iter().filter(|f| !f.is_type(NON_ENTRY_TYPES)) {
        cases.push(
            TestCase::new(
                ids.issue("POS_INPUT_", &field.name),
                Category::Positive,
                Priority::Medium,
                format!("Valid input in {} field", field.name),
            )
            .describe(format!("Verify {} field accepts valid input", field.name))
            .steps([
                format!("Locate field: {}", field.name),
                "Enter valid test data".to_string(),
                "Verify input is accepted".to_string(),
            ])
            .expected("Field should accept valid input")
            .field(&field.name),
        );
    }

    for dropdown in &detected.dropdowns {
        let label = dropdown
            .name
            .as_deref()
            .or(dropdown.id.as_deref())
            .unwrap_or("dropdown");
        cases.push(
            TestCase::new(
                ids.issue("POS_DROPDOWN_", label),
                Category::Positive,
                Priority::Medium,
                format!("Valid selection in {} dropdown", label),
            )
            .describe(format!("Ensure dropdown {} accepts valid selections", label))
            .steps([
                format!("Locate dropdown: {}", label),
                "Open dropdown options".to_string(),
                "Select a valid option".to_string(),
                "Verify selection is applied".to_string(),
            ])
            .expected("Dropdown should update value with selected option")
            .field(label),
        );
    }

    cases
}
