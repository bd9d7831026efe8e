use crate::analyzer::model::DetectedElements;
use crate::analyzer::rules::classify_table;
use crate::synth::ids::IdAllocator;
use crate::synth::page_url;
use crate::synth::test_case::{Category, Priority, TableRef, TestCase};
use crate::synth::ui::iframe_label;

/// Links that get a navigation test.
pub const MAX_NAV_LINKS: usize = 15;

/// Button texts already covered by the login tests.
const LOGIN_BUTTON_TEXTS: &[&str] = &["login", "submit"];

const NON_INTERACTIVE_TYPES: &[&str] = &["hidden", "submit", "button", "password"];

pub fn generate(detected: &DetectedElements, ids: &mut IdAllocator) -> Vec<TestCase> {
    let url = page_url(detected);
    let mut cases = Vec::new();

    for link in detected.links.iter().take(MAX_NAV_LINKS) {
        cases.push(
            TestCase::new(
                ids.issue("FUNC_NAV_", &link.text),
                Category::Functional,
                Priority::Medium,
                format!("Verify navigation to {}", link.text),
            )
            .describe(format!("Test navigation functionality for {} link", link.text))
            .steps([
                format!("Navigate to page: {}", url),
                format!("Locate and click on link: {}", link.text),
                "Wait for page to load".to_string(),
                "Verify page navigation occurs".to_string(),
                "Verify new page URL is correct".to_string(),
                "Verify page loads without errors".to_string(),
                "Verify page content is displayed".to_string(),
                "Verify no broken links or missing resources".to_string(),
            ])
            .expected(
                "Page should navigate successfully without errors and display correct content",
            )
            .link(&link.href)
            .test_type("navigation"),
        );
    }

    let clickable = detected
        .buttons
        .iter()
        .filter(|b| !LOGIN_BUTTON_TEXTS.contains(&b.text.trim().to_lowercase().as_str()));
    for button in clickable {
        let text = &button.text;
        cases.push(
            TestCase::new(
                ids.issue("FUNC_BTN_", text),
                Category::Functional,
                Priority::Medium,
                format!("Verify {} button functionality", text),
            )
            .describe(format!("Test functionality of {} button", text))
            .steps([
                format!("Navigate to page: {}", url),
                format!("Locate button: {}", text),
                "Verify button is visible and enabled".to_string(),
                format!("Click button: {}", text),
                "Wait for action to complete".to_string(),
                "Verify expected action occurs".to_string(),
                "Verify no error messages are displayed".to_string(),
                "Verify page state changes if applicable".to_string(),
            ])
            .expected("Button should perform expected action without errors")
            .test_type("button_functionality"),
        );
    }

    for form in &detected.forms {
        let form_id = form.id.as_deref().unwrap_or("unknown");
        let mut case = TestCase::new(
            ids.issue("FUNC_FORM_", form_id),
            Category::Functional,
            Priority::High,
            "Verify form submission functionality",
        )
        .describe(format!("Test form submission for form: {}", form_id))
        .steps([
            format!("Navigate to page: {}", url),
            "Locate the form".to_string(),
            "Fill all required fields with valid data".to_string(),
            "Verify all fields are filled correctly".to_string(),
            "Submit the form".to_string(),
            "Wait for form submission to complete".to_string(),
            "Verify form submission is successful".to_string(),
            "Verify appropriate response is received".to_string(),
            "Verify success message or redirect occurs".to_string(),
        ])
        .expected("Form should submit successfully with proper validation")
        .test_type("form_submission");
        case.form_id = form.id.clone();
        case.form_action = Some(form.action.clone());
        case.form_method = Some(form.method.clone());
        cases.push(case);
    }

    for field in detected.fields.iter().filter(|f| !f.is_type(NON_INTERACTIVE_TYPES)) {
        let name = &field.name;
        cases.push(
            TestCase::new(
                ids.issue("FUNC_INPUT_", name),
                Category::Functional,
                Priority::Medium,
                format!("Verify {} input field functionality", name),
            )
            .describe(format!("Test input functionality for {} field", name))
            .steps([
                format!("Navigate to page: {}", url),
                format!("Locate input field: {}", name),
                "Verify field is visible and enabled".to_string(),
                "Enter test data in the field".to_string(),
                "Verify data is accepted".to_string(),
                "Verify field validation works".to_string(),
                "Verify field formatting if applicable".to_string(),
            ])
            .expected("Input field should accept and process data correctly")
            .field(name)
            .test_type("input_functionality"),
        );
    }

    for dropdown in &detected.dropdowns {
        let name = dropdown.name.as_deref().unwrap_or("unknown");
        cases.push(
            TestCase::new(
                ids.issue("FUNC_DROPDOWN_", name),
                Category::Functional,
                Priority::Medium,
                format!("Verify dropdown {} functionality", name),
            )
            .describe(format!("Test dropdown functionality for {}", name))
            .steps([
                format!("Navigate to page: {}", url),
                format!("Locate dropdown: {}", name),
                "Click on dropdown to open".to_string(),
                "Verify dropdown options are displayed".to_string(),
                "Select an option from dropdown".to_string(),
                "Verify selected option is displayed".to_string(),
                "Verify dropdown value is updated".to_string(),
            ])
            .expected("Dropdown should allow selection and update value correctly")
            .field(name)
            .test_type("dropdown_functionality"),
        );
    }

    for table in &detected.tables {
        let mut case = TestCase::new(
            ids.issue("FUNC_TABLE_", &table.id),
            Category::Functional,
            Priority::Medium,
            format!("Verify data table {} renders correctly", table.id),
        )
        .describe(format!("Check table {} row counts and headers", table.id))
        .steps([
            format!("Locate table: {}", table.id),
            "Verify headers are displayed".to_string(),
            "Verify row count matches expected data".to_string(),
            "Scroll through table content if paginated".to_string(),
        ])
        .expected("Table should render rows and headers without layout issues")
        .test_type("table_validation");
        case.table = Some(TableRef {
            id: table.id.clone(),
            kind: classify_table(&table.headers),
            row_count: table.row_count,
        });
        cases.push(case);
    }

    for frame in &detected.iframes {
        let label = iframe_label(frame);
        let mut case = TestCase::new(
            ids.issue("FUNC_IFRAME_", label),
            Category::Functional,
            Priority::Low,
            format!("Verify iframe {} interaction", label),
        )
        .describe(format!("Ensure iframe {} loads and can be switched to", label))
        .steps([
            format!("Locate iframe: {}", label),
            "Switch focus to iframe".to_string(),
            "Verify iframe content loads".to_string(),
            "Switch back to parent context".to_string(),
        ])
        .expected("Iframe should be accessible and load content.")
        .test_type("iframe_validation");
        case.iframe = Some(frame.clone());
        cases.push(case);
    }

    cases.push(
        TestCase::new(
            ids.claim("FUNC_PERF_001".into()),
            Category::Functional,
            Priority::Medium,
            "Verify page load performance",
        )
        .describe("Test page load time and performance")
        .steps([
            format!("Navigate to page: {}", url),
            "Measure page load time".to_string(),
            "Verify page loads within acceptable time".to_string(),
            "Verify all resources are loaded".to_string(),
            "Verify no broken images or missing resources".to_string(),
        ])
        .expected("Page should load within acceptable time with all resources")
        .test_type("performance"),
    );

    cases
}
