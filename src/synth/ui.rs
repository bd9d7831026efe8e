use crate::analyzer::model::{ChoiceInput, DetectedElements, Iframe};
use crate::synth::ids::IdAllocator;
use crate::synth::test_case::{Category, Priority, TestCase};

const HIDDEN_TYPES: &[&str] = &["hidden", "submit"];

fn choice_label<'a>(choice: &'a ChoiceInput, fallback: &'a str) -> &'a str {
    [choice.label.as_str(), choice.name.as_str()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or(fallback)
}

/// Label for an iframe: id, then name, then src.
pub(crate) fn iframe_label(frame: &Iframe) -> &str {
    if !frame.id.is_empty() {
        return &frame.id;
    }
    frame
        .name
        .as_deref()
        .or(frame.src.as_deref())
        .unwrap_or("iframe")
}

pub fn generate(detected: &DetectedElements, ids: &mut IdAllocator) -> Vec<TestCase> {
    let mut cases = Vec::new();

    for button in &detected.buttons {
        let text = &button.text;
        cases.push(
            TestCase::new(
                ids.issue("UI_BUTTON_", text),
                Category::Ui,
                Priority::Medium,
                format!("Verify {} button is visible", text),
            )
            .describe(format!("Check if {} button is displayed correctly", text))
            .steps([
                format!("Locate button: {}", text),
                "Verify button is visible".to_string(),
                "Verify button is clickable".to_string(),
                "Verify button styling is consistent".to_string(),
            ])
            .expected("Button should be visible, clickable, and properly styled"),
        );
    }

    for field in detected.fields.iter().filter(|f| !f.is_type(HIDDEN_TYPES)) {
        let name = &field.name;
        cases.push(
            TestCase::new(
                ids.issue("UI_INPUT_", name),
                Category::Ui,
                Priority::Medium,
                format!("Verify {} field UI", name),
            )
            .describe(format!("Check UI of {} input field", name))
            .steps([
                format!("Locate field: {}", name),
                "Verify field is visible".to_string(),
                "Verify placeholder text is displayed (if applicable)".to_string(),
                "Verify field styling is consistent".to_string(),
                "Verify field is properly aligned".to_string(),
            ])
            .expected("Field should be properly styled, visible, and aligned")
            .field(name),
        );
    }

    for checkbox in &detected.checkboxes {
        let label = choice_label(checkbox, "Checkbox");
        cases.push(
            TestCase::new(
                ids.issue("UI_CHECKBOX_", label),
                Category::Ui,
                Priority::Medium,
                format!("Verify {} checkbox visibility", label),
            )
            .describe(format!(
                "Ensure {} checkbox is visible, aligned, and toggleable",
                label
            ))
            .steps([
                format!("Locate checkbox: {}", label),
                "Verify checkbox is visible".to_string(),
                "Toggle checkbox on and off".to_string(),
                "Verify state changes correctly".to_string(),
            ])
            .expected("Checkbox should be visible and reflect user interaction"),
        );
    }

    for radio in &detected.radio_buttons {
        let label = choice_label(radio, "Radio option");
        cases.push(
            TestCase::new(
                ids.issue("UI_RADIO_", label),
                Category::Ui,
                Priority::Medium,
                format!("Verify {} radio option", label),
            )
            .describe(format!("Ensure radio option {} is visible and selectable", label))
            .steps([
                format!("Locate radio option: {}", label),
                "Verify option is visible".to_string(),
                "Select the option and verify other options respond appropriately".to_string(),
            ])
            .expected("Radio option should be selectable and mutually exclusive"),
        );
    }

    for frame in &detected.iframes {
        let label = iframe_label(frame);
        cases.push(
            TestCase::new(
                ids.issue("UI_IFRAME_", label),
                Category::Ui,
                Priority::Low,
                format!("Verify iframe {} visibility", label),
            )
            .describe(format!("Ensure iframe {} loads correctly", label))
            .steps([
                format!("Locate iframe: {}", label),
                "Verify iframe is visible".to_string(),
                "Verify iframe content loads without errors".to_string(),
            ])
            .expected("Iframe content should be accessible and visible"),
        );
    }

    let title = if detected.page_title.trim().is_empty() {
        "N/A"
    } else {
        detected.page_title.as_str()
    };
    cases.push(
        TestCase::new(
            ids.claim("UI_PAGE_001".into()),
            Category::Ui,
            Priority::Low,
            "Verify page title",
        )
        .describe("Check if page title is displayed correctly")
        .steps([
            "Load the page",
            "Verify page title is present",
            "Verify page title is meaningful",
        ])
        .expected(format!("Page title should be: {}", title)),
    );
    cases.push(
        TestCase::new(
            ids.claim("UI_PAGE_002".into()),
            Category::Ui,
            Priority::High,
            "Verify responsive design",
        )
        .describe("Check if page is responsive on different screen sizes")
        .steps([
            "Open page on desktop",
            "Resize browser to mobile size",
            "Verify layout adjusts properly",
            "Verify all elements are accessible",
        ])
        .expected("Page should be responsive and usable on all screen sizes"),
    );

    cases
}
