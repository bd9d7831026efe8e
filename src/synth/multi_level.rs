use crate::analyzer::model::{DetectedElements, FormLevel, FormSnapshot};
use crate::synth::ids::IdAllocator;
use crate::synth::test_case::{Category, LevelRef, Priority, TestCase};

/// Three tests per form on every discovered level: submit, validate, UI.
pub fn generate(detected: &DetectedElements, ids: &mut IdAllocator) -> Vec<TestCase> {
    let mut cases = Vec::new();
    for level in &detected.form_levels {
        for (idx, form) in level.forms.iter().enumerate() {
            cases.extend(form_cases(level, idx + 1, form, ids));
        }
    }
    cases
}

fn form_cases(
    level: &FormLevel,
    form_number: usize,
    form: &FormSnapshot,
    ids: &mut IdAllocator,
) -> [TestCase; 3] {
    let name = &level.level_name;
    let url = &level.url;
    let base = format!("MULTI_LEVEL_{}_FORM_{:03}", level.level_number, form_number);
    let locate = [
        format!("Navigate to {}", url),
        "Wait for page to load completely".to_string(),
        format!("Locate form: {}", form.form_id),
    ];

    let positive = TestCase::new(
        ids.claim(format!("{}_POSITIVE", base)),
        Category::MultiLevel,
        Priority::High,
        format!("Test {} - Form {} (Positive)", name, form_number),
    )
    .describe(format!("Test form submission for {} with valid data", name))
    .steps(locate.iter().cloned().chain([
        "Verify form is visible and accessible".to_string(),
        "Fill all required fields with valid test data".to_string(),
        "Fill optional fields if present".to_string(),
        "Submit form".to_string(),
        "Wait for submission to complete".to_string(),
        "Verify success message or confirmation".to_string(),
    ]))
    .expected(format!(
        "Form in {} should submit successfully with valid data",
        name
    ))
    .test_type("multi_level_form")
    .workflow("form_submission", "1-2 minutes")
    .form(form);

    let negative = TestCase::new(
        ids.claim(format!("{}_NEGATIVE", base)),
        Category::MultiLevel,
        Priority::Medium,
        format!("Test {} - Form {} (Negative)", name, form_number),
    )
    .describe(format!("Test form validation for {} with invalid data", name))
    .steps(locate.iter().cloned().chain([
        "Leave required fields empty".to_string(),
        "Submit form".to_string(),
        "Verify validation error messages appear".to_string(),
        "Verify form does not submit".to_string(),
    ]))
    .expected(format!(
        "Form in {} should show validation errors for invalid data",
        name
    ))
    .test_type("multi_level_form")
    .workflow("form_validation", "1-2 minutes")
    .form(form);

    let mut ui = TestCase::new(
        ids.claim(format!("{}_UI", base)),
        Category::MultiLevel,
        Priority::Medium,
        format!("Test {} - Form {} (UI Verification)", name, form_number),
    )
    .describe(format!("Verify UI elements and layout of form in {}", name))
    .steps(locate.iter().cloned().chain([
        "Verify form is visible".to_string(),
        format!("Verify all {} form fields are present", form.fields.len()),
        "Verify labels are displayed correctly".to_string(),
        "Verify submit button is visible and enabled".to_string(),
    ]))
    .expected(format!(
        "All form elements in {} should be visible and properly displayed",
        name
    ))
    .test_type("multi_level_form")
    .workflow("ui_verification", "1 minute");
    ui.form_id = Some(form.form_id.clone());
    ui.field_count = Some(form.fields.len());

    [positive, negative, ui].map(|case| with_level(case, level))
}

fn with_level(mut case: TestCase, level: &FormLevel) -> TestCase {
    case.level = Some(LevelRef::from(level));
    case
}
