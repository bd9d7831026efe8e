use crate::analyzer::model::DetectedElements;
use crate::login::credentials::Credentials;
use crate::synth::ids::IdAllocator;
use crate::synth::page_url;
use crate::synth::test_case::{Category, Priority, TestCase};

pub const MAX_FORM_WORKFLOWS: usize = 3;
pub const MAX_MODULE_WORKFLOWS: usize = 3;
pub const LINKS_PER_MODULE_WORKFLOW: usize = 3;

pub fn generate(
    detected: &DetectedElements,
    credentials: &Credentials,
    ids: &mut IdAllocator,
) -> Vec<TestCase> {
    let url = page_url(detected);
    let mut cases = Vec::new();

    if credentials.is_present() {
        cases.push(
            TestCase::new(
                ids.claim("WORKFLOW_LOGIN_001".into()),
                Category::Workflow,
                Priority::Critical,
                "Complete Login Workflow",
            )
            .describe("Test end-to-end login workflow with all steps")
            .steps([
                format!("Navigate to login page: {}", url),
                "Verify login page is displayed".to_string(),
                "Verify username field is visible".to_string(),
                "Verify password field is visible".to_string(),
                "Enter valid username".to_string(),
                "Enter valid password".to_string(),
                "Click login button".to_string(),
                "Wait for authentication".to_string(),
                "Handle OTP if required".to_string(),
                "Verify successful login".to_string(),
                "Verify user is redirected to appropriate page".to_string(),
                "Verify user session is established".to_string(),
                "Verify dashboard/widgets are loaded".to_string(),
                "Verify user can access protected resources".to_string(),
            ])
            .expected("Complete login workflow should work seamlessly")
            .test_type("workflow")
            .workflow("authentication", "2-3 minutes"),
        );
    }

    for (idx, _form) in detected.forms.iter().take(MAX_FORM_WORKFLOWS).enumerate() {
        let n = idx + 1;
        cases.push(
            TestCase::new(
                ids.claim(format!("WORKFLOW_FORM_{:03}", n)),
                Category::Workflow,
                Priority::High,
                format!("Complete Form Submission Workflow - Form {}", n),
            )
            .describe(format!("Test end-to-end form submission workflow for form {}", n))
            .steps([
                format!("Navigate to page: {}", url),
                "Locate form on page".to_string(),
                "Verify all required fields are visible".to_string(),
                "Fill all mandatory fields with valid data".to_string(),
                "Fill optional fields if applicable".to_string(),
                "Verify form validation (if any)".to_string(),
                "Submit form".to_string(),
                "Wait for submission to complete".to_string(),
                "Verify success message/confirmation".to_string(),
                "Verify redirect or page update".to_string(),
                "Verify submitted data appears correctly".to_string(),
            ])
            .expected("Form should submit successfully and display confirmation")
            .test_type("workflow")
            .workflow("form_submission", "1-2 minutes"),
        );
    }

    for module in detected.modules.iter().take(MAX_MODULE_WORKFLOWS) {
        if module.links.is_empty() {
            continue;
        }
        let key = module.kind.key();
        let mut steps = vec![
            "Login to system (if required)".to_string(),
            format!("Navigate to {} module", key),
            "Verify module page loads correctly".to_string(),
        ];
        for link in module.links.iter().take(LINKS_PER_MODULE_WORKFLOW) {
            steps.push(format!("Click on \"{}\" link", link.text));
            steps.push("Verify navigation occurs".to_string());
            steps.push("Verify page content is correct".to_string());
            steps.push("Navigate back to module main page".to_string());
        }
        steps.push("Verify all module links are accessible".to_string());

        cases.push(
            TestCase::new(
                ids.issue("WORKFLOW_MODULE_", key),
                Category::Workflow,
                Priority::High,
                format!("Module Navigation Workflow - {}", module.name),
            )
            .describe(format!("Test navigation through {} module", key))
            .steps(steps)
            .expected(format!(
                "All navigation within {} module should work correctly",
                key
            ))
            .test_type("workflow")
            .module(key)
            .workflow("module_navigation", "2-3 minutes"),
        );
    }

    cases
}
