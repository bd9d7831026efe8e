//! Test-case synthesis from a `DetectedElements` snapshot.
//!
//! Every generator is a pure function of the snapshot and the credentials;
//! the only shared state is the `IdAllocator` threaded through a run.

pub mod edge_case;
pub mod functional;
pub mod ids;
pub mod modules;
pub mod multi_level;
pub mod negative;
pub mod positive;
pub mod sanitize;
pub mod test_case;
pub mod ui;
pub mod workflow;

use tracing::info;

use crate::analyzer::model::{DetectedElements, Field};
use crate::login::credentials::Credentials;
use ids::IdAllocator;
use test_case::{Category, TestSuite};

/// Build the full categorized suite for one snapshot.
///
/// Deterministic: identical inputs produce identical suites.
pub fn synthesize(detected: &DetectedElements, credentials: &Credentials) -> TestSuite {
    let mut ids = IdAllocator::new();
    let mut suite = TestSuite::default();

    suite.extend(positive::generate(detected, credentials, &mut ids));
    suite.extend(negative::generate(detected, &mut ids));
    suite.extend(ui::generate(detected, &mut ids));
    suite.extend(functional::generate(detected, &mut ids));
    suite.extend(workflow::generate(detected, credentials, &mut ids));
    suite.extend(edge_case::generate(detected, credentials, &mut ids));
    suite.extend(modules::generate(detected, &mut ids));
    suite.extend(multi_level::generate(detected, &mut ids));

    for category in Category::ALL {
        info!(
            category = category.key(),
            count = suite.category(category).len(),
            "Generated test cases"
        );
    }
    suite
}

/// URL the generated steps start from.
pub(crate) fn page_url(detected: &DetectedElements) -> &str {
    &detected.current_url
}

/// Field types that take free text or numbers.
pub(crate) const TEXT_ENTRY_TYPES: &[&str] = &["text", "number", "email"];

/// Field types exercised with injection payloads.
pub(crate) const PAYLOAD_TYPES: &[&str] = &["text", "email", "search", "textarea", "url"];

/// Most specific human label for a field.
pub(crate) fn field_label(field: &Field) -> &str {
    if !field.name.is_empty() {
        &field.name
    } else {
        field.id.as_deref().unwrap_or("field")
    }
}
