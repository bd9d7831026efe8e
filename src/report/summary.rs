use serde::{Deserialize, Serialize};

use crate::analyzer::model::DetectedElements;
use crate::synth::test_case::{Category, TestSuite};

// ============================================================================
// Suite summary, derived from a TestSuite and its snapshot
// ============================================================================

/// Test-case counts per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub total_tests: usize,
    pub positive: usize,
    pub negative: usize,
    pub ui: usize,
    pub functional: usize,
    pub workflow: usize,
    pub edge_case: usize,
    pub multi_level: usize,
}

/// Counts of the main element kinds found on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedCounts {
    pub input_fields: usize,
    pub buttons: usize,
    pub links: usize,
    pub forms: usize,
}

/// Report payload handed to a sink next to the suite itself.
///
/// Always computed from the suite, never stored inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub website_url: String,
    pub summary: CategoryCounts,
    pub detected_elements: DetectedCounts,
}

impl SuiteSummary {
    pub fn from_suite(suite: &TestSuite, detected: &DetectedElements) -> Self {
        let count = |c: Category| suite.category(c).len();
        Self {
            website_url: detected.current_url.clone(),
            summary: CategoryCounts {
                total_tests: suite.total(),
                positive: count(Category::Positive),
                negative: count(Category::Negative),
                ui: count(Category::Ui),
                functional: count(Category::Functional),
                workflow: count(Category::Workflow),
                edge_case: count(Category::EdgeCase),
                multi_level: count(Category::MultiLevel),
            },
            detected_elements: DetectedCounts {
                input_fields: detected.fields.len(),
                buttons: detected.buttons.len(),
                links: detected.links.len(),
                forms: detected.forms.len(),
            },
        }
    }

    /// `(category key, count)` rows in report order.
    pub fn rows(&self) -> [(&'static str, usize); 7] {
        let s = &self.summary;
        [
            (Category::Positive.key(), s.positive),
            (Category::Negative.key(), s.negative),
            (Category::Ui.key(), s.ui),
            (Category::Functional.key(), s.functional),
            (Category::Workflow.key(), s.workflow),
            (Category::EdgeCase.key(), s.edge_case),
            (Category::MultiLevel.key(), s.multi_level),
        ]
    }
}
