use serde::{Deserialize, Serialize};

use crate::analyzer::model::{FormLevel, FormSnapshot, Iframe, TableKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

/// The seven test-case categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Positive,
    Negative,
    Ui,
    Functional,
    Workflow,
    EdgeCase,
    MultiLevel,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Positive,
        Category::Negative,
        Category::Ui,
        Category::Functional,
        Category::Workflow,
        Category::EdgeCase,
        Category::MultiLevel,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Positive => "positive",
            Category::Negative => "negative",
            Category::Ui => "ui",
            Category::Functional => "functional",
            Category::Workflow => "workflow",
            Category::EdgeCase => "edge_case",
            Category::MultiLevel => "multi_level",
        }
    }
}

/// Table referenced by a table-validation test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TableKind,
    pub row_count: usize,
}

/// Form level referenced by a multi-level test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRef {
    pub number: usize,
    pub name: String,
    pub url: String,
}

impl From<&FormLevel> for LevelRef {
    fn from(level: &FormLevel) -> Self {
        Self {
            number: level.level_number,
            name: level.level_name.clone(),
            url: level.url.clone(),
        }
    }
}

/// A declarative test-case description. Never executed by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub test_id: String,
    pub test_name: String,
    pub description: String,
    pub steps: Vec<String>,
    pub expected_result: String,
    pub priority: Priority,
    pub category: Category,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub malicious_payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iframe: Option<Iframe>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LevelRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_field_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
}

impl TestCase {
    pub fn new(
        test_id: String,
        category: Category,
        priority: Priority,
        test_name: impl Into<String>,
    ) -> Self {
        Self {
            test_id,
            test_name: test_name.into(),
            description: String::new(),
            steps: Vec::new(),
            expected_result: String::new(),
            priority,
            category,
            test_type: None,
            field: None,
            field_id: None,
            malicious_payload: None,
            link: None,
            module: None,
            table: None,
            iframe: None,
            level: None,
            form_id: None,
            form_action: None,
            form_method: None,
            field_count: None,
            required_field_count: None,
            workflow_category: None,
            estimated_time: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps = steps.into_iter().map(Into::into).collect();
        self
    }

    pub fn expected(mut self, result: impl Into<String>) -> Self {
        self.expected_result = result.into();
        self
    }

    pub fn test_type(mut self, test_type: &str) -> Self {
        self.test_type = Some(test_type.to_string());
        self
    }

    pub fn field(mut self, name: &str) -> Self {
        self.field = Some(name.to_string());
        self
    }

    pub fn link(mut self, href: &str) -> Self {
        self.link = Some(href.to_string());
        self
    }

    pub fn module(mut self, key: &str) -> Self {
        self.module = Some(key.to_string());
        self
    }

    /// Workflow grouping (`authentication`, `form_submission`, ...) and a rough duration.
    pub fn workflow(mut self, category: &str, estimated_time: &str) -> Self {
        self.workflow_category = Some(category.to_string());
        self.estimated_time = Some(estimated_time.to_string());
        self
    }

    /// Attach form metadata from a level snapshot.
    pub fn form(mut self, form: &FormSnapshot) -> Self {
        self.form_id = Some(form.form_id.clone());
        self.form_action = Some(form.action.clone());
        self.form_method = Some(form.method.clone());
        self.field_count = Some(form.fields.len());
        self.required_field_count = Some(form.required_field_count());
        self
    }
}

/// Generated test cases keyed by category.
///
/// Field order is the fixed category order, so serialization is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuite {
    pub positive: Vec<TestCase>,
    pub negative: Vec<TestCase>,
    pub ui: Vec<TestCase>,
    pub functional: Vec<TestCase>,
    pub workflow: Vec<TestCase>,
    pub edge_case: Vec<TestCase>,
    pub multi_level: Vec<TestCase>,
}

impl TestSuite {
    pub fn category(&self, category: Category) -> &[TestCase] {
        match category {
            Category::Positive => &self.positive,
            Category::Negative => &self.negative,
            Category::Ui => &self.ui,
            Category::Functional => &self.functional,
            Category::Workflow => &self.workflow,
            Category::EdgeCase => &self.edge_case,
            Category::MultiLevel => &self.multi_level,
        }
    }

    fn category_mut(&mut self, category: Category) -> &mut Vec<TestCase> {
        match category {
            Category::Positive => &mut self.positive,
            Category::Negative => &mut self.negative,
            Category::Ui => &mut self.ui,
            Category::Functional => &mut self.functional,
            Category::Workflow => &mut self.workflow,
            Category::EdgeCase => &mut self.edge_case,
            Category::MultiLevel => &mut self.multi_level,
        }
    }

    /// Append cases, each to the list of its own category.
    pub fn extend(&mut self, cases: impl IntoIterator<Item = TestCase>) {
        for case in cases {
            self.category_mut(case.category).push(case);
        }
    }

    pub fn total(&self) -> usize {
        Category::ALL.iter().map(|c| self.category(*c).len()).sum()
    }

    /// Every case in category order.
    pub fn iter(&self) -> impl Iterator<Item = &TestCase> {
        Category::ALL.into_iter().flat_map(move |c| self.category(c).iter())
    }

    pub fn find(&self, test_id: &str) -> Option<&TestCase> {
        self.iter().find(|t| t.test_id == test_id)
    }
}
