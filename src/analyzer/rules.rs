use crate::analyzer::model::{ModuleKind, TableKind, WidgetKind};

// ============================================================================
// Ordered keyword rules
// ============================================================================
//
// Every table below is evaluated top to bottom and the first matching rule
// wins. Reordering a table changes classification results.

/// A category selected when any keyword is a substring of the probed text.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<K: 'static> {
    pub kind: K,
    pub keywords: &'static [&'static str],
}

impl<K: Copy> KeywordRule<K> {
    pub fn matches(&self, lower_text: &str) -> bool {
        self.keywords.iter().any(|k| lower_text.contains(k))
    }
}

/// First rule in table order whose keywords match `text` (case-insensitive).
pub fn first_match<K: Copy>(rules: &[KeywordRule<K>], text: &str) -> Option<K> {
    let lower = text.to_lowercase();
    rules.iter().find(|r| r.matches(&lower)).map(|r| r.kind)
}

pub const MODULE_RULES: &[KeywordRule<ModuleKind>] = &[
    KeywordRule {
        kind: ModuleKind::Student,
        keywords: &["student", "admission", "enrollment", "pupil", "learner"],
    },
    KeywordRule {
        kind: ModuleKind::Teacher,
        keywords: &["teacher", "faculty", "staff", "instructor"],
    },
    KeywordRule {
        kind: ModuleKind::Academic,
        keywords: &["course", "subject", "class", "section", "syllabus", "curriculum"],
    },
    KeywordRule {
        kind: ModuleKind::Attendance,
        keywords: &["attendance", "present", "absent", "leave"],
    },
    KeywordRule {
        kind: ModuleKind::Examination,
        keywords: &["exam", "test", "assessment", "result", "grade", "marks"],
    },
    KeywordRule {
        kind: ModuleKind::Finance,
        keywords: &["fee", "payment", "expense", "financial", "billing", "invoice"],
    },
    KeywordRule {
        kind: ModuleKind::Library,
        keywords: &["library", "book", "issue", "return"],
    },
    KeywordRule {
        kind: ModuleKind::Hostel,
        keywords: &["hostel", "room", "boarding"],
    },
    KeywordRule {
        kind: ModuleKind::Transport,
        keywords: &["transport", "bus", "vehicle", "route"],
    },
    KeywordRule {
        kind: ModuleKind::Report,
        keywords: &["report", "analytics", "dashboard", "statistics"],
    },
];

pub const TABLE_RULES: &[KeywordRule<TableKind>] = &[
    KeywordRule {
        kind: TableKind::StudentList,
        keywords: &["student", "name", "roll", "admission"],
    },
    KeywordRule {
        kind: TableKind::FeeRecord,
        keywords: &["fee", "payment", "amount", "balance"],
    },
    KeywordRule {
        kind: TableKind::Attendance,
        keywords: &["attendance", "present", "absent"],
    },
    KeywordRule {
        kind: TableKind::Examination,
        keywords: &["exam", "test", "marks", "grade"],
    },
    KeywordRule {
        kind: TableKind::TeacherList,
        keywords: &["teacher", "staff", "faculty"],
    },
    KeywordRule {
        kind: TableKind::Library,
        keywords: &["book", "library", "issue", "return"],
    },
    KeywordRule {
        kind: TableKind::Transport,
        keywords: &["bus", "transport", "route"],
    },
];

/// Module a navigation link belongs to, if any. A link matches at most one module.
pub fn classify_module_link(text: &str) -> Option<ModuleKind> {
    first_match(MODULE_RULES, text)
}

/// Table type from its joined header text; `Generic` when nothing matches.
pub fn classify_table(headers: &[String]) -> TableKind {
    let joined = headers.join(" ");
    first_match(TABLE_RULES, &joined).unwrap_or(TableKind::Generic)
}

// ============================================================================
// Widget rules (class + text predicates)
// ============================================================================

/// Predicate over a widget's lower-cased class and text.
pub struct WidgetRule {
    pub kind: WidgetKind,
    pub matches: fn(class: &str, text: &str) -> bool,
}

fn is_chart(class: &str, _text: &str) -> bool {
    class.contains("chart") || class.contains("graph")
}

fn is_statistics(class: &str, text: &str) -> bool {
    class.contains("stat") || ["total", "count", "number"].iter().any(|k| text.contains(k))
}

fn is_table(class: &str, _text: &str) -> bool {
    class.contains("table")
}

fn is_list(class: &str, _text: &str) -> bool {
    class.contains("list")
}

pub const WIDGET_RULES: &[WidgetRule] = &[
    WidgetRule { kind: WidgetKind::Chart, matches: is_chart },
    WidgetRule { kind: WidgetKind::Statistics, matches: is_statistics },
    WidgetRule { kind: WidgetKind::Table, matches: is_table },
    WidgetRule { kind: WidgetKind::List, matches: is_list },
];

/// Widget type by priority: chart, statistics, table, list, else card.
pub fn classify_widget(class: &str, text: &str) -> WidgetKind {
    let class = class.to_lowercase();
    let text = text.to_lowercase();
    WIDGET_RULES
        .iter()
        .find(|r| (r.matches)(&class, &text))
        .map(|r| r.kind)
        .unwrap_or(WidgetKind::Card)
}

// ============================================================================
// Table probes
// ============================================================================

pub const TABLE_ACTION_KEYWORDS: &[&str] = &["edit", "delete", "view", "details", "action"];

pub const FILTER_KEYWORDS: &[&str] = &["filter"];

pub const EXPORT_KEYWORDS: &[&str] = &["export", "download", "excel", "csv", "pdf"];

/// True when any keyword occurs in `text` (case-insensitive).
pub fn mentions_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}
