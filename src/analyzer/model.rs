use serde::{Deserialize, Serialize};

/// Bumped whenever the snapshot layout changes shape.
pub const SNAPSHOT_VERSION: u32 = 1;

// ============================================================================
// Element descriptors
// ============================================================================

/// An `<input>` or `<textarea>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Lower-cased `type` attribute (`textarea` for textareas, default `text`)
    #[serde(rename = "type")]
    pub field_type: String,

    /// `name` attribute, else `id`, else a placeholder name
    pub name: String,

    pub id: Option<String>,
    pub placeholder: String,
    pub required: bool,
    pub class: String,
}

impl Field {
    /// A field with the given type and name and no other attributes.
    pub fn new(field_type: &str, name: &str) -> Self {
        Self {
            field_type: field_type.to_string(),
            name: name.to_string(),
            id: None,
            placeholder: String::new(),
            required: false,
            class: String::new(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn is_type(&self, types: &[&str]) -> bool {
        types.contains(&self.field_type.as_str())
    }
}

/// A checkbox or radio input keyed by its inferred label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceInput {
    pub name: String,
    pub id: Option<String>,

    /// aria-label, else placeholder, else name
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    pub id: String,
    pub class: String,
    #[serde(rename = "type")]
    pub button_type: String,
    pub tag: String,
}

impl Button {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            id: String::new(),
            class: String::new(),
            button_type: "button".to_string(),
            tag: "button".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

impl Link {
    pub fn new(text: &str, href: &str) -> Self {
        Self {
            text: text.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDescriptor {
    pub id: Option<String>,
    pub action: String,
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dropdown {
    pub name: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Iframe {
    pub id: String,
    pub name: Option<String>,
    pub src: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Semantic attributes extracted from a single DOM node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementDescriptor {
    Field(Field),
    Textarea(Field),
    Checkbox(ChoiceInput),
    Radio(ChoiceInput),
    Button(Button),
    Link(Link),
    Dropdown(Dropdown),
    Table(Table),
    Iframe(Iframe),
    Form(FormDescriptor),
}

// ============================================================================
// Derived classifications
// ============================================================================

/// ERP-domain category inferred from navigation link text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Student,
    Teacher,
    Academic,
    Attendance,
    Examination,
    Finance,
    Library,
    Hostel,
    Transport,
    Report,
}

impl ModuleKind {
    /// Lower-case key, e.g. `"finance"`.
    pub fn key(&self) -> &'static str {
        match self {
            ModuleKind::Student => "student",
            ModuleKind::Teacher => "teacher",
            ModuleKind::Academic => "academic",
            ModuleKind::Attendance => "attendance",
            ModuleKind::Examination => "examination",
            ModuleKind::Finance => "finance",
            ModuleKind::Library => "library",
            ModuleKind::Hostel => "hostel",
            ModuleKind::Transport => "transport",
            ModuleKind::Report => "report",
        }
    }

    /// Title-cased display name, e.g. `"Finance"`.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModuleKind::Student => "Student",
            ModuleKind::Teacher => "Teacher",
            ModuleKind::Academic => "Academic",
            ModuleKind::Attendance => "Attendance",
            ModuleKind::Examination => "Examination",
            ModuleKind::Finance => "Finance",
            ModuleKind::Library => "Library",
            ModuleKind::Hostel => "Hostel",
            ModuleKind::Transport => "Transport",
            ModuleKind::Report => "Report",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    pub text: String,
    pub href: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub kind: ModuleKind,
    pub name: String,
    pub links: Vec<LinkRef>,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    Chart,
    Statistics,
    Table,
    List,
    Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub class: String,

    /// First 50 characters of the widget text
    pub title: String,

    #[serde(rename = "type")]
    pub kind: WidgetKind,
}

/// Semantic type of a data table, from a fixed closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    StudentList,
    FeeRecord,
    Attendance,
    Examination,
    TeacherList,
    Library,
    Transport,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Pagination {
    pub exists: bool,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub current_page: Option<u32>,
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDetail {
    pub id: String,
    pub headers: Vec<String>,
    pub row_count: usize,
    #[serde(rename = "type")]
    pub kind: TableKind,
    pub pagination: Pagination,
    pub actions: Vec<String>,
    pub has_search: bool,
    pub has_filter: bool,
    pub has_export: bool,
}

impl TableDetail {
    /// A detail record with no pagination, actions or tooling.
    pub fn new(id: &str, kind: TableKind) -> Self {
        Self {
            id: id.to_string(),
            headers: Vec::new(),
            row_count: 0,
            kind,
            pagination: Pagination::default(),
            actions: Vec::new(),
            has_search: false,
            has_filter: false,
            has_export: false,
        }
    }
}

// ============================================================================
// Multi-level forms
// ============================================================================

/// One input, textarea or select inside a form on a level page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelField {
    pub tag: String,
    pub name: String,
    pub id: Option<String>,
    pub placeholder: String,
    pub required: bool,
    pub label: String,

    /// `type` attribute, inputs only
    pub input_type: Option<String>,

    /// Non-empty option texts (at most 10), selects only
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub form_id: String,
    pub action: String,
    pub method: String,
    pub fields: Vec<LevelField>,
}

impl FormSnapshot {
    pub fn required_field_count(&self) -> usize {
        self.fields.iter().filter(|f| f.required).count()
    }
}

/// A secondary page reached through a "level N" / "form N" link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLevel {
    pub level_number: usize,
    pub level_name: String,
    pub url: String,
    pub form_count: usize,
    pub input_count: usize,
    pub forms: Vec<FormSnapshot>,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Everything detected on one page state.
///
/// Produced once by `StructuralAnalyzer::analyze()` and only read afterwards:
/// consumers take `&DetectedElements`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedElements {
    pub version: u32,
    pub page_title: String,
    pub current_url: String,

    pub fields: Vec<Field>,
    pub textareas: Vec<Field>,
    pub checkboxes: Vec<ChoiceInput>,
    pub radio_buttons: Vec<ChoiceInput>,
    pub buttons: Vec<Button>,
    pub links: Vec<Link>,
    pub forms: Vec<FormDescriptor>,
    pub dropdowns: Vec<Dropdown>,
    pub iframes: Vec<Iframe>,
    pub tables: Vec<Table>,

    pub modules: Vec<Module>,
    pub dashboard_widgets: Vec<Widget>,
    pub table_details: Vec<TableDetail>,
    pub form_levels: Vec<FormLevel>,
}

impl Default for DetectedElements {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            page_title: String::new(),
            current_url: String::new(),
            fields: Vec::new(),
            textareas: Vec::new(),
            checkboxes: Vec::new(),
            radio_buttons: Vec::new(),
            buttons: Vec::new(),
            links: Vec::new(),
            forms: Vec::new(),
            dropdowns: Vec::new(),
            iframes: Vec::new(),
            tables: Vec::new(),
            modules: Vec::new(),
            dashboard_widgets: Vec::new(),
            table_details: Vec::new(),
            form_levels: Vec::new(),
        }
    }
}

impl DetectedElements {
    /// Route a descriptor into its typed collection.
    ///
    /// Textareas are recorded both as textareas and as fields; checkboxes and
    /// radios are sub-collections next to the `Field` that produced them.
    pub(crate) fn push(&mut self, descriptor: ElementDescriptor) {
        match descriptor {
            ElementDescriptor::Field(f) => self.fields.push(f),
            ElementDescriptor::Textarea(f) => {
                self.textareas.push(f.clone());
                self.fields.push(f);
            }
            ElementDescriptor::Checkbox(c) => self.checkboxes.push(c),
            ElementDescriptor::Radio(r) => self.radio_buttons.push(r),
            ElementDescriptor::Button(b) => self.buttons.push(b),
            ElementDescriptor::Link(l) => self.links.push(l),
            ElementDescriptor::Dropdown(d) => self.dropdowns.push(d),
            ElementDescriptor::Table(t) => self.tables.push(t),
            ElementDescriptor::Iframe(i) => self.iframes.push(i),
            ElementDescriptor::Form(f) => self.forms.push(f),
        }
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.required)
    }
}
