use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analyzer::levels::{LevelConfig, discover_form_levels};
use crate::analyzer::model::{
    Button, ChoiceInput, DetectedElements, Dropdown, ElementDescriptor, Field, FormDescriptor,
    Iframe, Link, LinkRef, Module, Pagination, Table, TableDetail, Widget,
};
use crate::analyzer::rules::{
    EXPORT_KEYWORDS, FILTER_KEYWORDS, TABLE_ACTION_KEYWORDS, classify_module_link, classify_table,
    classify_widget, mentions_any,
};
use crate::browser::page::{
    ElementHandle, LoadTimeouts, PageHandle, attr_or_empty, navigate_and_settle, tag_name,
};
use crate::error::ScoutError;
use crate::synth::ids::IdAllocator;

// ============================================================================
// Limits
// ============================================================================

pub const MAX_LINKS: usize = 30;
pub const MAX_IFRAMES: usize = 10;
pub const MAX_TABLES: usize = 10;
pub const MAX_TABLE_HEADERS: usize = 8;
pub const MAX_WIDGETS_PER_SELECTOR: usize = 20;
pub const MAX_TABLE_ACTION_PROBES: usize = 10;
pub const MIN_WIDGET_TEXT: usize = 5;
pub const WIDGET_TITLE_LEN: usize = 50;

const BUTTON_SELECTORS: &[&str] = &[
    "button",
    "input[type='submit']",
    "input[type='button']",
    "a[class*='button'], a[class*='btn']",
];

const NAV_SELECTORS: &[&str] = &[
    "nav a",
    ".sidebar a",
    ".menu a",
    "[class*='nav'] a",
    "[class*='menu'] a",
    "[class*='sidebar'] a",
    ".navbar a",
];

const WIDGET_SELECTORS: &[&str] = &[
    ".card",
    ".widget",
    ".panel",
    "[class*='card']",
    "[class*='widget']",
    "[class*='stat']",
    "[class*='dashboard']",
];

const PAGINATION_SELECTORS: &[&str] = &[
    ".pagination",
    "[class*='pagination']",
    "[class*='pager']",
    ".page-info",
    "[class*='page']",
];

const SEARCH_SELECTORS: &[&str] = &[
    "input[type='search']",
    "input[placeholder*='search']",
    "input[placeholder*='Search']",
    ".search-input",
    "[class*='search']",
];

// ============================================================================
// Analyzer
// ============================================================================

/// Configuration for a structural analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub timeouts: LoadTimeouts,
    pub levels: LevelConfig,
}

/// Turns a live page into an immutable `DetectedElements` snapshot.
pub struct StructuralAnalyzer {
    config: AnalyzerConfig,
}

impl StructuralAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Navigate to `target_url` and snapshot the page.
    ///
    /// Only a failed initial navigation is an error. Every detection pass is
    /// best-effort: nodes that cannot be read are left out of the snapshot.
    pub fn analyze(
        &self,
        page: &mut dyn PageHandle,
        target_url: &str,
    ) -> Result<DetectedElements, ScoutError> {
        info!(url = target_url, "Analyzing website structure");
        navigate_and_settle(page, target_url, &self.config.timeouts)?;

        let mut detected = DetectedElements {
            page_title: page.title().unwrap_or_default(),
            current_url: page
                .current_url()
                .unwrap_or_else(|_| target_url.to_string()),
            ..DetectedElements::default()
        };

        let passes: [(&str, fn(&mut dyn PageHandle) -> Vec<ElementDescriptor>); 7] = [
            ("inputs", detect_inputs),
            ("textareas", detect_textareas),
            ("buttons", detect_buttons),
            ("links", detect_links),
            ("forms", detect_forms),
            ("dropdowns", detect_dropdowns),
            ("iframes", detect_iframes),
        ];
        for (name, pass) in passes {
            let found = pass(&mut *page);
            debug!(pass = name, count = found.len(), "Detection pass complete");
            for descriptor in found {
                detected.push(descriptor);
            }
        }

        let tables = detect_tables(page);
        for (table, _) in &tables {
            detected.push(ElementDescriptor::Table(table.clone()));
        }

        detected.modules = detect_modules(page);
        detected.dashboard_widgets = detect_dashboard_widgets(page);
        detected.table_details = analyze_tables(page, &tables);

        // Runs last: it navigates away and back.
        detected.form_levels = discover_form_levels(page, target_url, &self.config);

        info!(
            inputs = detected.fields.len(),
            buttons = detected.buttons.len(),
            links = detected.links.len(),
            forms = detected.forms.len(),
            modules = detected.modules.len(),
            levels = detected.form_levels.len(),
            "Analysis complete"
        );
        Ok(detected)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// `Some(s)` only for non-blank strings.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Query a selector; a failing query yields no elements.
pub(crate) fn query_or_empty(page: &mut dyn PageHandle, selector: &str) -> Vec<ElementHandle> {
    page.query_all(selector).unwrap_or_else(|e| {
        warn!(selector, error = %e, "Query failed");
        Vec::new()
    })
}

/// Run `extract` on each element, dropping the ones that fail.
fn collect_each<T>(
    page: &mut dyn PageHandle,
    elements: &[ElementHandle],
    what: &str,
    mut extract: impl FnMut(&mut dyn PageHandle, ElementHandle) -> Result<T, ScoutError>,
) -> Vec<T> {
    let mut out = Vec::new();
    for &el in elements {
        match extract(&mut *page, el) {
            Ok(item) => out.push(item),
            Err(e) => debug!(element = what, error = %e, "Element omitted from snapshot"),
        }
    }
    out
}

// ============================================================================
// Element passes
// ============================================================================

fn detect_inputs(page: &mut dyn PageHandle) -> Vec<ElementDescriptor> {
    let inputs = query_or_empty(page, "input");
    collect_each(page, &inputs, "input", extract_input)
        .into_iter()
        .flatten()
        .collect()
}

fn extract_input(
    page: &mut dyn PageHandle,
    el: ElementHandle,
) -> Result<Vec<ElementDescriptor>, ScoutError> {
    let field_type = non_empty(page.attribute(el, "type")?)
        .map(|t| t.to_lowercase())
        .unwrap_or_else(|| "text".to_string());
    let id = non_empty(page.attribute(el, "id")?);
    let name = non_empty(page.attribute(el, "name")?)
        .or_else(|| id.clone())
        .unwrap_or_else(|| "unnamed".to_string());
    let placeholder = attr_or_empty(page, el, "placeholder")?;
    let field = Field {
        field_type: field_type.clone(),
        name: name.clone(),
        id: id.clone(),
        placeholder: placeholder.clone(),
        required: page.attribute(el, "required")?.is_some(),
        class: attr_or_empty(page, el, "class")?,
    };

    let mut out = vec![ElementDescriptor::Field(field)];
    if field_type == "checkbox" || field_type == "radio" {
        let label = non_empty(page.attribute(el, "aria-label")?)
            .or_else(|| non_empty(Some(placeholder)))
            .unwrap_or_else(|| name.clone());
        let choice = ChoiceInput { name, id, label };
        out.push(if field_type == "checkbox" {
            ElementDescriptor::Checkbox(choice)
        } else {
            ElementDescriptor::Radio(choice)
        });
    }
    Ok(out)
}

fn detect_textareas(page: &mut dyn PageHandle) -> Vec<ElementDescriptor> {
    let areas = query_or_empty(page, "textarea");
    collect_each(page, &areas, "textarea", |page, el| {
        let id = non_empty(page.attribute(el, "id")?);
        Ok(ElementDescriptor::Textarea(Field {
            field_type: "textarea".to_string(),
            name: non_empty(page.attribute(el, "name")?)
                .or_else(|| id.clone())
                .unwrap_or_else(|| "textarea".to_string()),
            id,
            placeholder: attr_or_empty(page, el, "placeholder")?,
            required: page.attribute(el, "required")?.is_some(),
            class: attr_or_empty(page, el, "class")?,
        }))
    })
}

fn detect_buttons(page: &mut dyn PageHandle) -> Vec<ElementDescriptor> {
    let mut candidates = Vec::new();
    for selector in BUTTON_SELECTORS {
        candidates.extend(query_or_empty(page, selector));
    }

    let mut seen_handles = HashSet::new();
    let mut seen_ids = HashSet::new();
    let mut out = Vec::new();
    for el in candidates {
        if !seen_handles.insert(el) {
            continue;
        }
        match extract_button(page, el) {
            Ok(button) => {
                if !button.id.is_empty() && !seen_ids.insert(button.id.clone()) {
                    continue;
                }
                out.push(ElementDescriptor::Button(button));
            }
            Err(e) => debug!(element = "button", error = %e, "Element omitted from snapshot"),
        }
    }
    out
}

fn extract_button(page: &mut dyn PageHandle, el: ElementHandle) -> Result<Button, ScoutError> {
    let text = non_empty(Some(page.inner_text(el)?.trim().to_string()))
        .or(non_empty(page.attribute(el, "value")?))
        .or(non_empty(page.attribute(el, "aria-label")?))
        .unwrap_or_else(|| "Button".to_string());
    Ok(Button {
        text,
        id: attr_or_empty(page, el, "id")?,
        class: attr_or_empty(page, el, "class")?,
        button_type: non_empty(page.attribute(el, "type")?).unwrap_or_else(|| "button".into()),
        tag: tag_name(page, el)?,
    })
}

fn detect_links(page: &mut dyn PageHandle) -> Vec<ElementDescriptor> {
    let anchors: Vec<_> = query_or_empty(page, "a").into_iter().take(MAX_LINKS).collect();
    let mut seen = HashSet::new();
    collect_each(page, &anchors, "link", |page, el| {
        let href = non_empty(page.attribute(el, "href")?);
        let text = page.inner_text(el)?.trim().to_string();
        Ok(href.map(|href| Link {
            text: if text.is_empty() { href.clone() } else { text },
            href,
        }))
    })
    .into_iter()
    .flatten()
    .filter(|link| seen.insert(link.href.clone()))
    .map(ElementDescriptor::Link)
    .collect()
}

fn detect_forms(page: &mut dyn PageHandle) -> Vec<ElementDescriptor> {
    let forms = query_or_empty(page, "form");
    collect_each(page, &forms, "form", |page, el| {
        Ok(ElementDescriptor::Form(FormDescriptor {
            id: non_empty(page.attribute(el, "id")?),
            action: attr_or_empty(page, el, "action")?,
            method: non_empty(page.attribute(el, "method")?).unwrap_or_else(|| "get".into()),
        }))
    })
}

fn detect_dropdowns(page: &mut dyn PageHandle) -> Vec<ElementDescriptor> {
    let selects = query_or_empty(page, "select");
    collect_each(page, &selects, "select", |page, el| {
        let id = non_empty(page.attribute(el, "id")?);
        Ok(ElementDescriptor::Dropdown(Dropdown {
            name: non_empty(page.attribute(el, "name")?).or_else(|| id.clone()),
            id,
        }))
    })
}

fn detect_iframes(page: &mut dyn PageHandle) -> Vec<ElementDescriptor> {
    let frames: Vec<_> = query_or_empty(page, "iframe")
        .into_iter()
        .take(MAX_IFRAMES)
        .collect();
    let mut index = 0;
    collect_each(page, &frames, "iframe", |page, el| {
        index += 1;
        Ok(ElementDescriptor::Iframe(Iframe {
            id: non_empty(page.attribute(el, "id")?).unwrap_or_else(|| format!("iframe_{}", index)),
            name: non_empty(page.attribute(el, "name")?),
            src: non_empty(page.attribute(el, "src")?),
        }))
    })
}

fn detect_tables(page: &mut dyn PageHandle) -> Vec<(Table, ElementHandle)> {
    let tables: Vec<_> = query_or_empty(page, "table")
        .into_iter()
        .take(MAX_TABLES)
        .collect();
    let mut index = 0;
    collect_each(page, &tables, "table", |page, el| {
        index += 1;
        let mut headers = Vec::new();
        for th in page.query_within(el, "th")? {
            let text = page.inner_text(th)?.trim().to_string();
            if !text.is_empty() {
                headers.push(text);
            }
        }
        headers.truncate(MAX_TABLE_HEADERS);
        let row_count = page.query_within(el, "tr")?.len();
        let table = Table {
            id: non_empty(page.attribute(el, "id")?).unwrap_or_else(|| format!("table_{}", index)),
            headers,
            row_count,
        };
        Ok((table, el))
    })
}

// ============================================================================
// Module classification
// ============================================================================

/// Group navigation-area links into ERP modules, first matching module wins.
fn detect_modules(page: &mut dyn PageHandle) -> Vec<Module> {
    let mut seen = HashSet::new();
    let mut nav_links = Vec::new();
    for selector in NAV_SELECTORS {
        for el in query_or_empty(page, selector) {
            if seen.insert(el) {
                nav_links.push(el);
            }
        }
    }

    let links: Vec<LinkRef> = collect_each(page, &nav_links, "nav link", |page, el| {
        let text = page.inner_text(el)?.trim().to_lowercase();
        Ok(LinkRef {
            text,
            href: attr_or_empty(page, el, "href")?,
            id: attr_or_empty(page, el, "id")?,
        })
    })
    .into_iter()
    .filter(|link| link.text.chars().count() > 1)
    .collect();

    let mut modules: Vec<Module> = Vec::new();
    for link in links {
        let Some(kind) = classify_module_link(&link.text) else {
            continue;
        };
        match modules.iter_mut().find(|m| m.kind == kind) {
            Some(module) => {
                module.links.push(link);
                module.count += 1;
            }
            None => modules.push(Module {
                kind,
                name: kind.display_name().to_string(),
                links: vec![link],
                count: 1,
            }),
        }
    }
    modules
}

// ============================================================================
// Dashboard widgets
// ============================================================================

fn detect_dashboard_widgets(page: &mut dyn PageHandle) -> Vec<Widget> {
    let mut candidates: Vec<(String, String, String)> = Vec::new();
    let mut seen_handles = HashSet::new();
    let mut seen_ids = HashSet::new();

    for selector in WIDGET_SELECTORS {
        let elements: Vec<_> = query_or_empty(page, selector)
            .into_iter()
            .take(MAX_WIDGETS_PER_SELECTOR)
            .collect();
        for el in elements {
            if seen_handles.contains(&el) {
                continue;
            }
            let (id, class, text) = match widget_probe(page, el) {
                Ok(p) => p,
                Err(e) => {
                    debug!(element = "widget", error = %e, "Element omitted from snapshot");
                    continue;
                }
            };

            let repeated_id = !id.is_empty() && seen_ids.contains(&id);
            if text.chars().count() < MIN_WIDGET_TEXT || repeated_id {
                continue;
            }
            seen_handles.insert(el);
            if !id.is_empty() {
                seen_ids.insert(id.clone());
            }
            candidates.push((id, class, text));
        }
    }

    // Real ids are reserved first so positional fallbacks never shadow them.
    let mut ids = IdAllocator::new();
    for (id, _, _) in &candidates {
        if !id.is_empty() {
            ids.claim(id.clone());
        }
    }

    candidates
        .into_iter()
        .enumerate()
        .map(|(idx, (id, class, text))| Widget {
            id: if id.is_empty() {
                ids.claim(format!("widget_{}", idx + 1))
            } else {
                id
            },
            kind: classify_widget(&class, &text),
            class,
            title: text.chars().take(WIDGET_TITLE_LEN).collect(),
        })
        .collect()
}

/// Id, class and trimmed text of a widget candidate.
fn widget_probe(
    page: &mut dyn PageHandle,
    el: ElementHandle,
) -> Result<(String, String, String), ScoutError> {
    Ok((
        attr_or_empty(page, el, "id")?,
        attr_or_empty(page, el, "class")?,
        page.inner_text(el)?.trim().to_string(),
    ))
}

// ============================================================================
// Table analysis
// ============================================================================

fn analyze_tables(
    page: &mut dyn PageHandle,
    tables: &[(Table,
    ElementHandle)],
) -> Vec<TableDetail> {
    let mut details = Vec::new();
    for (table, el) in tables {
        match analyze_table(page, table, *el) {
            Ok(detail) => details.push(detail),
            Err(e) => warn!(table = %table.id, error = %e, "Error analyzing table"),
        }
    }
    details
}

fn analyze_table(
    page: &mut dyn PageHandle,
    table: &Table,
    el: ElementHandle,
) -> Result<TableDetail, ScoutError> {
    // Controls usually sit next to the table, so probe from its parent.
    let scope = page.parent(el)?.unwrap_or(el);

    let pagination = if PAGINATION_SELECTORS
        .iter()
        .any(|sel| page.query_within(scope, sel).is_ok_and(|found| !found.is_empty()))
    {
        Pagination {
            exists: true,
            kind: Some("standard".to_string()),
            current_page: None,
            total_pages: None,
        }
    } else {
        Pagination::default()
    };

    let mut actions: Vec<String> = Vec::new();
    let candidates: Vec<_> = page
        .query_within(el, "button, a")?
        .into_iter()
        .take(MAX_TABLE_ACTION_PROBES)
        .collect();
    for btn in candidates {
        let Ok(text) = page.inner_text(btn) else {
            continue;
        };
        let text = text.trim().to_lowercase();
        if mentions_any(&text, TABLE_ACTION_KEYWORDS) && !actions.contains(&text) {
            actions.push(text);
        }
    }

    let has_search = SEARCH_SELECTORS
        .iter()
        .any(|sel| page.query_within(scope, sel).is_ok_and(|found| !found.is_empty()));
    let nearby = page.inner_text(scope).unwrap_or_default();

    Ok(TableDetail {
        id: table.id.clone(),
        headers: table.headers.clone(),
        row_count: table.row_count,
        kind: classify_table(&table.headers),
        pagination,
        actions,
        has_search,
        has_filter: mentions_any(&nearby, FILTER_KEYWORDS),
        has_export: mentions_any(&nearby, EXPORT_KEYWORDS),
    })
}
