mod common;

use common::fake_page::{Action, FakeElement, FakePage};
use qa_scout::analyzer::analyzer::{AnalyzerConfig, StructuralAnalyzer};
use qa_scout::analyzer::levels::{MAX_LEVELS, discover_form_levels, find_level_links};
use qa_scout::analyzer::model::{ModuleKind, TableKind, WidgetKind};
use qa_scout::browser::page::WaitUntil;
use qa_scout::error::ScoutError;

const LOGIN_URL: &str = "https://erp.example.com/login";
const DASHBOARD_URL: &str = "https://erp.example.com/dashboard";
const WIZARD_URL: &str = "https://erp.example.com/wizard/start";

fn analyzer() -> StructuralAnalyzer {
    StructuralAnalyzer::new(AnalyzerConfig::default())
}

fn login_page() -> FakePage {
    let mut page = FakePage::new(LOGIN_URL);
    page.document(LOGIN_URL, "ERP Login", "<html>Sign in to continue</html>");
    page.add(
        LOGIN_URL,
        FakeElement::new("input")
            .attr("type", "text")
            .attr("name", "email")
            .attr("id", "email")
            .attr("placeholder", "Email address")
            .attr("required", ""),
    );
    page.add(
        LOGIN_URL,
        FakeElement::new("input")
            .attr("type", "password")
            .attr("name", "password")
            .attr("id", "password"),
    );
    page.add(
        LOGIN_URL,
        FakeElement::new("button")
            .attr("type", "submit")
            .attr("id", "login-btn")
            .text("Login"),
    );
    page.add(
        LOGIN_URL,
        FakeElement::new("a").attr("href", "/forgot").text("Forgot password?"),
    );
    page.add(
        LOGIN_URL,
        FakeElement::new("a").attr("href", "/register").text("Register"),
    );
    page
}

// ============================================================================
// Base snapshot
// ============================================================================

#[test]
fn analyze_login_page_snapshot() {
    let mut page = login_page();
    let detected = analyzer().analyze(&mut page, LOGIN_URL).unwrap();

    assert_eq!(detected.page_title, "ERP Login");
    assert_eq!(detected.current_url, LOGIN_URL);

    assert_eq!(detected.fields.len(), 2);
    let email = &detected.fields[0];
    assert_eq!(email.field_type, "text");
    assert_eq!(email.name, "email");
    assert_eq!(email.id.as_deref(), Some("email"));
    assert_eq!(email.placeholder, "Email address");
    assert!(email.required);
    assert_eq!(detected.fields[1].field_type, "password");
    assert!(!detected.fields[1].required);

    assert_eq!(detected.buttons.len(), 1);
    assert_eq!(detected.buttons[0].text, "Login");
    assert_eq!(detected.buttons[0].button_type, "submit");
    assert_eq!(detected.buttons[0].tag, "button");

    assert_eq!(detected.links.len(), 2);
    assert_eq!(detected.links[0].href, "/forgot");
    assert!(detected.forms.is_empty());
    assert!(detected.form_levels.is_empty());
}

#[test]
fn analyze_fails_only_on_unreachable_target() {
    let mut page = login_page();
    page.fail_navigation(LOGIN_URL);

    let err = analyzer().analyze(&mut page, LOGIN_URL).unwrap_err();
    match &err {
        ScoutError::Navigation { url, .. } => assert_eq!(url, LOGIN_URL),
        other => panic!("Expected Navigation error, got {:?}", other),
    }
    let message = err.to_string();
    assert!(message.contains(LOGIN_URL));
    assert!(message.contains("URL is correct"));
}

#[test]
fn load_state_timeouts_fall_back_to_settle_sleep() {
    let mut page = login_page();
    page.fail_load_state(WaitUntil::NetworkIdle)
        .fail_load_state(WaitUntil::Load);

    let config = AnalyzerConfig::default();
    let settle_ms = config.timeouts.settle_ms;
    let detected = StructuralAnalyzer::new(config).analyze(&mut page, LOGIN_URL).unwrap();

    assert_eq!(detected.fields.len(), 2);
    assert_eq!(
        &page.actions[..4],
        &[
            Action::Navigate(LOGIN_URL.to_string(), WaitUntil::DomContentLoaded),
            Action::WaitFor(WaitUntil::NetworkIdle),
            Action::WaitFor(WaitUntil::Load),
            Action::Sleep(settle_ms),
        ]
    );
}

#[test]
fn links_are_capped_and_deduplicated_by_href() {
    let mut page = FakePage::new(DASHBOARD_URL);
    for i in 0..40 {
        page.add(
            DASHBOARD_URL,
            FakeElement::new("a")
                .attr("href", &format!("/page/{}", i % 35))
                .text(&format!("Page {}", i)),
        );
    }
    page.add(DASHBOARD_URL, FakeElement::new("a").text("no href"));

    let detected = analyzer().analyze(&mut page, DASHBOARD_URL).unwrap();
    assert_eq!(detected.links.len(), 30);
}

#[test]
fn buttons_are_deduplicated_by_id() {
    let mut page = FakePage::new(DASHBOARD_URL);
    page.add(
        DASHBOARD_URL,
        FakeElement::new("button").attr("id", "save").text("Save"),
    );
    page.add(
        DASHBOARD_URL,
        FakeElement::new("button").attr("id", "save").text("Save again"),
    );
    page.add(
        DASHBOARD_URL,
        FakeElement::new("input")
            .attr("type", "submit")
            .attr("value", "Send"),
    );
    page.add(
        DASHBOARD_URL,
        FakeElement::new("a")
            .attr("class", "btn btn-primary")
            .attr("aria-label", "Add record")
            .matches("a[class*='btn']"),
    );

    let detected = analyzer().analyze(&mut page, DASHBOARD_URL).unwrap();
    let texts: Vec<&str> = detected.buttons.iter().map(|b| b.text.as_str()).collect();
    assert_eq!(texts, vec!["Save", "Send", "Add record"]);
    assert_eq!(detected.buttons[1].tag, "input");
}

#[test]
fn checkbox_and_radio_labels_fall_back() {
    let mut page = FakePage::new(DASHBOARD_URL);
    page.add(
        DASHBOARD_URL,
        FakeElement::new("input")
            .attr("type", "checkbox")
            .attr("name", "remember")
            .attr("aria-label", "Remember me"),
    );
    page.add(
        DASHBOARD_URL,
        FakeElement::new("input").attr("type", "radio").attr("name", "gender"),
    );
    page.add(
        DASHBOARD_URL,
        FakeElement::new("textarea").attr("id", "remarks"),
    );

    let detected = analyzer().analyze(&mut page, DASHBOARD_URL).unwrap();
    assert_eq!(detected.checkboxes[0].label, "Remember me");
    assert_eq!(detected.radio_buttons[0].label, "gender");
    assert_eq!(detected.textareas.len(), 1);
    assert_eq!(detected.textareas[0].name, "remarks");
    // Textareas are fields too.
    assert_eq!(detected.fields.len(), 3);
}

// ============================================================================
// Modules, widgets, tables
// ============================================================================

#[test]
fn nav_links_group_into_modules_first_rule_wins() {
    let mut page = FakePage::new(DASHBOARD_URL);
    for (text, href) in [
        ("Students", "/students"),
        ("Student Fees", "/students/fees"),
        ("Fee Payment", "/fees"),
        ("Library Books", "/library"),
        ("X", "/x"),
        ("Settings", "/settings"),
    ] {
        page.add(
            DASHBOARD_URL,
            FakeElement::new("a")
                .attr("href", href)
                .text(text)
                .matches("nav a"),
        );
    }

    let detected = analyzer().analyze(&mut page, DASHBOARD_URL).unwrap();
    let kinds: Vec<ModuleKind> = detected.modules.iter().map(|m| m.kind).collect();
    assert_eq!(
        kinds,
        vec![ModuleKind::Student, ModuleKind::Finance, ModuleKind::Library]
    );

    let students = &detected.modules[0];
    assert_eq!(students.name, "Student");
    assert_eq!(students.count, 2);
    assert_eq!(students.links[1].text, "student fees");
    assert_eq!(students.links[1].href, "/students/fees");
}

#[test]
fn widgets_skip_short_text_and_classify_by_priority() {
    let mut page = FakePage::new(DASHBOARD_URL);
    page.add(
        DASHBOARD_URL,
        FakeElement::new("div")
            .attr("class", "card chart-card")
            .attr("id", "enrolment")
            .text("Enrolment trend")
            .matches(".card"),
    );
    page.add(
        DASHBOARD_URL,
        FakeElement::new("div")
            .attr("class", "card")
            .text("Total students 1200")
            .matches(".card"),
    );
    page.add(
        DASHBOARD_URL,
        FakeElement::new("div")
            .attr("class", "card")
            .text("abc")
            .matches(".card"),
    );
    page.add(
        DASHBOARD_URL,
        FakeElement::new("div")
            .attr("class", "widget")
            .attr("id", "enrolment")
            .text("Duplicate id widget")
            .matches(".widget"),
    );
    page.add(
        DASHBOARD_URL,
        FakeElement::new("div")
            .attr("class", "panel")
            .text("Upcoming holidays")
            .matches(".panel"),
    );

    let detected = analyzer().analyze(&mut page, DASHBOARD_URL).unwrap();
    let widgets = &detected.dashboard_widgets;
    assert_eq!(widgets.len(), 3);
    assert_eq!(widgets[0].id, "enrolment");
    assert_eq!(widgets[0].kind, WidgetKind::Chart);
    assert_eq!(widgets[1].id, "widget_2");
    assert_eq!(widgets[1].kind, WidgetKind::Statistics);
    assert_eq!(widgets[2].kind, WidgetKind::Card);
}

#[test]
fn widget_fallback_ids_never_shadow_real_ids() {
    let mut page = FakePage::new(DASHBOARD_URL);
    page.add(
        DASHBOARD_URL,
        FakeElement::new("div").text("Fee collection summary").matches(".card"),
    );
    page.add(
        DASHBOARD_URL,
        FakeElement::new("div")
            .attr("id", "widget_1")
            .text("Library overdue books")
            .matches(".card"),
    );

    let detected = analyzer().analyze(&mut page, DASHBOARD_URL).unwrap();
    let ids: Vec<&str> = detected
        .dashboard_widgets
        .iter()
        .map(|w| w.id.as_str())
        .collect();
    assert_eq!(ids, vec!["widget_1_2", "widget_1"]);
}

#[test]
fn table_details_probe_pagination_actions_and_tooling() {
    let mut page = FakePage::new(DASHBOARD_URL);
    let container = page.add(
        DASHBOARD_URL,
        FakeElement::new("div").text("Filter by class  Export to Excel"),
    );
    let table = page.add(
        DASHBOARD_URL,
        FakeElement::new("table").attr("id", "students").under(container),
    );
    for header in ["Roll No", "Name", "Admission No"] {
        page.add(DASHBOARD_URL, FakeElement::new("th").text(header).under(table));
    }
    for _ in 0..4 {
        page.add(DASHBOARD_URL, FakeElement::new("tr").under(table));
    }
    page.add(DASHBOARD_URL, FakeElement::new("a").text("Edit").under(table));
    page.add(DASHBOARD_URL, FakeElement::new("a").text("Delete").under(table));
    page.add(DASHBOARD_URL, FakeElement::new("a").text("edit").under(table));
    page.add(
        DASHBOARD_URL,
        FakeElement::new("ul")
            .attr("class", "pagination")
            .matches(".pagination")
            .under(container),
    );

    let detected = analyzer().analyze(&mut page, DASHBOARD_URL).unwrap();

    assert_eq!(detected.tables.len(), 1);
    assert_eq!(detected.tables[0].headers, vec!["Roll No", "Name", "Admission No"]);
    assert_eq!(detected.tables[0].row_count, 4);

    let detail = &detected.table_details[0];
    assert_eq!(detail.id, "students");
    assert_eq!(detail.kind, TableKind::StudentList);
    assert!(detail.pagination.exists);
    assert_eq!(detail.pagination.kind.as_deref(), Some("standard"));
    assert_eq!(detail.actions, vec!["edit", "delete"]);
    assert!(!detail.has_search);
    assert!(detail.has_filter);
    assert!(detail.has_export);
}

#[test]
fn tables_without_id_get_positional_ids() {
    let mut page = FakePage::new(DASHBOARD_URL);
    let first = page.add(DASHBOARD_URL, FakeElement::new("table"));
    page.add(DASHBOARD_URL, FakeElement::new("th").text("Fee").under(first));
    let second = page.add(DASHBOARD_URL, FakeElement::new("table"));
    page.add(DASHBOARD_URL, FakeElement::new("th").text("Foo").under(second));

    let detected = analyzer().analyze(&mut page, DASHBOARD_URL).unwrap();
    let ids: Vec<&str> = detected.tables.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["table_1", "table_2"]);
    assert_eq!(detected.table_details[0].kind, TableKind::FeeRecord);
    assert_eq!(detected.table_details[1].kind, TableKind::Generic);
    assert!(!detected.table_details[0].pagination.exists);
}

#[test]
fn iframes_and_tables_are_capped_at_ten() {
    let mut page = FakePage::new(DASHBOARD_URL);
    for _ in 0..12 {
        page.add(DASHBOARD_URL, FakeElement::new("iframe"));
        page.add(DASHBOARD_URL, FakeElement::new("table"));
    }

    let detected = analyzer().analyze(&mut page, DASHBOARD_URL).unwrap();

    assert_eq!(detected.iframes.len(), 10);
    assert_eq!(detected.iframes[9].id, "iframe_10");
    assert_eq!(detected.tables.len(), 10);
    assert_eq!(detected.tables[9].id, "table_10");
    assert_eq!(detected.table_details.len(), 10);
}

#[test]
fn table_headers_are_truncated_to_eight() {
    let mut page = FakePage::new(DASHBOARD_URL);
    let table = page.add(DASHBOARD_URL, FakeElement::new("table").attr("id", "wide"));
    for i in 1..=11 {
        page.add(
            DASHBOARD_URL,
            FakeElement::new("th").text(&format!("Column {}", i)).under(table),
        );
    }

    let detected = analyzer().analyze(&mut page, DASHBOARD_URL).unwrap();

    let expected: Vec<String> = (1..=8).map(|i| format!("Column {}", i)).collect();
    assert_eq!(detected.tables[0].headers, expected);
    assert_eq!(detected.table_details[0].headers, expected);
}

#[test]
fn table_actions_come_from_first_ten_controls_only() {
    let mut page = FakePage::new(DASHBOARD_URL);
    let table = page.add(DASHBOARD_URL, FakeElement::new("table").attr("id", "records"));
    for i in 1..=12 {
        page.add(
            DASHBOARD_URL,
            FakeElement::new("a").text(&format!("Edit {}", i)).under(table),
        );
    }

    let detected = analyzer().analyze(&mut page, DASHBOARD_URL).unwrap();

    let actions = &detected.table_details[0].actions;
    assert_eq!(actions.len(), 10);
    assert_eq!(actions.first().map(String::as_str), Some("edit 1"));
    assert_eq!(actions.last().map(String::as_str), Some("edit 10"));
}

// ============================================================================
// Multi-level traversal
// ============================================================================

fn level_url(slug: &str) -> String {
    format!("https://erp.example.com/wizard/{}", slug)
}

/// Wizard start page with one level link per `(text, slug)`.
fn wizard_page(links: &[(&str, &str)]) -> FakePage {
    let mut page = FakePage::new(WIZARD_URL);
    for (text, slug) in links {
        page.add(
            WIZARD_URL,
            FakeElement::new("a")
                .attr("href", &format!("/wizard/{}", slug))
                .text(text),
        );
    }
    page
}

fn add_level_form(page: &mut FakePage, url: &str) {
    let form = page.add(
        url,
        FakeElement::new("form")
            .attr("id", "personal")
            .attr("action", "/wizard/save")
            .attr("method", "post"),
    );
    page.add(
        url,
        FakeElement::new("label").attr("for", "first_name").text("First name"),
    );
    page.add(
        url,
        FakeElement::new("input")
            .attr("id", "first_name")
            .attr("name", "first_name")
            .attr("required", "")
            .under(form),
    );
    let select = page.add(
        url,
        FakeElement::new("select").attr("name", "grade").under(form),
    );
    for option in ["Grade 1", "", "Grade 2"] {
        page.add(url, FakeElement::new("option").text(option).under(select));
    }
    page.add(url, FakeElement::new("textarea").attr("name", "notes").under(form));
}

#[test]
fn level_links_match_text_or_href_and_dedupe_by_url() {
    let mut page = FakePage::new(WIZARD_URL);
    page.add(WIZARD_URL, FakeElement::new("a").attr("href", "/form/1").text("Start"));
    page.add(WIZARD_URL, FakeElement::new("a").attr("href", "step2").text("Level 2"));
    page.add(WIZARD_URL, FakeElement::new("a").attr("href", "/form/1").text("Again"));
    page.add(WIZARD_URL, FakeElement::new("a").attr("href", "/about").text("About"));
    page.add(
        WIZARD_URL,
        FakeElement::new("a")
            .attr("href", "https://other.example.com/level-3")
            .text(""),
    );

    let links = find_level_links(&mut page, "https://erp.example.com/app/");
    let urls: Vec<&str> = links.iter().map(|l| l.full_url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://erp.example.com/form/1",
            "https://erp.example.com/wizard/step2",
            "https://other.example.com/level-3",
        ]
    );
}

#[test]
fn level_traversal_snapshots_forms_and_restores_url() {
    let mut page = wizard_page(&[("Level 1", "a"), ("", "level-2")]);
    add_level_form(&mut page, &level_url("a"));

    let levels = discover_form_levels(&mut page, WIZARD_URL, &AnalyzerConfig::default());

    assert_eq!(page.url(), WIZARD_URL);
    assert_eq!(levels.len(), 2);

    let first = &levels[0];
    assert_eq!(first.level_number, 1);
    assert_eq!(first.level_name, "Level 1");
    assert_eq!(first.url, level_url("a"));
    assert_eq!(first.form_count, 1);
    assert_eq!(first.input_count, 3);

    let form = &first.forms[0];
    assert_eq!(form.form_id, "personal");
    assert_eq!(form.method, "post");
    assert_eq!(form.action, "/wizard/save");
    assert_eq!(form.fields.len(), 3);
    assert_eq!(form.required_field_count(), 1);

    let name = &form.fields[0];
    assert_eq!(name.tag, "input");
    assert_eq!(name.label, "First name");
    assert_eq!(name.input_type.as_deref(), Some("text"));
    assert!(name.options.is_none());

    let grade = &form.fields[1];
    assert_eq!(grade.tag, "select");
    assert_eq!(grade.input_type, None);
    assert_eq!(
        grade.options.as_deref(),
        Some(&["Grade 1".to_string(), "Grade 2".to_string()][..])
    );

    let second = &levels[1];
    assert_eq!(second.level_name, "Level 2");
    assert!(second.forms.is_empty());
}

#[test]
fn failing_level_is_skipped_and_url_still_restored() {
    let mut page = wizard_page(&[("Level 1", "a"), ("Level 2", "b"), ("Level 3", "c")]);
    page.fail_navigation(&level_url("b"));

    let levels = discover_form_levels(&mut page, WIZARD_URL, &AnalyzerConfig::default());

    let numbers: Vec<usize> = levels.iter().map(|l| l.level_number).collect();
    assert_eq!(numbers, vec![1, 3]);
    assert_eq!(page.url(), WIZARD_URL);
    assert_eq!(page.navigations().last().copied(), Some(WIZARD_URL));
}

#[test]
fn level_select_options_are_capped_and_quoted_labels_resolve() {
    let mut page = wizard_page(&[("Level 1", "a")]);
    let url = level_url("a");
    let form = page.add(&url, FakeElement::new("form").attr("id", "family"));
    page.add(
        &url,
        FakeElement::new("label").attr("for", "guardian's_name").text("Guardian's name"),
    );
    page.add(
        &url,
        FakeElement::new("input").attr("id", "guardian's_name").under(form),
    );
    let select = page.add(
        &url,
        FakeElement::new("select").attr("name", "relation").under(form),
    );
    for i in 1..=14 {
        page.add(
            &url,
            FakeElement::new("option").text(&format!("Option {}", i)).under(select),
        );
    }

    let levels = discover_form_levels(&mut page, WIZARD_URL, &AnalyzerConfig::default());

    let fields = &levels[0].forms[0].fields;
    assert_eq!(fields[0].label, "Guardian's name");
    let options = fields[1].options.as_ref().unwrap();
    assert_eq!(options.len(), 10);
    assert_eq!(options[9], "Option 10");
}

#[test]
fn level_traversal_visits_at_most_five_levels() {
    let mut page = wizard_page(&[
        ("Level 1", "a"),
        ("Level 2", "b"),
        ("Level 3", "c"),
        ("Level 4", "d"),
        ("Level 5", "e"),
        ("Form 1", "f"),
        ("Form 2", "g"),
    ]);

    let levels = discover_form_levels(&mut page, WIZARD_URL, &AnalyzerConfig::default());

    assert_eq!(levels.len(), MAX_LEVELS);
    let visited: Vec<&str> = page.navigations();
    assert_eq!(visited.len(), MAX_LEVELS + 1);
    assert!(!visited.contains(&level_url("f").as_str()));
    assert_eq!(page.url(), WIZARD_URL);
}

#[test]
fn analyze_runs_level_discovery_last_and_returns_to_base() {
    let mut page = wizard_page(&[("Level 1", "a")]);
    add_level_form(&mut page, &level_url("a"));

    let detected = analyzer().analyze(&mut page, WIZARD_URL).unwrap();

    assert_eq!(detected.current_url, WIZARD_URL);
    assert_eq!(detected.form_levels.len(), 1);
    // Level-page inputs never leak into the base snapshot.
    assert!(detected.fields.is_empty());
    assert!(detected.forms.is_empty());
    assert_eq!(page.url(), WIZARD_URL);
}

#[test]
fn page_without_level_links_never_navigates_away() {
    let mut page = login_page();
    let levels = discover_form_levels(&mut page, LOGIN_URL, &AnalyzerConfig::default());
    assert!(levels.is_empty());
    assert!(page.navigations().is_empty());
}
