use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::analyzer::analyzer::{AnalyzerConfig, non_empty, query_or_empty};
use crate::analyzer::model::{FormLevel, FormSnapshot, LevelField};
use crate::browser::page::{
    ElementHandle, PageHandle, WaitUntil, attr_or_empty, attr_selector, navigate_and_settle,
    tag_name,
};
use crate::error::ScoutError;

/// Hard ceiling on visited level pages.
pub const MAX_LEVELS: usize = 5;

/// Options kept per `<select>` on a level page.
pub const MAX_LEVEL_OPTIONS: usize = 10;

static LEVEL_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)level[\s_-]?[1-5]|form[\s_-]?[1-3]|/level/[1-3]|/form/[1-3]")
        .expect("level link pattern is valid")
});

/// Timings for the multi-level traversal, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Extra settle delay after each level page loads
    pub settle_ms: u64,

    /// Content-loaded timeout when navigating back to the base page
    pub restore_ms: u64,

    /// Network-idle timeout when navigating back to the base page
    pub restore_idle_ms: u64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            settle_ms: 1_000,
            restore_ms: 15_000,
            restore_idle_ms: 10_000,
        }
    }
}

/// A link that looks like it leads to a numbered form level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLink {
    pub text: String,
    pub href: String,
    pub full_url: String,
}

/// True when a link's href or text names a level / form step.
pub fn is_level_link(href: &str, text: &str) -> bool {
    LEVEL_LINK.is_match(href) || LEVEL_LINK.is_match(text)
}

/// Resolve `href` to an absolute URL.
///
/// Root-relative hrefs resolve against the site URL, other relative hrefs
/// against the page the link was found on.
pub fn resolve_href(site_url: &str, page_url: &str, href: &str) -> Option<String> {
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    let base = if href.starts_with('/') { site_url } else { page_url };
    Url::parse(base).ok()?.join(href).ok().map(String::from)
}

// ============================================================================
// Navigation restore guard
// ============================================================================

/// Navigates back to `url` when dropped, whatever happened in between.
pub struct RestoreGuard<'a> {
    page: &'a mut dyn PageHandle,
    url: String,
    config: &'a LevelConfig,
}

impl<'a> RestoreGuard<'a> {
    pub fn new(page: &'a mut dyn PageHandle, url: String, config: &'a LevelConfig) -> Self {
        Self { page, url, config }
    }

    pub fn page(&mut self) -> &mut dyn PageHandle {
        &mut *self.page
    }
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        debug!(url = %self.url, "Navigating back to main page");
        if let Err(e) = self
            .page
            .navigate(&self.url, WaitUntil::DomContentLoaded, self.config.restore_ms)
        {
            warn!(url = %self.url, error = %e, "Failed to navigate back to main page");
            return;
        }
        let _ = self
            .page
            .wait_for_load_state(WaitUntil::NetworkIdle, self.config.restore_idle_ms);
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Collect de-duplicated level links from every anchor on the page.
pub fn find_level_links(page: &mut dyn PageHandle, site_url: &str) -> Vec<LevelLink> {
    let page_url = page.current_url().unwrap_or_else(|_| site_url.to_string());
    let mut found: Vec<LevelLink> = Vec::new();

    for el in query_or_empty(page, "a") {
        let (href, text) = match (page.attribute(el, "href"), page.inner_text(el)) {
            (Ok(href), Ok(text)) => (href.unwrap_or_default(), text.trim().to_string()),
            _ => continue,
        };
        if !is_level_link(&href, &text) {
            continue;
        }
        let Some(full_url) = resolve_href(site_url, &page_url, &href) else {
            debug!(href = %href, "Unresolvable level link");
            continue;
        };
        if found.iter().all(|l| l.full_url != full_url) {
            found.push(LevelLink {
                text,
                href,
                full_url,
            });
        }
    }
    found
}

/// Visit up to `MAX_LEVELS` level pages and snapshot their forms.
///
/// The page is always returned to the URL it was on before the traversal,
/// even when individual levels fail.
pub fn discover_form_levels(
    page: &mut dyn PageHandle,
    site_url: &str,
    config: &AnalyzerConfig,
) -> Vec<FormLevel> {
    let links = find_level_links(page, site_url);
    if links.is_empty() {
        return Vec::new();
    }
    info!(count = links.len(), "Found form level links, analyzing each level");

    let original_url = match page.current_url() {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "Cannot read current URL, skipping form levels");
            return Vec::new();
        }
    };

    let mut guard = RestoreGuard::new(page, original_url, &config.levels);
    let mut levels = Vec::new();
    for (idx, link) in links.iter().take(MAX_LEVELS).enumerate() {
        let number = idx + 1;
        info!(level = number, url = %link.full_url, "Analyzing level");
        match visit_level(guard.page(), number, link, config) {
            Ok(level) => levels.push(level),
            Err(e) => warn!(level = number, error = %e, "Failed to analyze level"),
        }
    }
    levels
}

fn visit_level(
    page: &mut dyn PageHandle,
    number: usize,
    link: &LevelLink,
    config: &AnalyzerConfig,
) -> Result<FormLevel, ScoutError> {
    navigate_and_settle(page, &link.full_url, &config.timeouts)?;
    page.wait_for_timeout(config.levels.settle_ms);

    let forms = page.query_all("form")?;
    let input_count = page.query_all("input, textarea, select")?.len();

    let mut snapshots = Vec::new();
    for (form_idx, form) in forms.iter().enumerate() {
        match snapshot_form(page, *form, form_idx + 1) {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(e) => debug!(level = number, form = form_idx + 1, error = %e, "Form omitted"),
        }
    }

    Ok(FormLevel {
        level_number: number,
        level_name: if link.text.is_empty() {
            format!("Level {}", number)
        } else {
            link.text.clone()
        },
        url: link.full_url.clone(),
        form_count: forms.len(),
        input_count,
        forms: snapshots,
    })
}

fn snapshot_form(
    page: &mut dyn PageHandle,
    form: ElementHandle,
    index: usize,
) -> Result<FormSnapshot, ScoutError> {
    let form_id =
        non_empty(page.attribute(form, "id")?).unwrap_or_else(|| format!("form_{}", index));
    let action = attr_or_empty(page, form, "action")?;
    let method = non_empty(page.attribute(form, "method")?).unwrap_or_else(|| "get".into());

    let mut fields = Vec::new();
    for input in page.query_within(form, "input, textarea, select")? {
        match snapshot_field(page, input) {
            Ok(field) => fields.push(field),
            Err(e) => debug!(form = %form_id, error = %e, "Field omitted"),
        }
    }

    Ok(FormSnapshot {
        form_id,
        action,
        method,
        fields,
    })
}

fn snapshot_field(
    page: &mut dyn PageHandle,
    input: ElementHandle,
) -> Result<LevelField, ScoutError> {
    let tag = tag_name(page, input)?;
    let id = non_empty(page.attribute(input, "id")?);
    let name = non_empty(page.attribute(input, "name")?)
        .or_else(|| id.clone())
        .unwrap_or_default();

    let label = match &id {
        Some(id) => label_for(page, id).unwrap_or_default(),
        None => String::new(),
    };

    let input_type = if tag == "input" {
        Some(non_empty(page.attribute(input, "type")?).unwrap_or_else(|| "text".into()))
    } else {
        None
    };

    let options = if tag == "select" {
        let mut texts = Vec::new();
        for option in page
            .query_within(input, "option")?
            .into_iter()
            .take(MAX_LEVEL_OPTIONS)
        {
            let text = page.inner_text(option)?.trim().to_string();
            if !text.is_empty() {
                texts.push(text);
            }
        }
        Some(texts)
    } else {
        None
    };

    Ok(LevelField {
        tag,
        name,
        placeholder: attr_or_empty(page, input, "placeholder")?,
        required: page.attribute(input, "required")?.is_some(),
        id,
        label,
        input_type,
        options,
    })
}

/// Text of `label[for=id]`, best effort.
fn label_for(page: &mut dyn PageHandle, id: &str) -> Option<String> {
    let label = page
        .query_all(&attr_selector("label", "for", id))
        .ok()?
        .into_iter()
        .next()?;
    page.inner_text(label).ok().map(|t| t.trim().to_string())
}
