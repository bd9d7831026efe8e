use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ScoutError;

// ============================================================================
// Page capability
// ============================================================================

/// Load state to wait for after a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
    #[serde(rename = "domcontentloaded")]
    DomContentLoaded,
    Load,
    #[serde(rename = "networkidle")]
    NetworkIdle,
}

/// Opaque reference to a DOM node owned by the page that produced it.
///
/// Handles are only meaningful for the page state they were queried from;
/// after a navigation they may resolve to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub u64);

/// Capability exposed by the browser-automation collaborator.
///
/// Every method takes `&mut self`: a page has exactly one writer for the
/// duration of an analysis or login call.
pub trait PageHandle {
    /// Navigate and wait for `wait_until`. Errors when the target is unreachable.
    fn navigate(&mut self, url: &str, wait_until: WaitUntil, timeout_ms: u64)
    -> Result<(), ScoutError>;

    fn wait_for_load_state(&mut self, state: WaitUntil, timeout_ms: u64) -> Result<(), ScoutError>;

    /// Block for a fixed settle delay.
    fn wait_for_timeout(&mut self, ms: u64);

    fn current_url(&mut self) -> Result<String, ScoutError>;

    fn title(&mut self) -> Result<String, ScoutError>;

    /// Full rendered page source.
    fn content(&mut self) -> Result<String, ScoutError>;

    /// Evaluate a script, optionally with an element bound as its argument.
    fn evaluate(&mut self, script: &str, element: Option<ElementHandle>)
    -> Result<Value, ScoutError>;

    fn query_all(&mut self, selector: &str) -> Result<Vec<ElementHandle>, ScoutError>;

    /// Query descendants of `scope`.
    fn query_within(
        &mut self,
        scope: ElementHandle,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, ScoutError>;

    fn parent(&mut self, element: ElementHandle) -> Result<Option<ElementHandle>, ScoutError>;

    fn attribute(&mut self, element: ElementHandle, name: &str)
    -> Result<Option<String>, ScoutError>;

    fn inner_text(&mut self, element: ElementHandle) -> Result<String, ScoutError>;

    fn input_value(&mut self, element: ElementHandle) -> Result<String, ScoutError>;

    fn fill(&mut self, element: ElementHandle, value: &str) -> Result<(), ScoutError>;

    fn click(&mut self, element: ElementHandle) -> Result<(), ScoutError>;

    fn press(&mut self, element: ElementHandle, key: &str) -> Result<(), ScoutError>;
}

/// Script resolving an element's lower-case tag name.
pub const TAG_NAME_SCRIPT: &str = "el => el.tagName.toLowerCase()";

/// Script resolving the text of a wrapping or preceding `<label>`.
pub const ASSOCIATED_LABEL_SCRIPT: &str = "el => { \
    const wrap = el.closest('label'); \
    if (wrap) return wrap.innerText; \
    let prev = el.previousElementSibling; \
    while (prev) { \
        if (prev.tagName === 'LABEL') return prev.innerText; \
        prev = prev.previousElementSibling; \
    } \
    return null; }";

/// Quote `value` as a CSS string, escaping quotes, backslashes and newlines.
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Attribute-equals selector, e.g. `input[name='email']`. `tag` may be empty.
pub fn attr_selector(tag: &str, attr: &str, value: &str) -> String {
    format!("{}[{}={}]", tag, attr, css_string(value))
}

/// Lower-case tag name of `element`, resolved through `evaluate`.
pub fn tag_name(page: &mut dyn PageHandle, element: ElementHandle) -> Result<String, ScoutError> {
    let value = page.evaluate(TAG_NAME_SCRIPT, Some(element))?;
    value
        .as_str()
        .map(|s| s.to_lowercase())
        .ok_or_else(|| ScoutError::page_action("tag_name", "script returned a non-string"))
}

/// Text of the `<label>` wrapping or preceding `element`, if any.
pub fn associated_label(
    page: &mut dyn PageHandle,
    element: ElementHandle,
) -> Result<Option<String>, ScoutError> {
    let value = page.evaluate(ASSOCIATED_LABEL_SCRIPT, Some(element))?;
    Ok(value.as_str().map(|s| s.trim().to_string()))
}

/// Attribute value or empty string.
pub fn attr_or_empty(
    page: &mut dyn PageHandle,
    element: ElementHandle,
    name: &str,
) -> Result<String, ScoutError> {
    Ok(page.attribute(element, name)?.unwrap_or_default())
}

// ============================================================================
// Load-wait fallback chain
// ============================================================================

/// Timeouts for the navigation wait chain, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadTimeouts {
    /// Content-loaded wait on the navigation itself
    pub navigation_ms: u64,

    /// Network-idle wait after content load
    pub network_idle_ms: u64,

    /// Plain load wait when network-idle times out
    pub load_ms: u64,

    /// Fixed sleep when both waits time out
    pub settle_ms: u64,
}

impl Default for LoadTimeouts {
    fn default() -> Self {
        Self {
            navigation_ms: 60_000,
            network_idle_ms: 30_000,
            load_ms: 15_000,
            settle_ms: 2_000,
        }
    }
}

/// Navigate to `url` and wait for the page to settle.
///
/// Fails only if the content-loaded navigation itself fails. The follow-up
/// waits degrade: network-idle, then plain load, then a fixed sleep.
pub fn navigate_and_settle(
    page: &mut dyn PageHandle,
    url: &str,
    timeouts: &LoadTimeouts,
) -> Result<(), ScoutError> {
    page.navigate(url, WaitUntil::DomContentLoaded, timeouts.navigation_ms)
        .map_err(|e| ScoutError::navigation(url, e))?;
    settle(page, timeouts);
    Ok(())
}

/// Wait for network idle with fallback to load, then to a fixed sleep.
pub fn settle(page: &mut dyn PageHandle, timeouts: &LoadTimeouts) {
    if let Err(e) = page.wait_for_load_state(WaitUntil::NetworkIdle, timeouts.network_idle_ms) {
        warn!(error = %e, "Network idle timeout, trying load state");
        if let Err(e) = page.wait_for_load_state(WaitUntil::Load, timeouts.load_ms) {
            warn!(error = %e, "Load state timeout, continuing anyway");
            page.wait_for_timeout(timeouts.settle_ms);
        }
    } else {
        debug!("Page reached network idle");
    }
}
