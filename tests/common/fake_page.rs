use std::collections::{HashMap, HashSet, VecDeque};

use qa_scout::browser::page::{
    ASSOCIATED_LABEL_SCRIPT, ElementHandle, PageHandle, TAG_NAME_SCRIPT, WaitUntil, attr_selector,
};
use qa_scout::error::ScoutError;
use serde_json::Value;

/// Something the code under test did to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(String, WaitUntil),
    WaitFor(WaitUntil),
    Sleep(u64),
    Fill(ElementHandle, String),
    Click(ElementHandle),
    Press(ElementHandle, String),
}

/// One node of a fixture page.
///
/// An element matches its tag, `[id='..']` and `tag[attr='..']` for its
/// name, type and for attributes (values quoted with `attr_selector`), plus
/// any selector added with `matches`.
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    tag: String,
    attrs: HashMap<String, String>,
    text: String,
    label: Option<String>,
    parent: Option<ElementHandle>,
    selectors: HashSet<String>,
    url: String,
}

impl FakeElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Text of the `<label>` wrapping this element.
    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn under(mut self, parent: ElementHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn matches(mut self, selector: &str) -> Self {
        self.selectors.insert(selector.to_string());
        self
    }

    fn finish(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self.selectors.insert(self.tag.clone());
        if let Some(id) = self.attrs.get("id") {
            self.selectors.insert(attr_selector("", "id", id));
        }
        for attr in ["name", "type", "for"] {
            if let Some(value) = self.attrs.get(attr) {
                self.selectors.insert(attr_selector(&self.tag, attr, value));
            }
        }
        self
    }
}

#[derive(Debug, Clone, Default)]
struct FakeDocument {
    title: String,
    content: String,
}

/// In-memory `PageHandle` driven by fixtures instead of a browser.
#[derive(Debug, Default)]
pub struct FakePage {
    current: String,
    documents: HashMap<String, FakeDocument>,
    elements: Vec<FakeElement>,
    values: HashMap<ElementHandle, String>,
    scripted_values: HashMap<ElementHandle, VecDeque<String>>,
    redirects: HashMap<String, String>,
    click_targets: HashMap<ElementHandle, String>,
    failing_urls: HashSet<String>,
    failing_states: HashSet<WaitUntil>,
    pub actions: Vec<Action>,
}

impl FakePage {
    pub fn new(start_url: &str) -> Self {
        let mut page = Self {
            current: start_url.to_string(),
            ..Self::default()
        };
        page.document(start_url, "", "");
        page
    }

    pub fn document(&mut self, url: &str, title: &str, content: &str) -> &mut Self {
        self.documents.insert(
            url.to_string(),
            FakeDocument {
                title: title.to_string(),
                content: content.to_string(),
            },
        );
        self
    }

    /// Add an element to the document at `url`, in document order.
    pub fn add(&mut self, url: &str, element: FakeElement) -> ElementHandle {
        self.elements.push(element.finish(url));
        ElementHandle(self.elements.len() as u64)
    }

    /// Navigating to `from` lands on `to`.
    pub fn redirect(&mut self, from: &str, to: &str) -> &mut Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    /// Clicking `element` navigates to `url`.
    pub fn on_click(&mut self, element: ElementHandle, url: &str) -> &mut Self {
        self.click_targets.insert(element, url.to_string());
        self
    }

    pub fn fail_navigation(&mut self, url: &str) -> &mut Self {
        self.failing_urls.insert(url.to_string());
        self
    }

    pub fn fail_load_state(&mut self, state: WaitUntil) -> &mut Self {
        self.failing_states.insert(state);
        self
    }

    /// Values returned by successive `input_value` reads; the last one repeats.
    pub fn script_values(&mut self, element: ElementHandle, values: &[&str]) -> &mut Self {
        self.scripted_values
            .insert(element, values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn url(&self) -> &str {
        &self.current
    }

    pub fn navigations(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::Navigate(url, _) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clicks(&self) -> Vec<ElementHandle> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::Click(el) => Some(*el),
                _ => None,
            })
            .collect()
    }

    pub fn fills(&self) -> Vec<(ElementHandle, &str)> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::Fill(el, value) => Some((*el, value.as_str())),
                _ => None,
            })
            .collect()
    }

    fn element(&self, handle: ElementHandle) -> Result<&FakeElement, ScoutError> {
        let index = (handle.0 as usize).checked_sub(1);
        index
            .and_then(|i| self.elements.get(i))
            .ok_or_else(|| ScoutError::page_action("element", format!("stale handle {}", handle.0)))
    }

    fn is_within(&self, handle: ElementHandle, scope: ElementHandle) -> bool {
        let mut cursor = self.element(handle).ok().and_then(|e| e.parent);
        while let Some(parent) = cursor {
            if parent == scope {
                return true;
            }
            cursor = self.element(parent).ok().and_then(|e| e.parent);
        }
        false
    }

    fn select(&self, selector: &str, scope: Option<ElementHandle>) -> Vec<ElementHandle> {
        let parts: Vec<&str> = selector.split(',').map(str::trim).collect();
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementHandle(i as u64 + 1), e))
            .filter(|(_, e)| e.url == self.current)
            .filter(|(_, e)| parts.iter().any(|p| e.selectors.contains(*p)))
            .filter(|(h, _)| scope.is_none_or(|s| self.is_within(*h, s)))
            .map(|(h, _)| h)
            .collect()
    }
}

impl PageHandle for FakePage {
    fn navigate(
        &mut self,
        url: &str,
        wait_until: WaitUntil,
        _timeout_ms: u64,
    ) -> Result<(), ScoutError> {
        self.actions.push(Action::Navigate(url.to_string(), wait_until));
        if self.failing_urls.contains(url) {
            return Err(ScoutError::page_action("navigate", "net::ERR_NAME_NOT_RESOLVED"));
        }
        self.current = self
            .redirects
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string());
        Ok(())
    }

    fn wait_for_load_state(
        &mut self,
        state: WaitUntil,
        _timeout_ms: u64,
    ) -> Result<(), ScoutError> {
        self.actions.push(Action::WaitFor(state));
        if self.failing_states.contains(&state) {
            return Err(ScoutError::page_action("wait_for_load_state", "timeout"));
        }
        Ok(())
    }

    fn wait_for_timeout(&mut self, ms: u64) {
        self.actions.push(Action::Sleep(ms));
    }

    fn current_url(&mut self) -> Result<String, ScoutError> {
        Ok(self.current.clone())
    }

    fn title(&mut self) -> Result<String, ScoutError> {
        Ok(self
            .documents
            .get(&self.current)
            .map(|d| d.title.clone())
            .unwrap_or_default())
    }

    fn content(&mut self) -> Result<String, ScoutError> {
        Ok(self
            .documents
            .get(&self.current)
            .map(|d| d.content.clone())
            .unwrap_or_default())
    }

    fn evaluate(
        &mut self,
        script: &str,
        element: Option<ElementHandle>,
    ) -> Result<Value, ScoutError> {
        let Some(handle) = element else {
            return Ok(Value::Null);
        };
        let el = self.element(handle)?;
        Ok(match script {
            TAG_NAME_SCRIPT => Value::String(el.tag.clone()),
            ASSOCIATED_LABEL_SCRIPT => el.label.clone().map(Value::String).unwrap_or(Value::Null),
            _ => Value::Null,
        })
    }

    fn query_all(&mut self, selector: &str) -> Result<Vec<ElementHandle>, ScoutError> {
        Ok(self.select(selector, None))
    }

    fn query_within(
        &mut self,
        scope: ElementHandle,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, ScoutError> {
        self.element(scope)?;
        Ok(self.select(selector, Some(scope)))
    }

    fn parent(&mut self, element: ElementHandle) -> Result<Option<ElementHandle>, ScoutError> {
        Ok(self.element(element)?.parent)
    }

    fn attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, ScoutError> {
        Ok(self.element(element)?.attrs.get(name).cloned())
    }

    fn inner_text(&mut self, element: ElementHandle) -> Result<String, ScoutError> {
        Ok(self.element(element)?.text.clone())
    }

    fn input_value(&mut self, element: ElementHandle) -> Result<String, ScoutError> {
        self.element(element)?;
        if let Some(queue) = self.scripted_values.get_mut(&element) {
            if queue.len() > 1 {
                return Ok(queue.pop_front().unwrap_or_default());
            }
            if let Some(last) = queue.front() {
                return Ok(last.clone());
            }
        }
        Ok(self.values.get(&element).cloned().unwrap_or_default())
    }

    fn fill(&mut self, element: ElementHandle, value: &str) -> Result<(), ScoutError> {
        self.element(element)?;
        self.values.insert(element, value.to_string());
        self.actions.push(Action::Fill(element, value.to_string()));
        Ok(())
    }

    fn click(&mut self, element: ElementHandle) -> Result<(), ScoutError> {
        self.element(element)?;
        self.actions.push(Action::Click(element));
        if let Some(url) = self.click_targets.get(&element).cloned() {
            self.current = url;
        }
        Ok(())
    }

    fn press(&mut self, element: ElementHandle, key: &str) -> Result<(), ScoutError> {
        self.element(element)?;
        self.actions.push(Action::Press(element, key.to_string()));
        Ok(())
    }
}
