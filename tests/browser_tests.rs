use qa_scout::browser::page::{ElementHandle, WaitUntil};
use qa_scout::browser::session::{BrowserRequest, BrowserResponse};
use serde_json::json;

fn to_json(request: &BrowserRequest) -> serde_json::Value {
    serde_json::to_value(request).unwrap()
}

// =========================================================================
// Request serialization
// =========================================================================

#[test]
fn navigate_request_carries_wait_state_and_timeout() {
    let req =
        BrowserRequest::navigate("https://erp.example.com", WaitUntil::DomContentLoaded, 60_000);
    assert_eq!(
        to_json(&req),
        json!({
            "cmd": "navigate",
            "url": "https://erp.example.com",
            "wait_until": "domcontentloaded",
            "timeout_ms": 60000,
        })
    );
}

#[test]
fn load_state_names_match_playwright() {
    let all = [WaitUntil::DomContentLoaded, WaitUntil::Load, WaitUntil::NetworkIdle];
    let states: Vec<serde_json::Value> = all
        .iter()
        .map(|s| serde_json::to_value(s).unwrap())
        .collect();
    assert_eq!(states, vec![json!("domcontentloaded"), json!("load"), json!("networkidle")]);

    let req = BrowserRequest::wait_for_load_state(WaitUntil::NetworkIdle, 30_000);
    assert_eq!(
        to_json(&req),
        json!({"cmd": "wait_for_load_state", "state": "networkidle", "timeout_ms": 30000})
    );
}

#[test]
fn wait_request_serializes_duration() {
    assert_eq!(
        to_json(&BrowserRequest::wait(500)),
        json!({"cmd": "wait", "duration_ms": 500})
    );
}

#[test]
fn unscoped_queries_omit_scope() {
    let req = BrowserRequest::query_all("input, textarea", None);
    assert_eq!(to_json(&req), json!({"cmd": "query_all", "selector": "input, textarea"}));

    let scoped = BrowserRequest::query_all("th", Some(ElementHandle(7)));
    assert_eq!(
        to_json(&scoped),
        json!({"cmd": "query_all", "selector": "th", "scope": 7})
    );
}

#[test]
fn evaluate_passes_element_handle_when_given() {
    let page = BrowserRequest::evaluate("() => document.title", None);
    assert_eq!(
        to_json(&page),
        json!({"cmd": "evaluate", "script": "() => document.title"})
    );

    let el = BrowserRequest::evaluate("el => el.tagName", Some(ElementHandle(3)));
    assert_eq!(to_json(&el)["handle"], 3);
}

#[test]
fn element_requests_only_send_relevant_fields() {
    assert_eq!(
        to_json(&BrowserRequest::click(ElementHandle(4))),
        json!({"cmd": "click", "handle": 4})
    );
    assert_eq!(
        to_json(&BrowserRequest::attribute(ElementHandle(4), "maxlength")),
        json!({"cmd": "attribute", "handle": 4, "name": "maxlength"})
    );
    assert_eq!(
        to_json(&BrowserRequest::fill(ElementHandle(2), "admin")),
        json!({"cmd": "fill", "handle": 2, "value": "admin"})
    );
    assert_eq!(
        to_json(&BrowserRequest::press(ElementHandle(2), "Enter")),
        json!({"cmd": "press", "handle": 2, "value": "Enter"})
    );
}

#[test]
fn bare_requests_are_just_the_command() {
    assert_eq!(to_json(&BrowserRequest::current_url()), json!({"cmd": "current_url"}));
    assert_eq!(to_json(&BrowserRequest::quit()), json!({"cmd": "quit"}));
}

// =========================================================================
// Response deserialization
// =========================================================================

#[test]
fn ready_handshake_parses() {
    let resp: BrowserResponse = serde_json::from_str(r#"{"ok":true,"ready":true}"#).unwrap();
    assert!(resp.ok);
    assert_eq!(resp.ready, Some(true));
    assert!(resp.error.is_none());
}

#[test]
fn query_response_carries_handles() {
    let resp: BrowserResponse = serde_json::from_str(r#"{"ok":true,"handles":[1,2,5]}"#).unwrap();
    assert_eq!(resp.handles, Some(vec![1, 2, 5]));
    assert!(resp.handle.is_none());
}

#[test]
fn error_response_keeps_message() {
    let resp: BrowserResponse =
        serde_json::from_str(r#"{"ok":false,"error":"Timeout 30000ms exceeded"}"#).unwrap();
    assert!(!resp.ok);
    assert_eq!(resp.error.as_deref(), Some("Timeout 30000ms exceeded"));
}

#[test]
fn evaluate_response_keeps_arbitrary_data() {
    let resp: BrowserResponse =
        serde_json::from_str(r#"{"ok":true,"data":{"tag":"input","label":null}}"#).unwrap();
    assert_eq!(resp.data, Some(json!({"tag": "input", "label": null})));
}
