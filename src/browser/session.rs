use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::browser::page::{ElementHandle, PageHandle, WaitUntil};
use crate::error::ScoutError;

/// Request sent to the browser bridge over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
        wait_until: WaitUntil,
        timeout_ms: u64,
    },
    WaitForLoadState {
        cmd: &'static str,
        state: WaitUntil,
        timeout_ms: u64,
    },
    Wait {
        cmd: &'static str,
        duration_ms: u64,
    },
    Evaluate {
        cmd: &'static str,
        script: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        handle: Option<u64>,
    },
    QueryAll {
        cmd: &'static str,
        selector: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        scope: Option<u64>,
    },
    Element {
        cmd: &'static str,
        handle: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    Bare {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str, wait_until: WaitUntil, timeout_ms: u64) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
            wait_until,
            timeout_ms,
        }
    }

    pub fn wait_for_load_state(state: WaitUntil, timeout_ms: u64) -> Self {
        BrowserRequest::WaitForLoadState {
            cmd: "wait_for_load_state",
            state,
            timeout_ms,
        }
    }

    pub fn wait(duration_ms: u64) -> Self {
        BrowserRequest::Wait {
            cmd: "wait",
            duration_ms,
        }
    }

    pub fn evaluate(script: &str, handle: Option<ElementHandle>) -> Self {
        BrowserRequest::Evaluate {
            cmd: "evaluate",
            script: script.to_string(),
            handle: handle.map(|h| h.0),
        }
    }

    pub fn query_all(selector: &str, scope: Option<ElementHandle>) -> Self {
        BrowserRequest::QueryAll {
            cmd: "query_all",
            selector: selector.to_string(),
            scope: scope.map(|h| h.0),
        }
    }

    fn element(cmd: &'static str, handle: ElementHandle) -> Self {
        BrowserRequest::Element {
            cmd,
            handle: handle.0,
            name: None,
            value: None,
        }
    }

    pub fn parent(handle: ElementHandle) -> Self {
        Self::element("parent", handle)
    }

    pub fn attribute(handle: ElementHandle, name: &str) -> Self {
        BrowserRequest::Element {
            cmd: "attribute",
            handle: handle.0,
            name: Some(name.to_string()),
            value: None,
        }
    }

    pub fn inner_text(handle: ElementHandle) -> Self {
        Self::element("inner_text", handle)
    }

    pub fn input_value(handle: ElementHandle) -> Self {
        Self::element("input_value", handle)
    }

    pub fn fill(handle: ElementHandle, value: &str) -> Self {
        BrowserRequest::Element {
            cmd: "fill",
            handle: handle.0,
            name: None,
            value: Some(value.to_string()),
        }
    }

    pub fn click(handle: ElementHandle) -> Self {
        Self::element("click", handle)
    }

    pub fn press(handle: ElementHandle, key: &str) -> Self {
        BrowserRequest::Element {
            cmd: "press",
            handle: handle.0,
            name: None,
            value: Some(key.to_string()),
        }
    }

    pub fn current_url() -> Self {
        BrowserRequest::Bare { cmd: "current_url" }
    }

    pub fn title() -> Self {
        BrowserRequest::Bare { cmd: "title" }
    }

    pub fn content() -> Self {
        BrowserRequest::Bare { cmd: "content" }
    }

    pub fn quit() -> Self {
        BrowserRequest::Bare { cmd: "quit" }
    }
}

/// Response received from the browser bridge over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub handles: Option<Vec<u64>>,
    #[serde(default)]
    pub handle: Option<u64>,
}

/// A persistent browser session backed by the Node.js Playwright bridge.
///
/// Launches a long-lived Node.js process that keeps a Chromium page open.
/// Commands are sent as NDJSON over stdin, responses read from stdout.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
    script: String,
}

impl BrowserSession {
    /// Launch a new browser session by spawning the bridge script.
    pub fn launch(script: &str, headed: bool) -> Result<Self, ScoutError> {
        let mut child = Command::new("node")
            .arg(script)
            .env("QA_SCOUT_HEADED", if headed { "1" } else { "0" })
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ScoutError::SubprocessSpawn {
                script: script.into(),
                source: e,
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            ScoutError::SessionIo(format!("Failed to capture stdin of {}", script))
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            ScoutError::SessionIo(format!("Failed to capture stdout of {}", script))
        })?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| ScoutError::SessionIo(format!("Failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| ScoutError::JsonParse {
                context: "bridge ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(ScoutError::SessionProtocol {
                command: "launch".into(),
                error: format!("Did not receive ready signal from {}", script),
            });
        }

        debug!(script, headed, "Browser bridge ready");

        Ok(BrowserSession {
            child,
            stdin,
            reader,
            script: script.to_string(),
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, ScoutError> {
        let json = serde_json::to_string(request).map_err(|e| ScoutError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json).map_err(|e| {
            ScoutError::SessionIo(format!("Failed to write to {} stdin: {}", self.script, e))
        })?;

        self.stdin.flush().map_err(|e| {
            ScoutError::SessionIo(format!("Failed to flush {} stdin: {}", self.script, e))
        })?;

        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            ScoutError::SessionIo(format!("Failed to read from {} stdout: {}", self.script, e))
        })?;

        if line.trim().is_empty() {
            return Err(ScoutError::SessionIo(format!(
                "Empty response from {} (process may have died)",
                self.script
            )));
        }

        serde_json::from_str(line.trim()).map_err(|e| ScoutError::JsonParse {
            context: "bridge response".into(),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(
        &mut self,
        request: &BrowserRequest,
        command_name: &str,
    ) -> Result<BrowserResponse, ScoutError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(ScoutError::SessionProtocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    fn send_text(
        &mut self,
        request: &BrowserRequest,
        command_name: &str,
    ) -> Result<String, ScoutError> {
        let response = self.send_ok(request, command_name)?;
        Ok(response.text.unwrap_or_default())
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), ScoutError> {
        // Best-effort quit, the process may already be gone
        let _ = self.send(&BrowserRequest::quit());
        let _ = self.child.wait();
        Ok(())
    }
}

impl PageHandle for BrowserSession {
    fn navigate(
        &mut self,
        url: &str,
        wait_until: WaitUntil,
        timeout_ms: u64,
    ) -> Result<(), ScoutError> {
        self.send_ok(&BrowserRequest::navigate(url, wait_until, timeout_ms), "navigate")?;
        Ok(())
    }

    fn wait_for_load_state(&mut self, state: WaitUntil, timeout_ms: u64) -> Result<(), ScoutError> {
        self.send_ok(
            &BrowserRequest::wait_for_load_state(state, timeout_ms),
            "wait_for_load_state",
        )?;
        Ok(())
    }

    fn wait_for_timeout(&mut self, ms: u64) {
        if let Err(e) = self.send_ok(&BrowserRequest::wait(ms), "wait") {
            warn!(error = %e, "Bridge wait failed, sleeping locally");
            std::thread::sleep(std::time::Duration::from_millis(ms));
        }
    }

    fn current_url(&mut self) -> Result<String, ScoutError> {
        let response = self.send_ok(&BrowserRequest::current_url(), "current_url")?;
        response.url.ok_or_else(|| ScoutError::SessionProtocol {
            command: "current_url".into(),
            error: "No URL in current_url response".into(),
        })
    }

    fn title(&mut self) -> Result<String, ScoutError> {
        self.send_text(&BrowserRequest::title(), "title")
    }

    fn content(&mut self) -> Result<String, ScoutError> {
        self.send_text(&BrowserRequest::content(), "content")
    }

    fn evaluate(
        &mut self,
        script: &str,
        element: Option<ElementHandle>,
    ) -> Result<Value, ScoutError> {
        let response = self.send_ok(&BrowserRequest::evaluate(script, element), "evaluate")?;
        Ok(response.data.unwrap_or(Value::Null))
    }

    fn query_all(&mut self, selector: &str) -> Result<Vec<ElementHandle>, ScoutError> {
        let response = self.send_ok(&BrowserRequest::query_all(selector, None), "query_all")?;
        Ok(response
            .handles
            .unwrap_or_default()
            .into_iter()
            .map(ElementHandle)
            .collect())
    }

    fn query_within(
        &mut self,
        scope: ElementHandle,
        selector: &str,
    ) -> Result<Vec<ElementHandle>, ScoutError> {
        let request = BrowserRequest::query_all(selector, Some(scope));
        let response = self.send_ok(&request, "query_all")?;
        Ok(response
            .handles
            .unwrap_or_default()
            .into_iter()
            .map(ElementHandle)
            .collect())
    }

    fn parent(&mut self, element: ElementHandle) -> Result<Option<ElementHandle>, ScoutError> {
        let response = self.send_ok(&BrowserRequest::parent(element), "parent")?;
        Ok(response.handle.map(ElementHandle))
    }

    fn attribute(
        &mut self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, ScoutError> {
        let response = self.send_ok(&BrowserRequest::attribute(element, name), "attribute")?;
        Ok(response.text)
    }

    fn inner_text(&mut self, element: ElementHandle) -> Result<String, ScoutError> {
        self.send_text(&BrowserRequest::inner_text(element), "inner_text")
    }

    fn input_value(&mut self, element: ElementHandle) -> Result<String, ScoutError> {
        self.send_text(&BrowserRequest::input_value(element), "input_value")
    }

    fn fill(&mut self, element: ElementHandle, value: &str) -> Result<(), ScoutError> {
        self.send_ok(&BrowserRequest::fill(element, value), "fill")?;
        Ok(())
    }

    fn click(&mut self, element: ElementHandle) -> Result<(), ScoutError> {
        self.send_ok(&BrowserRequest::click(element), "click")?;
        Ok(())
    }

    fn press(&mut self, element: ElementHandle, key: &str) -> Result<(), ScoutError> {
        self.send_ok(&BrowserRequest::press(element, key), "press")?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.quit();
    }
}
