use tracing::debug;

use crate::analyzer::analyzer::non_empty;
use crate::analyzer::model::{Button, DetectedElements, Field};
use crate::browser::page::{ElementHandle, PageHandle, associated_label, attr_selector};
use crate::error::ScoutError;

pub const USERNAME_KEYWORDS: &[&str] = &[
    "username", "user", "email", "login", "userid", "user_id", "usr", "emailid",
];

pub const LOGIN_BUTTON_KEYWORDS: &[&str] = &["login", "sign in", "submit", "log in", "signin"];

pub const OTP_KEYWORDS: &[&str] = &[
    "otp",
    "verification",
    "verify",
    "code",
    "pin",
    "2fa",
    "two-factor",
];

/// Inputs with a `maxlength` up to this are treated as short codes.
pub const OTP_MAX_LENGTH: u32 = 10;

const OTP_SHORT_TYPES: &[&str] = &["text", "number", "tel"];

const GENERIC_SUBMIT_SELECTOR: &str = "button[type='submit'], input[type='submit']";

/// Credential controls located in a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct LoginFields<'a> {
    pub username: Option<&'a Field>,
    pub password: Option<&'a Field>,
    pub submit: Option<&'a Button>,
}

/// Locate the username, password and submit controls in `detected`.
///
/// Username: first text/email field whose name, id or placeholder mentions a
/// login keyword. Password: first password field. Submit: first button whose
/// text mentions a login-button keyword.
pub fn find_login_fields(detected: &DetectedElements) -> LoginFields<'_> {
    let username = detected.fields.iter().find(|f| {
        f.is_type(&["text", "email"]) && {
            let haystack = format!(
                "{} {} {}",
                f.name,
                f.id.as_deref().unwrap_or_default(),
                f.placeholder
            )
            .to_lowercase();
            USERNAME_KEYWORDS.iter().any(|k| haystack.contains(k))
        }
    });
    let password = detected.fields.iter().find(|f| f.is_type(&["password"]));
    let submit = detected.buttons.iter().find(|b| {
        let text = b.text.to_lowercase();
        LOGIN_BUTTON_KEYWORDS.iter().any(|k| text.contains(k))
    });
    LoginFields {
        username,
        password,
        submit,
    }
}

// ============================================================================
// Live element lookup
// ============================================================================

fn first_match(
    page: &mut dyn PageHandle,
    selector: &str,
) -> Result<Option<ElementHandle>, ScoutError> {
    Ok(page.query_all(selector)?.into_iter().next())
}

/// Resolve a snapshot field back to a live element: by id, then name, then type.
pub fn locate_field(page: &mut dyn PageHandle, field: &Field) -> Result<ElementHandle, ScoutError> {
    let selector = match (&field.id, field.name.as_str()) {
        (Some(id), _) => attr_selector("", "id", id),
        (None, name) if !name.is_empty() && name != "unnamed" => {
            attr_selector("input", "name", name)
        }
        _ => attr_selector("input", "type", &field.field_type),
    };
    first_match(page, &selector)?.ok_or_else(|| ScoutError::ElementNotFound {
        element: field.name.clone(),
        context: selector,
    })
}

/// Resolve the login button: by id, then by visible text, then any submit control.
pub fn locate_submit(
    page: &mut dyn PageHandle,
    button: Option<&Button>,
) -> Result<ElementHandle, ScoutError> {
    if let Some(button) = button {
        if !button.id.is_empty() {
            if let Some(el) = first_match(page, &attr_selector("", "id", &button.id))? {
                return Ok(el);
            }
        }
        let wanted: String = button.text.to_lowercase().chars().take(20).collect();
        for el in page.query_all("button")? {
            if page.inner_text(el)?.to_lowercase().contains(&wanted) {
                return Ok(el);
            }
        }
        debug!(text = %button.text, "Login button not found by text, using generic submit");
    }
    first_match(page, GENERIC_SUBMIT_SELECTOR)?.ok_or_else(|| ScoutError::ElementNotFound {
        element: "submit button".to_string(),
        context: GENERIC_SUBMIT_SELECTOR.to_string(),
    })
}

// ============================================================================
// OTP field detection
// ============================================================================

/// Attributes of an input inspected for OTP detection, lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpProbe {
    pub id: String,
    pub name: String,
    pub placeholder: String,
    pub label: String,
    pub input_type: String,
    pub max_length: Option<u32>,
}

/// Why an input was taken for the OTP field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpSignal {
    /// Short text/number/tel input that also mentions an OTP keyword
    ShortCode,
    /// id, name, placeholder or label mentions an OTP keyword
    Keyword,
}

/// Classify a probed input; `None` when it is not an OTP field.
pub fn otp_signal(probe: &OtpProbe) -> Option<OtpSignal> {
    let combined = format!(
        "{} {} {} {}",
        probe.id, probe.name, probe.placeholder, probe.label
    );
    if !OTP_KEYWORDS.iter().any(|k| combined.contains(k)) {
        return None;
    }
    let short = OTP_SHORT_TYPES.contains(&probe.input_type.as_str())
        && probe.max_length.is_some_and(|len| len <= OTP_MAX_LENGTH);
    Some(if short {
        OtpSignal::ShortCode
    } else {
        OtpSignal::Keyword
    })
}

/// A live OTP input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpField {
    pub handle: ElementHandle,
    pub id: Option<String>,
    pub name: Option<String>,
    pub signal: OtpSignal,
}

fn probe_input(page: &mut dyn PageHandle, el: ElementHandle) -> Result<OtpProbe, ScoutError> {
    let lower = |v: Option<String>| v.unwrap_or_default().to_lowercase();
    Ok(OtpProbe {
        id: lower(page.attribute(el, "id")?),
        name: lower(page.attribute(el, "name")?),
        placeholder: lower(page.attribute(el, "placeholder")?),
        input_type: lower(page.attribute(el, "type")?),
        max_length: page
            .attribute(el, "maxlength")?
            .and_then(|v| v.trim().parse().ok()),
        label: associated_label(page, el)
            .ok()
            .flatten()
            .unwrap_or_default()
            .to_lowercase(),
    })
}

/// First input on the current page that looks like an OTP entry field.
pub fn detect_otp_field(page: &mut dyn PageHandle) -> Option<OtpField> {
    let inputs = match page.query_all("input") {
        Ok(inputs) => inputs,
        Err(e) => {
            debug!(error = %e, "Error detecting OTP field");
            return None;
        }
    };
    for el in inputs {
        let Ok(probe) = probe_input(page, el) else {
            continue;
        };
        if let Some(signal) = otp_signal(&probe) {
            return Some(OtpField {
                handle: el,
                id: non_empty(Some(probe.id)),
                name: non_empty(Some(probe.name)),
                signal,
            });
        }
    }
    None
}
