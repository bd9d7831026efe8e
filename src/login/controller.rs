use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analyzer::model::DetectedElements;
use crate::browser::page::{ElementHandle, PageHandle, WaitUntil};
use crate::error::ScoutError;
use crate::login::credentials::{Credentials, mask_otp};
use crate::login::fields::{
    LoginFields, OtpField, detect_otp_field, find_login_fields, locate_field, locate_submit,
};
use crate::login::otp::{
    Clock, OtpConfig, OtpMode, OtpWaitOutcome, SystemClock, otp_ready, poll_until, resolve_otp_mode,
};

pub const SUCCESS_KEYWORDS: &[&str] = &["dashboard", "welcome", "home"];

pub const FAILURE_KEYWORDS: &[&str] = &["error", "invalid", "incorrect", "failed"];

const OTP_SUBMIT_KEYWORDS: &[&str] = &["verify", "submit"];

/// Timings for the login flow, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginConfig {
    /// Pause after each fill
    pub action_settle_ms: u64,

    /// Network-idle wait after each submit
    pub network_idle_ms: u64,

    pub otp: OtpConfig,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            action_settle_ms: 500,
            network_idle_ms: 30_000,
            otp: OtpConfig::default(),
        }
    }
}

/// Outcome of the post-submit page heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginVerdict {
    Success,
    Failure,
    /// Neither success nor failure markers found
    Unclear,
}

impl LoginVerdict {
    /// `Unclear` counts as success.
    pub fn is_success(self) -> bool {
        !matches!(self, LoginVerdict::Failure)
    }
}

/// Judge a login attempt from the URL change and the lower-cased page source.
pub fn judge_login(initial_url: &str, current_url: &str, page_source: &str) -> LoginVerdict {
    let source = page_source.to_lowercase();
    if current_url != initial_url || SUCCESS_KEYWORDS.iter().any(|k| source.contains(k)) {
        LoginVerdict::Success
    } else if FAILURE_KEYWORDS.iter().any(|k| source.contains(k)) {
        debug!("Error indicators found on page");
        LoginVerdict::Failure
    } else {
        LoginVerdict::Unclear
    }
}

/// Drives a login attempt, including the OTP step, against a live page.
pub struct LoginController {
    config: LoginConfig,
    clock: Box<dyn Clock>,
}

impl LoginController {
    pub fn new(config: LoginConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock::new()))
    }

    pub fn with_clock(config: LoginConfig, clock: Box<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Log in with `credentials` using the controls found in `detected`.
    ///
    /// A missing username or password field is an error. Any failure after
    /// that point, including an OTP wait that runs out, yields `Ok(false)`.
    pub fn perform_login(
        &mut self,
        page: &mut dyn PageHandle,
        detected: &DetectedElements,
        credentials: &Credentials,
        wait_for_otp: bool,
    ) -> Result<bool, ScoutError> {
        info!("Attempting to login");
        let fields = find_login_fields(detected);
        if fields.username.is_none() {
            return Err(ScoutError::LoginFieldNotFound {
                field: "username".to_string(),
            });
        }
        if fields.password.is_none() {
            return Err(ScoutError::LoginFieldNotFound {
                field: "password".to_string(),
            });
        }

        match self.attempt(page, &fields, detected, credentials, wait_for_otp) {
            Ok(verdict) => {
                match verdict {
                    LoginVerdict::Success => info!("Login appears successful"),
                    LoginVerdict::Failure => warn!("Login reported as failed"),
                    LoginVerdict::Unclear => warn!("Login status unclear, reporting success"),
                }
                Ok(verdict.is_success())
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                Ok(false)
            }
        }
    }

    fn attempt(
        &mut self,
        page: &mut dyn PageHandle,
        fields: &LoginFields<'_>,
        detected: &DetectedElements,
        credentials: &Credentials,
        wait_for_otp: bool,
    ) -> Result<LoginVerdict, ScoutError> {
        let initial_url = page
            .current_url()
            .unwrap_or_else(|_| detected.current_url.clone());

        if let Some(username) = fields.username {
            let el = locate_field(page, username)?;
            page.fill(el, &credentials.login_id)?;
            info!(login_id = %credentials.login_id, "Entered username");
            page.wait_for_timeout(self.config.action_settle_ms);
        }
        if let Some(password) = fields.password {
            let el = locate_field(page, password)?;
            page.fill(el, &credentials.password)?;
            info!("Entered password");
            page.wait_for_timeout(self.config.action_settle_ms);
        }

        let submit = locate_submit(page, fields.submit)?;
        page.click(submit)?;
        info!("Clicked login button");
        self.wait_idle(page);

        let otp_field = detect_otp_field(page);
        let mode = resolve_otp_mode(otp_field.is_some(), credentials.otp(), wait_for_otp);
        if let Some(field) = &otp_field {
            info!(signal = ?field.signal, "OTP field detected");
            match mode {
                OtpMode::Auto(value) => {
                    page.fill(field.handle, value)?;
                    info!(otp = %mask_otp(value), "Entered OTP");
                    page.wait_for_timeout(self.config.action_settle_ms);
                    self.submit_otp(page, field)?;
                }
                OtpMode::Manual => {
                    if !self.wait_for_manual_otp(page, field) {
                        return Ok(LoginVerdict::Failure);
                    }
                    self.submit_otp(page, field)?;
                }
                OtpMode::None => {
                    info!("OTP required but neither a value nor a manual wait was supplied");
                }
            }
        }

        let current_url = page.current_url()?;
        let source = page.content()?;
        debug!(initial = %initial_url, current = %current_url, "Judging login result");
        Ok(judge_login(&initial_url, &current_url, &source))
    }

    /// Poll the OTP field until a code is typed. False on timeout.
    fn wait_for_manual_otp(&mut self, page: &mut dyn PageHandle, field: &OtpField) -> bool {
        let OtpConfig {
            poll_interval_ms,
            max_wait_ms,
            min_length,
        } = self.config.otp;
        info!(max_wait_ms, "Waiting for user to enter OTP manually");

        let handle = field.handle;
        let mut entered = String::new();
        let outcome = poll_until(self.clock.as_mut(), poll_interval_ms, max_wait_ms, || {
            match page.input_value(handle) {
                Ok(value) if otp_ready(&value, min_length) => {
                    entered = value;
                    true
                }
                Ok(_) => false,
                Err(e) => {
                    debug!(error = %e, "Could not read OTP field");
                    false
                }
            }
        });

        match outcome {
            OtpWaitOutcome::Entered { elapsed_ms } => {
                info!(otp = %mask_otp(&entered), elapsed_ms, "OTP entered by user");
                true
            }
            OtpWaitOutcome::TimedOut { waited_ms } => {
                warn!(waited_ms, "Timed out waiting for OTP, not submitting");
                false
            }
        }
    }

    /// Click a verify/submit button, else press Enter in the OTP field.
    fn submit_otp(
        &mut self,
        page: &mut dyn PageHandle,
        field: &OtpField,
    ) -> Result<(), ScoutError> {
        match find_otp_submit(page)? {
            Some(button) => page.click(button)?,
            None => page.press(field.handle, "Enter")?,
        }
        self.wait_idle(page);
        Ok(())
    }

    fn wait_idle(&self, page: &mut dyn PageHandle) {
        let timeout_ms = self.config.network_idle_ms;
        if let Err(e) = page.wait_for_load_state(WaitUntil::NetworkIdle, timeout_ms) {
            debug!(error = %e, "Network idle wait timed out");
        }
    }
}

fn find_otp_submit(page: &mut dyn PageHandle) -> Result<Option<ElementHandle>, ScoutError> {
    for el in page.query_all("button")? {
        let text = page.inner_text(el)?.to_lowercase();
        let is_submit = page
            .attribute(el, "type")?
            .is_some_and(|t| t.eq_ignore_ascii_case("submit"));
        if is_submit || OTP_SUBMIT_KEYWORDS.iter().any(|k| text.contains(k)) {
            return Ok(Some(el));
        }
    }
    Ok(None)
}
