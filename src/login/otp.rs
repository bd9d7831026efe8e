use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Time source for the OTP wait loop.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;

    fn sleep_ms(&mut self, ms: u64);
}

/// Wall clock backed by `Instant` and `thread::sleep`.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// OTP wait parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_max_wait")]
    pub max_wait_ms: u64,

    /// Non-whitespace characters required before the code counts as entered
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_wait_ms: default_max_wait(),
            min_length: default_min_length(),
        }
    }
}

fn default_poll_interval() -> u64 { 1_000 }
fn default_max_wait() -> u64 { 60_000 }
fn default_min_length() -> usize { 4 }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpWaitOutcome {
    Entered { elapsed_ms: u64 },
    TimedOut { waited_ms: u64 },
}

/// Check `predicate` every `interval_ms` until it holds or `max_wait_ms` elapses.
///
/// Blocks the caller. The predicate is checked before each sleep, so a value
/// already present is accepted without waiting.
pub fn poll_until(
    clock: &mut dyn Clock,
    interval_ms: u64,
    max_wait_ms: u64,
    mut predicate: impl FnMut() -> bool,
) -> OtpWaitOutcome {
    let start = clock.now_ms();
    loop {
        let elapsed = clock.now_ms().saturating_sub(start);
        if elapsed >= max_wait_ms {
            return OtpWaitOutcome::TimedOut { waited_ms: elapsed };
        }
        if predicate() {
            return OtpWaitOutcome::Entered { elapsed_ms: elapsed };
        }
        clock.sleep_ms(interval_ms.max(1));
    }
}

/// True once `value` holds at least `min_length` non-whitespace characters.
pub fn otp_ready(value: &str, min_length: usize) -> bool {
    value.chars().filter(|c| !c.is_whitespace()).count() >= min_length
}

/// How the OTP step of a login proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpMode<'a> {
    /// Nothing to do: no OTP field, or neither a value nor a wait was requested
    None,
    /// Fill the supplied value and submit
    Auto(&'a str),
    /// Wait for a human to type the code, then submit
    Manual,
}

/// Pick the OTP mode. A supplied value always wins over a manual wait.
pub fn resolve_otp_mode(
    field_present: bool,
    otp_value: Option<&str>,
    wait_for_otp: bool,
) -> OtpMode<'_> {
    match (field_present, otp_value, wait_for_otp) {
        (false, _, _) => OtpMode::None,
        (true, Some(value), _) => OtpMode::Auto(value),
        (true, None, true) => OtpMode::Manual,
        (true, None, false) => OtpMode::None,
    }
}
