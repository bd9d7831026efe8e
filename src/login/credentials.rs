use std::fmt;

/// Login credentials for the site under test.
///
/// `Debug` never prints the password; OTP values are masked.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub login_id: String,
    pub password: String,
    pub otp_value: Option<String>,
}

impl Credentials {
    pub fn new(login_id: &str, password: &str) -> Self {
        Self {
            login_id: login_id.to_string(),
            password: password.to_string(),
            otp_value: None,
        }
    }

    pub fn with_otp(mut self, otp: &str) -> Self {
        self.otp_value = Some(otp.to_string());
        self
    }

    /// Both a login id and a password were supplied.
    pub fn is_present(&self) -> bool {
        !self.login_id.is_empty() && !self.password.is_empty()
    }

    /// OTP value if one was supplied and is not blank.
    pub fn otp(&self) -> Option<&str> {
        self.otp_value.as_deref().filter(|v| !v.trim().is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login_id", &self.login_id)
            .field("password", &"[hidden]")
            .field("otp_value", &self.otp_value.as_deref().map(mask_otp))
            .finish()
    }
}

/// First two characters followed by `**`.
pub fn mask_otp(value: &str) -> String {
    let head: String = value.trim().chars().take(2).collect();
    format!("{}**", head)
}
