use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analyzer::analyzer::AnalyzerConfig;
use crate::analyzer::levels::LevelConfig;
use crate::browser::page::LoadTimeouts;
use crate::login::controller::LoginConfig;
use crate::login::otp::OtpConfig;

pub const DEFAULT_CONFIG_FILE: &str = "qa-scout.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "qa-scout",
    version,
    about = "Analyze a web application and generate a first-pass test-case suite"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: qa-scout.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append structured JSON log events to this file
    #[arg(long, global = true)]
    pub trace_file: Option<String>,

    /// Show the browser window
    #[arg(long, global = true)]
    pub headed: bool,
}

/// Credential flags shared by `generate` and `login`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Login id (username or email)
    #[arg(long)]
    pub login_id: Option<String>,

    /// Password
    #[arg(long)]
    pub password: Option<String>,

    /// One-time passcode to enter if the site asks for one
    #[arg(long)]
    pub otp: Option<String>,

    /// Wait for the OTP to be typed in the browser window
    #[arg(long)]
    pub wait_for_otp: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a page and print the detected structure
    Analyze {
        /// URL of the page to analyze
        #[arg(long)]
        url: String,

        /// Output format: json, yaml
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Analyze a page and generate the categorized test-case suite
    Generate {
        /// URL of the page to analyze
        #[arg(long)]
        url: String,

        #[command(flatten)]
        credentials: CredentialArgs,

        /// Attempt the login flow before synthesizing
        #[arg(long)]
        login: bool,

        /// Output format: json, yaml, console
        #[arg(long)]
        format: Option<String>,
    },

    /// Analyze a page and run the login flow only
    Login {
        /// URL of the login page
        #[arg(long)]
        url: String,

        #[command(flatten)]
        credentials: CredentialArgs,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `qa-scout.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub otp: OtpConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_navigation")]
    pub navigation_ms: u64,

    #[serde(default = "default_network_idle")]
    pub network_idle_ms: u64,

    #[serde(default = "default_load")]
    pub load_ms: u64,

    #[serde(default = "default_settle")]
    pub settle_ms: u64,

    #[serde(default = "default_level_settle")]
    pub level_settle_ms: u64,

    #[serde(default = "default_restore")]
    pub restore_ms: u64,

    #[serde(default = "default_restore_idle")]
    pub restore_idle_ms: u64,

    #[serde(default = "default_action_settle")]
    pub action_settle_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            navigation_ms: default_navigation(),
            network_idle_ms: default_network_idle(),
            load_ms: default_load(),
            settle_ms: default_settle(),
            level_settle_ms: default_level_settle(),
            restore_ms: default_restore(),
            restore_idle_ms: default_restore_idle(),
            action_settle_ms: default_action_settle(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_bridge_script")]
    pub bridge_script: String,

    #[serde(default)]
    pub headed: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            bridge_script: default_bridge_script(),
            headed: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

// Serde default helpers
fn default_navigation() -> u64 { 60_000 }
fn default_network_idle() -> u64 { 30_000 }
fn default_load() -> u64 { 15_000 }
fn default_settle() -> u64 { 2_000 }
fn default_level_settle() -> u64 { 1_000 }
fn default_restore() -> u64 { 15_000 }
fn default_restore_idle() -> u64 { 10_000 }
fn default_action_settle() -> u64 { 500 }
fn default_bridge_script() -> String { "node/browser_server.js".to_string() }
fn default_format() -> String { "json".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    match std::fs::read_to_string(config_path) {
        Ok(content) => parse_config(&content),
        Err(_) => AppConfig::default(),
    }
}

/// Parse YAML config text, falling back to defaults when malformed.
pub fn parse_config(content: &str) -> AppConfig {
    serde_yaml::from_str(content).unwrap_or_else(|e| {
        warn!(error = %e, "Malformed config file, using defaults");
        AppConfig::default()
    })
}

// ============================================================================
// Config Builders (config file -> component configs)
// ============================================================================

impl AppConfig {
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        let t = &self.timeouts;
        AnalyzerConfig {
            timeouts: LoadTimeouts {
                navigation_ms: t.navigation_ms,
                network_idle_ms: t.network_idle_ms,
                load_ms: t.load_ms,
                settle_ms: t.settle_ms,
            },
            levels: LevelConfig {
                settle_ms: t.level_settle_ms,
                restore_ms: t.restore_ms,
                restore_idle_ms: t.restore_idle_ms,
            },
        }
    }

    pub fn login_config(&self) -> LoginConfig {
        LoginConfig {
            action_settle_ms: self.timeouts.action_settle_ms,
            network_idle_ms: self.timeouts.network_idle_ms,
            otp: self.otp,
        }
    }
}
