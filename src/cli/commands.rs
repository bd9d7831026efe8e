use std::str::FromStr;

use tracing::{info, warn};

use crate::analyzer::analyzer::StructuralAnalyzer;
use crate::analyzer::model::DetectedElements;
use crate::browser::session::BrowserSession;
use crate::cli::config::{AppConfig, CredentialArgs};
use crate::error::ScoutError;
use crate::login::controller::LoginController;
use crate::login::credentials::Credentials;
use crate::report::sink::{ReportFormat, ReportSink, StdoutSink};
use crate::report::summary::SuiteSummary;
use crate::synth::synthesize;

// ============================================================================
// analyze subcommand
// ============================================================================

pub fn cmd_analyze(
    config: &AppConfig,
    url: &str,
    format: &str,
    headed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = ReportFormat::from_str(format)?;
    let mut session = launch(config, headed)?;
    let detected = analyze(config, &mut session, url)?;
    session.quit()?;

    let rendered = match format {
        ReportFormat::Yaml => serde_yaml::to_string(&detected)?,
        ReportFormat::Json => serde_json::to_string_pretty(&detected)?,
        ReportFormat::Console => {
            return Err(ScoutError::Config(
                "the analyze command prints json or yaml only".to_string(),
            )
            .into());
        }
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

// ============================================================================
// generate subcommand
// ============================================================================

pub fn cmd_generate(
    config: &AppConfig,
    url: &str,
    credential_args: &CredentialArgs,
    login: bool,
    format: Option<&str>,
    headed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // CLI flag > config file > default
    let format = ReportFormat::from_str(format.unwrap_or(&config.output.format))?;
    let credentials = build_credentials(credential_args);

    let mut session = launch(config, headed)?;
    let detected = analyze(config, &mut session, url)?;

    if login {
        if credentials.is_present() {
            let mut controller = LoginController::new(config.login_config());
            match controller.perform_login(
                &mut session,
                &detected,
                &credentials,
                credential_args.wait_for_otp,
            ) {
                Ok(true) => info!("Logged in before test-case generation"),
                Ok(false) => warn!("Login did not succeed, generating from the initial snapshot"),
                Err(e) => warn!(error = %e, "Login skipped"),
            }
        } else {
            warn!("--login given without --login-id and --password, skipping login");
        }
    }
    session.quit()?;

    let suite = synthesize(&detected, &credentials);
    let summary = SuiteSummary::from_suite(&suite, &detected);

    let mut sink = StdoutSink::new(format);
    sink.persist(&suite, &summary)?;
    Ok(())
}

// ============================================================================
// login subcommand
// ============================================================================

/// Run the login flow only. Returns whether the login succeeded.
pub fn cmd_login(
    config: &AppConfig,
    url: &str,
    credential_args: &CredentialArgs,
    headed: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let credentials = build_credentials(credential_args);
    if !credentials.is_present() {
        return Err(ScoutError::Config(
            "the login command needs --login-id and --password".to_string(),
        )
        .into());
    }

    let mut session = launch(config, headed)?;
    let detected = analyze(config, &mut session, url)?;

    let mut controller = LoginController::new(config.login_config());
    let outcome = controller.perform_login(
        &mut session,
        &detected,
        &credentials,
        credential_args.wait_for_otp,
    );
    session.quit()?;

    let success = outcome?;
    println!("Login {}", if success { "succeeded" } else { "failed" });
    Ok(success)
}

// ============================================================================
// Helpers
// ============================================================================

/// Build credentials from CLI flags. Missing values become empty strings.
pub fn build_credentials(args: &CredentialArgs) -> Credentials {
    let credentials = Credentials::new(
        args.login_id.as_deref().unwrap_or_default(),
        args.password.as_deref().unwrap_or_default(),
    );
    match args.otp.as_deref() {
        Some(otp) => credentials.with_otp(otp),
        None => credentials,
    }
}

fn launch(config: &AppConfig, headed: bool) -> Result<BrowserSession, ScoutError> {
    BrowserSession::launch(&config.browser.bridge_script, headed || config.browser.headed)
}

fn analyze(
    config: &AppConfig,
    session: &mut BrowserSession,
    url: &str,
) -> Result<DetectedElements, ScoutError> {
    StructuralAnalyzer::new(config.analyzer_config()).analyze(session, url)
}
