use clap::Parser;
use qa_scout::cli::commands::build_credentials;
use qa_scout::cli::config::{Cli, Commands, CredentialArgs, load_config, parse_config};

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_analyze_defaults_to_json() {
    let cli = Cli::parse_from(["qa-scout", "analyze", "--url", "https://erp.example.com"]);
    match cli.command {
        Commands::Analyze { url, format } => {
            assert_eq!(url, "https://erp.example.com");
            assert_eq!(format, "json");
        }
        _ => panic!("Expected Analyze command"),
    }
    assert_eq!(cli.verbose, 0);
    assert!(!cli.headed);
    assert!(cli.config.is_none());
}

#[test]
fn cli_parse_generate_all_args() {
    let cli = Cli::parse_from([
        "qa-scout",
        "generate",
        "--url",
        "https://erp.example.com/login",
        "--login-id",
        "admin",
        "--password",
        "s3cret",
        "--otp",
        "482913",
        "--login",
        "--format",
        "yaml",
    ]);
    match cli.command {
        Commands::Generate {
            url,
            credentials,
            login,
            format,
        } => {
            assert_eq!(url, "https://erp.example.com/login");
            assert_eq!(credentials.login_id.as_deref(), Some("admin"));
            assert_eq!(credentials.password.as_deref(), Some("s3cret"));
            assert_eq!(credentials.otp.as_deref(), Some("482913"));
            assert!(!credentials.wait_for_otp);
            assert!(login);
            assert_eq!(format.as_deref(), Some("yaml"));
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn cli_parse_generate_minimal_leaves_format_to_config() {
    let cli = Cli::parse_from(["qa-scout", "generate", "--url", "https://erp.example.com"]);
    match cli.command {
        Commands::Generate {
            credentials,
            login,
            format,
            ..
        } => {
            assert!(credentials.login_id.is_none());
            assert!(!login);
            assert!(format.is_none());
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn cli_parse_login_with_manual_otp() {
    let cli = Cli::parse_from([
        "qa-scout",
        "login",
        "--url",
        "https://erp.example.com/login",
        "--login-id",
        "admin",
        "--password",
        "s3cret",
        "--wait-for-otp",
    ]);
    match cli.command {
        Commands::Login { url, credentials } => {
            assert_eq!(url, "https://erp.example.com/login");
            assert!(credentials.wait_for_otp);
            assert!(credentials.otp.is_none());
        }
        _ => panic!("Expected Login command"),
    }
}

#[test]
fn cli_global_flags_work_after_subcommand() {
    let cli = Cli::parse_from([
        "qa-scout",
        "analyze",
        "--url",
        "https://erp.example.com",
        "-vv",
        "--headed",
        "--config",
        "custom.yaml",
        "--trace-file",
        "run.jsonl",
    ]);
    assert_eq!(cli.verbose, 2);
    assert!(cli.headed);
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    assert_eq!(cli.trace_file.as_deref(), Some("run.jsonl"));
}

#[test]
fn cli_requires_url() {
    assert!(Cli::try_parse_from(["qa-scout", "analyze"]).is_err());
}

// ============================================================================
// Credentials
// ============================================================================

#[test]
fn credentials_built_from_args() {
    let args = CredentialArgs {
        login_id: Some("admin".into()),
        password: Some("s3cret".into()),
        otp: Some("482913".into()),
        wait_for_otp: false,
    };
    let creds = build_credentials(&args);
    assert!(creds.is_present());
    assert_eq!(creds.login_id, "admin");
    assert_eq!(creds.otp(), Some("482913"));
}

#[test]
fn missing_password_means_no_credentials() {
    let args = CredentialArgs {
        login_id: Some("admin".into()),
        password: None,
        otp: None,
        wait_for_otp: false,
    };
    let creds = build_credentials(&args);
    assert!(!creds.is_present());
    assert_eq!(creds.otp(), None);
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_defaults_when_file_missing() {
    let config = load_config(Some("/nonexistent/qa-scout.yaml"));
    assert_eq!(config.timeouts.navigation_ms, 60_000);
    assert_eq!(config.timeouts.network_idle_ms, 30_000);
    assert_eq!(config.timeouts.load_ms, 15_000);
    assert_eq!(config.timeouts.settle_ms, 2_000);
    assert_eq!(config.timeouts.action_settle_ms, 500);
    assert_eq!(config.otp.max_wait_ms, 60_000);
    assert_eq!(config.otp.poll_interval_ms, 1_000);
    assert_eq!(config.browser.bridge_script, "node/browser_server.js");
    assert!(!config.browser.headed);
    assert_eq!(config.output.format, "json");
}

#[test]
fn config_partial_yaml_keeps_other_defaults() {
    let config = parse_config(
        r#"
timeouts:
  navigation_ms: 90000
otp:
  max_wait_ms: 120000
output:
  format: console
"#,
    );
    assert_eq!(config.timeouts.navigation_ms, 90_000);
    assert_eq!(config.timeouts.load_ms, 15_000);
    assert_eq!(config.otp.max_wait_ms, 120_000);
    assert_eq!(config.otp.min_length, 4);
    assert_eq!(config.output.format, "console");
    assert_eq!(config.browser.bridge_script, "node/browser_server.js");
}

#[test]
fn config_malformed_yaml_falls_back_to_defaults() {
    let config = parse_config("timeouts: [not, a, map");
    assert_eq!(config.timeouts.navigation_ms, 60_000);
    assert_eq!(config.output.format, "json");
}

#[test]
fn config_loads_from_file() {
    let path = std::env::temp_dir().join(format!("qa-scout-test-{}.yaml", std::process::id()));
    std::fs::write(&path, "browser:\n  headed: true\n  bridge_script: bridge.js\n").unwrap();

    let config = load_config(path.to_str());
    std::fs::remove_file(&path).unwrap();

    assert!(config.browser.headed);
    assert_eq!(config.browser.bridge_script, "bridge.js");
}

#[test]
fn component_configs_take_file_timeouts() {
    let config = parse_config(
        r#"
timeouts:
  settle_ms: 3000
  level_settle_ms: 1500
  action_settle_ms: 250
"#,
    );
    let analyzer = config.analyzer_config();
    assert_eq!(analyzer.timeouts.settle_ms, 3_000);
    assert_eq!(analyzer.timeouts.navigation_ms, 60_000);
    assert_eq!(analyzer.levels.settle_ms, 1_500);

    let login = config.login_config();
    assert_eq!(login.action_settle_ms, 250);
    assert_eq!(login.network_idle_ms, 30_000);
    assert_eq!(login.otp, config.otp);
}
