// Tests for configuration loading

use anyhow::Result;
use spam_console::Config;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_config_file_overrides_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("spam-console.toml");
    fs::write(
        &path,
        r#"
[service]
name = "staging-console"
base_url = "https://spam.example.com"
request_timeout_secs = 15

[session]
history_limit = 25
"#,
    )?;

    let cfg = Config::load(path.to_str().expect("utf-8 path"))?;

    assert_eq!(cfg.service.name, "staging-console");
    assert_eq!(cfg.session.history_limit, 25);
    // Untouched sections keep their defaults
    assert_eq!(cfg.mock_addr(), "127.0.0.1:8000");

    let session = cfg.session_config();
    assert_eq!(session.base_url, "https://spam.example.com");
    assert_eq!(session.history_limit, 25);
    assert_eq!(session.request_timeout, Some(Duration::from_secs(15)));
    assert!(session.session_id.starts_with("session-"));

    Ok(())
}

#[test]
fn test_missing_config_file_uses_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("absent");

    let cfg = Config::load(path.to_str().expect("utf-8 path"))?;

    assert_eq!(cfg.service.name, "spam-console");
    assert_eq!(cfg.session.history_limit, 10);
    assert_eq!(cfg.session_config().request_timeout, None);

    Ok(())
}
