use release_watch::config::load_config_file;
use release_watch::{ConfigError, ConfigOverrides, RunnerConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn token_only() -> ConfigOverrides {
    ConfigOverrides {
        github_token: Some("ghp_test".to_string()),
        ..Default::default()
    }
}

#[test]
fn parses_fixture_file() {
    let file = load_config_file(&fixture("config.toml")).unwrap().unwrap();

    assert_eq!(
        file.watch.repository.as_deref(),
        Some("ethereum/go-ethereum")
    );
    assert_eq!(file.watch.interval_secs, Some(300));
    assert_eq!(file.watch.fetch_count, Some(10));
    assert!(file.watch.github_token.is_none());
}

#[test]
fn resolves_fixture_with_overrides() {
    // Relative template paths resolve against the working directory, which
    // is the package root under the test harness.
    let config = RunnerConfig::load(token_only(), &fixture("config.toml")).unwrap();

    assert_eq!(config.repository().full_name(), "ethereum/go-ethereum");
    assert_eq!(config.interval(), Duration::from_secs(300));
    assert_eq!(config.fetch_count(), 10);
    assert_eq!(config.state_file(), Path::new("state/seen_releases.json"));
    assert_eq!(
        config.webhook_url().map(|url| url.host_str()),
        Some(Some("hooks.slack.com"))
    );
    assert!(config
        .message_template()
        .is_some_and(|template| template.contains("{{status}}")));
}

#[test]
fn missing_file_falls_back_to_overrides() {
    let overrides = ConfigOverrides {
        repository: Some("owner/repo".to_string()),
        dry_run: true,
        ..token_only()
    };

    let config = RunnerConfig::load(overrides, &fixture("does-not-exist.toml")).unwrap();

    assert_eq!(config.repository().full_name(), "owner/repo");
    assert!(config.dry_run());
    assert!(config.webhook_url().is_none());
}

#[test]
fn invalid_toml_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[watch\nrepository = ").unwrap();

    assert!(matches!(
        RunnerConfig::load(token_only(), &path),
        Err(ConfigError::TomlError { .. })
    ));
}

#[test]
fn invalid_repository_is_reported() {
    let overrides = ConfigOverrides {
        repository: Some("not-a-slug".to_string()),
        dry_run: true,
        ..token_only()
    };

    assert!(RunnerConfig::resolve(overrides, None).is_err());
}
