mod support;

use std::time::Duration;

use embed_core::EmbedSettings;
use embed_engine::{load_settings, load_settings_or_default, ConfigError};
use pretty_assertions::assert_eq;
use support::{harness, init_logging, SurfaceScript, EMBED_LINK};
use tokio::time::Instant;

#[test]
fn loads_overrides_from_file() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("embed.ron");
    std::fs::write(
        &path,
        r#"(
            domain_marker: "powerbi.com",
            quick: (timeout_ms: 750),
            popup: (window_name: "Reports", max_width: 1200),
        )"#,
    )
    .unwrap();

    let settings = load_settings(&path).unwrap();
    assert_eq!(settings.quick.timeout_ms, 750);
    assert_eq!(settings.popup.window_name, "Reports");
    assert_eq!(settings.popup.max_width, 1_200);
    assert_eq!(settings.popup.max_height, 1_000);
}

#[test]
fn missing_file_is_an_io_error_and_defaults_apply() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.ron");
    assert!(matches!(load_settings(&path), Err(ConfigError::Io { .. })));
    assert_eq!(load_settings_or_default(&path), EmbedSettings::default());
}

#[test]
fn invalid_file_falls_back_to_defaults() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.ron");
    std::fs::write(&path, "(authenticated: (poll_max_checks: 0))").unwrap();
    assert!(matches!(
        load_settings(&path),
        Err(ConfigError::Invalid { .. })
    ));
    assert_eq!(load_settings_or_default(&path), EmbedSettings::default());
}

#[tokio::test(start_paused = true)]
async fn loaded_settings_drive_the_orchestrator() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("embed.ron");
    std::fs::write(&path, "(quick: (timeout_ms: 750))").unwrap();

    let mut h = harness(load_settings_or_default(&path), SurfaceScript::never_loads());
    let started = Instant::now();
    h.orchestrator.handle().load_report_smart(EMBED_LINK);
    h.orchestrator.run_until(|view| view.fallback.is_some()).await;
    assert_eq!(started.elapsed(), Duration::from_millis(750));
}
