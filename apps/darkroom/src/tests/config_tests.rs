use super::*;

use std::{
    collections::HashMap,
    env,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_config(label: &str, contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("darkroom_config_{label}_{suffix}.toml"));
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn defaults_reproduce_the_canonical_timing() {
    let settings = Settings::default();
    assert_eq!(settings.timing(), Timing::default());
    assert!(settings.image_endpoint.is_none());
    assert!(settings.fallback_image_url.starts_with("https://images.unsplash.com/"));
}

#[test]
fn file_values_override_defaults() {
    let path = temp_config(
        "file",
        r#"
theme = "harbour at dawn"
image_endpoint = "http://127.0.0.1:9000/generate"
auto_review = false

[timing]
bath_tick_ms = 10
"#,
    );

    let settings = load_settings_with(Some(&path), no_env).expect("settings");
    assert_eq!(settings.theme, "harbour at dawn");
    assert_eq!(
        settings.image_endpoint.as_deref(),
        Some("http://127.0.0.1:9000/generate")
    );
    let timing = settings.timing();
    assert!(!timing.auto_review);
    assert_eq!(timing.bath_tick, Duration::from_millis(10));
    assert_eq!(timing.exposure_tick, Duration::from_millis(100));

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn environment_wins_over_file() {
    let path = temp_config("env", "theme = \"meadow\"\nimage_api_key = \"from-file\"\n");
    let vars = HashMap::from([
        ("DARKROOM__THEME", "lighthouse"),
        ("DARKROOM__IMAGE_API_KEY", "  "),
        ("DARKROOM__TIMING__DRYING_TICK_MS", "0"),
        ("DARKROOM__IMAGE_TIMEOUT_MS", "not-a-number"),
    ]);

    let settings = load_settings_with(Some(&path), |key| {
        vars.get(key).map(|v| v.to_string())
    })
    .expect("settings");
    assert_eq!(settings.theme, "lighthouse");
    assert_eq!(settings.image_api_key, None);
    assert_eq!(settings.image_timeout_ms, 30_000);
    assert_eq!(settings.timing.drying_tick_ms, 0);
    assert_eq!(settings.timing().drying_tick, Duration::from_millis(1));

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn explicit_missing_file_is_an_error() {
    let path = env::temp_dir().join("darkroom_config_test_missing.toml");
    let err = load_settings_with(Some(&path), no_env).expect_err("missing file");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn rejects_settings_that_would_stall_the_process() {
    let path = temp_config("stall", "[timing]\ndrying_step_percent = 0.0\n");
    assert!(load_settings_with(Some(&path), no_env).is_err());
    fs::remove_file(path).expect("cleanup");

    let path = temp_config("blank", "theme = \"   \"\n");
    assert!(load_settings_with(Some(&path), no_env).is_err());
    fs::remove_file(path).expect("cleanup");
}

#[test]
fn malformed_toml_is_reported() {
    let path = temp_config("malformed", "theme = [\n");
    let err = load_settings_with(Some(&path), no_env).expect_err("bad toml");
    assert!(err.to_string().contains("invalid config file"));
    fs::remove_file(path).expect("cleanup");
}
