use std::{fs, path::Path, str::FromStr, time::Duration};

use anyhow::{bail, Context};
use darkroom_core::Timing;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "darkroom.toml";
const ENV_PREFIX: &str = "DARKROOM__";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: String,
    pub fallback_image_url: String,
    pub image_endpoint: Option<String>,
    pub image_api_key: Option<String>,
    pub image_timeout_ms: u64,
    pub log_filter: String,
    pub auto_review: bool,
    pub timing: TimingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "antique still life with fruit".into(),
            fallback_image_url: "https://images.unsplash.com/photo-1516035069371-29a1b244cc32?q=80&w=1000&auto=format&fit=crop".into(),
            image_endpoint: None,
            image_api_key: None,
            image_timeout_ms: 30_000,
            log_filter: "info".into(),
            auto_review: true,
            timing: TimingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub exposure_tick_ms: u64,
    pub bath_tick_ms: u64,
    pub bath_step_secs: f64,
    pub cover_delay_ms: u64,
    pub drying_start_delay_ms: u64,
    pub drying_tick_ms: u64,
    pub drying_step_percent: f64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            exposure_tick_ms: 100,
            bath_tick_ms: 100,
            bath_step_secs: 1.0,
            cover_delay_ms: 500,
            drying_start_delay_ms: 1500,
            drying_tick_ms: 30,
            drying_step_percent: 0.5,
        }
    }
}

impl Settings {
    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms.max(1))
    }

    /// Tick periods are clamped to 1ms; a zero period would never yield.
    pub fn timing(&self) -> Timing {
        let t = &self.timing;
        Timing {
            exposure_tick: Duration::from_millis(t.exposure_tick_ms.max(1)),
            bath_tick: Duration::from_millis(t.bath_tick_ms.max(1)),
            bath_step_secs: t.bath_step_secs,
            cover_delay: Duration::from_millis(t.cover_delay_ms),
            drying_start_delay: Duration::from_millis(t.drying_start_delay_ms),
            drying_tick: Duration::from_millis(t.drying_tick_ms.max(1)),
            drying_step_percent: t.drying_step_percent,
            auto_review: self.auto_review,
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.theme.trim().is_empty() {
            bail!("theme must not be empty");
        }
        if self.fallback_image_url.trim().is_empty() {
            bail!("fallback_image_url must not be empty");
        }
        let t = &self.timing;
        if !(t.bath_step_secs.is_finite() && t.bath_step_secs > 0.0) {
            bail!("timing.bath_step_secs must be positive (got {})", t.bath_step_secs);
        }
        if !(t.drying_step_percent.is_finite() && t.drying_step_percent > 0.0) {
            bail!(
                "timing.drying_step_percent must be positive (got {})",
                t.drying_step_percent
            );
        }
        Ok(())
    }
}

/// Defaults, then `darkroom.toml` (or `path`), then `DARKROOM__*` variables.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

pub(crate) fn load_settings_with(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            parse_settings(&raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?
        }
        None => match fs::read_to_string(DEFAULT_CONFIG_FILE) {
            Ok(raw) => parse_settings(&raw)
                .with_context(|| format!("invalid config file '{DEFAULT_CONFIG_FILE}'"))?,
            Err(_) => Settings::default(),
        },
    };

    apply_env_overrides(&mut settings, env);
    settings.validate()?;
    Ok(settings)
}

fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str(raw)?)
}

fn apply_env_overrides(settings: &mut Settings, env: impl Fn(&str) -> Option<String>) {
    let var = |name: &str| env(&format!("{ENV_PREFIX}{name}"));

    if let Some(v) = var("THEME") {
        settings.theme = v;
    }
    if let Some(v) = var("FALLBACK_IMAGE_URL") {
        settings.fallback_image_url = v;
    }
    if let Some(v) = var("IMAGE_ENDPOINT") {
        settings.image_endpoint = Some(v);
    }
    if let Some(v) = var("IMAGE_API_KEY") {
        settings.image_api_key = Some(v);
    }
    if let Some(v) = var("LOG_FILTER") {
        settings.log_filter = v;
    }
    override_parsed(var("IMAGE_TIMEOUT_MS"), &mut settings.image_timeout_ms);
    override_parsed(var("AUTO_REVIEW"), &mut settings.auto_review);

    let t = &mut settings.timing;
    override_parsed(var("TIMING__EXPOSURE_TICK_MS"), &mut t.exposure_tick_ms);
    override_parsed(var("TIMING__BATH_TICK_MS"), &mut t.bath_tick_ms);
    override_parsed(var("TIMING__BATH_STEP_SECS"), &mut t.bath_step_secs);
    override_parsed(var("TIMING__COVER_DELAY_MS"), &mut t.cover_delay_ms);
    override_parsed(var("TIMING__DRYING_START_DELAY_MS"), &mut t.drying_start_delay_ms);
    override_parsed(var("TIMING__DRYING_TICK_MS"), &mut t.drying_tick_ms);
    override_parsed(var("TIMING__DRYING_STEP_PERCENT"), &mut t.drying_step_percent);

    // Blank values switch an optional setting off again.
    if settings
        .image_endpoint
        .as_deref()
        .is_some_and(|v| v.trim().is_empty())
    {
        settings.image_endpoint = None;
    }
    if settings
        .image_api_key
        .as_deref()
        .is_some_and(|v| v.trim().is_empty())
    {
        settings.image_api_key = None;
    }
}

fn override_parsed<T: FromStr>(raw: Option<String>, target: &mut T) {
    if let Some(parsed) = raw.and_then(|v| v.trim().parse::<T>().ok()) {
        *target = parsed;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
