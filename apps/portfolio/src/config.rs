use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use presentation_core::{
    feedback::{COPY_FEEDBACK_DURATION, SUCCESS_BANNER_DURATION},
    reveal::DEFAULT_REVEAL_THRESHOLD,
    transport::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_SUBMIT_ENDPOINT},
    FeedbackDurations, RevealThreshold,
};
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "portfolio.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub submit_endpoint: String,
    pub access_key: String,
    pub contact_email: String,
    pub reveal_threshold: f32,
    pub copy_feedback_ms: u64,
    pub success_banner_ms: u64,
    pub request_timeout_secs: u64,
    pub theme_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            submit_endpoint: DEFAULT_SUBMIT_ENDPOINT.into(),
            access_key: String::new(),
            contact_email: "hello@example.com".into(),
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            copy_feedback_ms: duration_ms(COPY_FEEDBACK_DURATION),
            success_banner_ms: duration_ms(SUCCESS_BANNER_DURATION),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            theme_file: None,
        }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Settings {
    pub fn reveal_threshold(&self) -> RevealThreshold {
        RevealThreshold::new(self.reveal_threshold)
    }

    pub fn feedback_durations(&self) -> FeedbackDurations {
        FeedbackDurations {
            copy: Duration::from_millis(self.copy_feedback_ms),
            success_banner: Duration::from_millis(self.success_banner_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let endpoint = url::Url::parse(&self.submit_endpoint)
            .with_context(|| format!("invalid submit_endpoint '{}'", self.submit_endpoint))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            bail!(
                "submit_endpoint must use http or https, got '{}'",
                endpoint.scheme()
            );
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    fn apply(&mut self, key: &str, raw: &str) {
        let raw = raw.trim();
        match key {
            "submit_endpoint" => self.submit_endpoint = raw.to_string(),
            "access_key" => self.access_key = raw.to_string(),
            "contact_email" => self.contact_email = raw.to_string(),
            "theme_file" => self.theme_file = Some(PathBuf::from(raw)),
            "reveal_threshold" => match raw.parse::<f32>() {
                Ok(parsed) => self.reveal_threshold = parsed,
                Err(_) => warn!(key, value = raw, "ignoring unparsable setting"),
            },
            "copy_feedback_ms" | "success_banner_ms" | "request_timeout_secs" => {
                let Ok(parsed) = raw.parse::<u64>() else {
                    warn!(key, value = raw, "ignoring unparsable setting");
                    return;
                };
                match key {
                    "copy_feedback_ms" => self.copy_feedback_ms = parsed,
                    "success_banner_ms" => self.success_banner_ms = parsed,
                    _ => self.request_timeout_secs = parsed,
                }
            }
            _ => warn!(key, "ignoring unknown setting"),
        }
    }
}

const SETTING_KEYS: &[&str] = &[
    "submit_endpoint",
    "access_key",
    "contact_email",
    "reveal_threshold",
    "copy_feedback_ms",
    "success_banner_ms",
    "request_timeout_secs",
    "theme_file",
];

pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let required = config_path.is_some();
    load_settings_from(path, required, |name| std::env::var(name).ok())
}

/// Defaults, then the TOML file, then `PORTFOLIO_<KEY>` and `APP__<KEY>` variables.
pub fn load_settings_from(
    path: &Path,
    required: bool,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg = toml::from_str::<HashMap<String, toml::Value>>(&raw)
                .with_context(|| format!("failed to parse '{}'", path.display()))?;
            for (key, value) in &file_cfg {
                let raw = match value {
                    toml::Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                settings.apply(key, &raw);
            }
        }
        Err(err) if required => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
        }
        Err(_) => {}
    }

    for key in SETTING_KEYS {
        let upper = key.to_ascii_uppercase();
        if let Some(v) = env(&format!("PORTFOLIO_{upper}")) {
            settings.apply(key, &v);
        }
        if let Some(v) = env(&format!("APP__{upper}")) {
            settings.apply(key, &v);
        }
    }

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
