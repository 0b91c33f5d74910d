//! Layered configuration: defaults, then the user config file, then environment.
//!
//! The file lives at `<config dir>/valence-lab/config.json`. Recognised
//! environment variables:
//! - `VALENCE_PORT`
//! - `VALENCE_CATALOG` - path to a catalog JSON file
//! - `VALENCE_EXTRACTOR_URL`, `VALENCE_EXTRACTOR_API_KEY`
//! - `VALENCE_HAZARD_MS`, `VALENCE_QUIZ_FEEDBACK_MS`
//! - `VALENCE_SESSION_IDLE_MINUTES` - `0` keeps sessions until deleted

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "valence-lab";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Port for the HTTP API.
    pub port: u16,
    /// Catalog file. `None` uses the bundled catalog.
    pub catalog_path: Option<PathBuf>,
    /// Document-analysis endpoint. `None` disables server-side uploads.
    pub extractor_url: Option<String>,
    pub extractor_api_key: Option<String>,
    /// How long the hazard animation runs before the quiz is revealed.
    pub hazard_animation_ms: u64,
    /// How long quiz feedback is shown before the vessel resets.
    pub quiz_feedback_ms: u64,
    /// Sessions untouched for this long are dropped. `0` disables expiry.
    pub session_idle_minutes: u64,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            catalog_path: None,
            extractor_url: None,
            extractor_api_key: None,
            hazard_animation_ms: 2000,
            quiz_feedback_ms: 1500,
            session_idle_minutes: 60,
        }
    }
}

impl LabConfig {
    /// Load the user config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match get_config_path() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a config file. A missing file yields the defaults; a malformed one is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = lookup("VALENCE_PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("VALENCE_PORT is not a valid port: {}", port))?;
        }
        if let Some(path) = lookup("VALENCE_CATALOG") {
            self.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup("VALENCE_EXTRACTOR_URL") {
            self.extractor_url = Some(url);
        }
        if let Some(key) = lookup("VALENCE_EXTRACTOR_API_KEY") {
            self.extractor_api_key = Some(key);
        }
        if let Some(ms) = lookup("VALENCE_HAZARD_MS") {
            self.hazard_animation_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("VALENCE_HAZARD_MS is not a number: {}", ms))?;
        }
        if let Some(ms) = lookup("VALENCE_QUIZ_FEEDBACK_MS") {
            self.quiz_feedback_ms = ms
                .trim()
                .parse()
                .with_context(|| format!("VALENCE_QUIZ_FEEDBACK_MS is not a number: {}", ms))?;
        }
        if let Some(minutes) = lookup("VALENCE_SESSION_IDLE_MINUTES") {
            self.session_idle_minutes = minutes.trim().parse().with_context(|| {
                format!("VALENCE_SESSION_IDLE_MINUTES is not a number: {}", minutes)
            })?;
        }
        Ok(())
    }

    pub fn hazard_animation(&self) -> Duration {
        Duration::from_millis(self.hazard_animation_ms)
    }

    pub fn quiz_feedback(&self) -> Duration {
        Duration::from_millis(self.quiz_feedback_ms)
    }

    pub fn session_idle(&self) -> Option<chrono::Duration> {
        match self.session_idle_minutes {
            0 => None,
            minutes => Some(chrono::Duration::minutes(minutes as i64)),
        }
    }
}

fn get_config_path() -> Option<PathBuf> {
    let mut path = config_dir()?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Some(path)
}
