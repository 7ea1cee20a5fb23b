//! Simulator settings and preferences
//!
//! Read as JSON: from LocalStorage on web, from an environment variable on
//! native. The page (or the shell) owns the stored value.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Error;
use crate::sim::SpawnParams;

/// Simulator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// CSS selector for the elements to drive
    pub selector: String,
    /// Body size when an element reports zero width
    pub fallback_size: f32,
    /// Upper bound on each initial velocity component (pixels per frame)
    pub max_speed: f32,
    /// Fixed seed for reproducible runs (None = fresh entropy each attach)
    pub seed: Option<u64>,
    /// Place bodies but don't animate them
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            selector: DEFAULT_SELECTOR.to_string(),
            fallback_size: FALLBACK_BODY_SIZE,
            max_speed: MAX_INITIAL_SPEED,
            seed: None,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "bounce_field_settings";

    /// Environment variable holding settings JSON (native)
    pub const ENV_VAR: &'static str = "BOUNCE_FIELD_SETTINGS";

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.fallback_size.is_finite() || self.fallback_size <= 0.0 {
            return Err(Error::InvalidSettings(format!(
                "fallback_size must be positive, got {}",
                self.fallback_size
            )));
        }
        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return Err(Error::InvalidSettings(format!(
                "max_speed must be non-negative, got {}",
                self.max_speed
            )));
        }
        if self.selector.trim().is_empty() {
            return Err(Error::InvalidSettings("selector is empty".to_string()));
        }
        Ok(())
    }

    /// Initial placement parameters
    pub fn spawn_params(&self) -> SpawnParams {
        SpawnParams {
            fallback_size: self.fallback_size,
            max_speed: self.max_speed,
        }
    }

    /// The configured seed, or a fresh random one
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Parse stored JSON, falling back to defaults when it is missing or bad
    fn from_stored(json: Option<String>) -> Self {
        match json.map(|json| Self::from_json(&json)) {
            Some(Ok(settings)) => {
                log::debug!("Loaded settings: {:?}", settings);
                settings
            }
            Some(Err(e)) => {
                log::warn!("Ignoring stored settings: {}", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok())
            .flatten();
        Self::from_stored(stored)
    }

    /// Load settings from the environment (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::from_stored(std::env::var(Self::ENV_VAR).ok())
    }
}
