use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sources::{ContentSource, SourceRegistry};
use crate::types::SlideType;

pub const CONFIG_ENV: &str = "HERO_ROTATION_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: `{field}` = {value} (expected {expected})")]
    InvalidValue { field: &'static str, value: i64, expected: &'static str },
    #[error("duplicate content source id `{0}`")]
    DuplicateSource(String),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read configuration {}: {source}", .path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    pub auto_rotate: bool,
    pub interval_ms: i64,
    pub pause_on_hover: bool,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self { auto_rotate: true, interval_ms: 6000, pause_on_hover: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinRule {
    pub enabled: bool,
    /// Slide types eligible for pinning, highest priority first.
    pub sources: Vec<SlideType>,
    pub max_age_days: i64,
}

impl Default for PinRule {
    fn default() -> Self {
        Self { enabled: true, sources: vec![SlideType::Youtube, SlideType::Video], max_age_days: 7 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnimationStyle {
    #[default]
    Fade,
    Slide,
    Zoom,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub style: AnimationStyle,
    pub duration_ms: i64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self { style: AnimationStyle::Fade, duration_ms: 800 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub text_alignment: TextAlignment,
    pub show_metadata: bool,
    pub excerpt_length: i64,
    pub show_date: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self { text_alignment: TextAlignment::Left, show_metadata: true, excerpt_length: 160, show_date: true }
    }
}

/// Deployment-wide hero rotation settings, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RotationConfiguration {
    pub rotation: RotationSettings,
    pub pin_latest_video: PinRule,
    pub animation: AnimationSettings,
    pub layout: LayoutSettings,
    /// Overrides the built-in source registry when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<ContentSource>>,
}

impl RotationConfiguration {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    /// Numeric invariants; checked before any aggregation runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("rotation.interval_ms", self.rotation.interval_ms)?;
        non_negative("pin_latest_video.max_age_days", self.pin_latest_video.max_age_days)?;
        non_negative("animation.duration_ms", self.animation.duration_ms)?;
        non_negative("layout.excerpt_length", self.layout.excerpt_length)?;
        self.registry().map(|_| ())
    }

    pub fn registry(&self) -> Result<SourceRegistry, ConfigError> {
        match &self.sources {
            Some(list) => SourceRegistry::new(list.clone()),
            None => Ok(SourceRegistry::default()),
        }
    }
}

fn positive(field: &'static str, value: i64) -> Result<(), ConfigError> {
    if value > 0 { Ok(()) } else { Err(ConfigError::InvalidValue { field, value, expected: "> 0" }) }
}

fn non_negative(field: &'static str, value: i64) -> Result<(), ConfigError> {
    if value >= 0 { Ok(()) } else { Err(ConfigError::InvalidValue { field, value, expected: ">= 0" }) }
}

/// Explicit path, then `HERO_ROTATION_CONFIG`, then the platform config dir.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    resolve_with_env(explicit, std::env::var_os(CONFIG_ENV)).map(|(path, _)| path)
}

// The flag is true when the path was named by the caller or the environment
// and so has to exist.
fn resolve_with_env(explicit: Option<&Path>, env: Option<OsString>) -> Option<(PathBuf, bool)> {
    if let Some(p) = explicit {
        return Some((p.to_path_buf(), true));
    }
    if let Some(p) = env.filter(|p| !p.is_empty()) {
        return Some((PathBuf::from(p), true));
    }
    default_config_path().map(|p| (p, false))
}

pub fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("dev", "hero-rotation", "hero-rotation")?;
    Some(proj.config_dir().join("rotation.toml"))
}

/// Load the resolved configuration. A path given explicitly or through
/// `HERO_ROTATION_CONFIG` must exist; only a missing platform default falls
/// back to built-in defaults.
pub fn load(explicit: Option<&Path>) -> Result<RotationConfiguration, ConfigError> {
    load_with_env(explicit, std::env::var_os(CONFIG_ENV))
}

fn load_with_env(explicit: Option<&Path>, env: Option<OsString>) -> Result<RotationConfiguration, ConfigError> {
    match resolve_with_env(explicit, env) {
        Some((path, required)) if required || path.exists() => {
            tracing::debug!(path = %path.display(), "loading rotation configuration");
            RotationConfiguration::from_file(&path)
        }
        _ => {
            let cfg = RotationConfiguration::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }
}
