use serde::Serialize;
use std::time::Duration;

use crate::config::{AnimationStyle, ConfigError, RotationConfiguration, TextAlignment};
use crate::types::Slide;

/// Validated, typed view of the configuration handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayParameters {
    pub auto_rotate: bool,
    #[serde(serialize_with = "as_millis")]
    pub interval: Duration,
    pub pause_on_hover: bool,
    pub animation: AnimationStyle,
    #[serde(serialize_with = "as_millis")]
    pub animation_duration: Duration,
    pub text_alignment: TextAlignment,
    pub show_metadata: bool,
    pub show_date: bool,
    /// 0 disables truncation.
    pub excerpt_length: usize,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

impl DisplayParameters {
    pub fn resolve(cfg: &RotationConfiguration) -> Result<Self, ConfigError> {
        cfg.validate()?;
        // validate() guarantees these are non-negative
        Ok(Self {
            auto_rotate: cfg.rotation.auto_rotate,
            interval: Duration::from_millis(cfg.rotation.interval_ms as u64),
            pause_on_hover: cfg.rotation.pause_on_hover,
            animation: cfg.animation.style,
            animation_duration: Duration::from_millis(cfg.animation.duration_ms as u64),
            text_alignment: cfg.layout.text_alignment,
            show_metadata: cfg.layout.show_metadata,
            show_date: cfg.layout.show_date,
            excerpt_length: cfg.layout.excerpt_length as usize,
        })
    }

    pub fn excerpt_for(&self, slide: &Slide) -> String {
        truncate_excerpt(&slide.excerpt, self.excerpt_length)
    }
}

/// Cut at the last word boundary within `max` chars and append an ellipsis.
pub fn truncate_excerpt(text: &str, max: usize) -> String {
    if max == 0 || text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    let at_word = match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    let head = at_word.trim_end_matches(|c: char| c.is_whitespace() || c == ',' || c == '.');
    if head.is_empty() {
        return format!("{}…", cut.trim_end());
    }
    format!("{head}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_defaults() {
        let p = DisplayParameters::resolve(&RotationConfiguration::default()).unwrap();
        assert_eq!(p.interval, Duration::from_millis(6000));
        assert_eq!(p.animation_duration, Duration::from_millis(800));
        assert_eq!(p.excerpt_length, 160);
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["interval"], 6000);
        assert_eq!(v["textAlignment"], "left");
    }

    #[test]
    fn resolve_fails_fast_on_bad_values() {
        let mut cfg = RotationConfiguration::default();
        cfg.pin_latest_video.max_age_days = -3;
        assert!(matches!(
            DisplayParameters::resolve(&cfg),
            Err(ConfigError::InvalidValue { field: "pin_latest_video.max_age_days", value: -3, .. })
        ));
    }

    #[test]
    fn truncation_respects_word_boundaries() {
        assert_eq!(truncate_excerpt("short", 10), "short");
        assert_eq!(truncate_excerpt("layered synth pads, warm bass", 20), "layered synth pads…");
        assert_eq!(truncate_excerpt("anything at all", 0), "anything at all");
        assert_eq!(truncate_excerpt("supercalifragilistic", 5), "super…");
    }

    #[test]
    fn truncation_never_yields_a_bare_ellipsis() {
        assert_eq!(truncate_excerpt("... abcdef", 5), "... a…");
        assert_eq!(truncate_excerpt(", , , , , , tail", 4), ", ,…");
    }
}
