use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use crate::config::ConfigError;
use crate::mapping::{self, MalformedRecord};
use crate::types::{Slide, SlideType};

/// Statically typed normalization capability carried by each source kind.
pub type Normalizer = fn(&Value) -> Result<Slide, MalformedRecord>;

/// Provider feeds the hero rotation knows how to normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    WordpressPosts,
    ContentfulBeats,
    WordpressVideos,
    ContentfulMixes,
    Youtube,
    ShopifyProducts,
}

impl SourceKind {
    pub fn slide_type(&self) -> SlideType {
        match self {
            SourceKind::WordpressPosts => SlideType::Blog,
            SourceKind::ContentfulBeats => SlideType::Beat,
            SourceKind::WordpressVideos => SlideType::Video,
            SourceKind::ContentfulMixes => SlideType::Mix,
            SourceKind::Youtube => SlideType::Youtube,
            SourceKind::ShopifyProducts => SlideType::Product,
        }
    }

    pub fn normalizer(&self) -> Normalizer {
        match self {
            SourceKind::WordpressPosts => mapping::slide_from_wordpress_post,
            SourceKind::ContentfulBeats => mapping::slide_from_contentful_beat,
            SourceKind::WordpressVideos => mapping::slide_from_wordpress_video,
            SourceKind::ContentfulMixes => mapping::slide_from_contentful_mix,
            SourceKind::Youtube => mapping::slide_from_youtube_video,
            SourceKind::ShopifyProducts => mapping::slide_from_shopify_product,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::WordpressPosts => "wordpress-posts",
            SourceKind::ContentfulBeats => "contentful-beats",
            SourceKind::WordpressVideos => "wordpress-videos",
            SourceKind::ContentfulMixes => "contentful-mixes",
            SourceKind::Youtube => "youtube",
            SourceKind::ShopifyProducts => "shopify-products",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn enabled_by_default() -> bool {
    true
}

/// A named, independently fetched feed contributing slides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSource {
    pub id: String,
    pub kind: SourceKind,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl ContentSource {
    pub fn new(id: impl Into<String>, kind: SourceKind) -> Self {
        Self { id: id.into(), kind, enabled: true }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Normalize raw records in provider order, skipping malformed ones.
    pub fn normalize(&self, records: &[Value]) -> Vec<Slide> {
        let normalize = self.kind.normalizer();
        let mut out = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            match normalize(record) {
                Ok(slide) => out.push(slide),
                Err(e) => tracing::warn!(source = %self.id, index = idx, error = %e, "skipping malformed record"),
            }
        }
        out
    }
}

/// Ordered source declarations; position is execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<ContentSource>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<ContentSource>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for s in &sources {
            if !seen.insert(s.id.as_str()) {
                return Err(ConfigError::DuplicateSource(s.id.clone()));
            }
        }
        Ok(Self { sources })
    }

    pub fn sources(&self) -> &[ContentSource] {
        &self.sources
    }

    pub fn enabled(&self) -> impl Iterator<Item = &ContentSource> {
        self.sources.iter().filter(|s| s.enabled)
    }

    pub fn get(&self, id: &str) -> Option<&ContentSource> {
        self.sources.iter().find(|s| s.id == id)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self {
            sources: vec![
                ContentSource::new("posts", SourceKind::WordpressPosts),
                ContentSource::new("beats", SourceKind::ContentfulBeats),
                ContentSource::new("tutorials", SourceKind::WordpressVideos),
                ContentSource::new("mixes", SourceKind::ContentfulMixes),
                ContentSource::new("youtube", SourceKind::Youtube),
                ContentSource::new("shopify", SourceKind::ShopifyProducts),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_registry_order() {
        let reg = SourceRegistry::default();
        let ids: Vec<&str> = reg.sources().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["posts", "beats", "tutorials", "mixes", "youtube", "shopify"]);
        assert!(reg.enabled().count() == 6);
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = SourceRegistry::new(vec![
            ContentSource::new("posts", SourceKind::WordpressPosts),
            ContentSource::new("posts", SourceKind::Youtube),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSource(id) if id == "posts"));
    }

    #[test]
    fn normalize_skips_records_missing_title() {
        let beats = ContentSource::new("beats", SourceKind::ContentfulBeats);
        let records = vec![
            json!({ "id": "b1", "title": "Night Drive", "bpm": 92 }),
            json!({ "id": "b2" }),
        ];
        let slides = beats.normalize(&records);
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].id, "beat:b1");
        assert_eq!(slides[0].slide_type, SlideType::Beat);
    }

    #[test]
    fn kind_round_trips_through_kebab_names() {
        let kind: SourceKind = serde_json::from_value(json!("shopify-products")).unwrap();
        assert_eq!(kind, SourceKind::ShopifyProducts);
        assert_eq!(kind.to_string(), "shopify-products");
        assert_eq!(kind.slide_type(), SlideType::Product);
    }
}
