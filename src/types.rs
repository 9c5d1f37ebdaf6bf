use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of slide kinds the hero layout knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideType {
    Blog,
    Beat,
    Video,
    Mix,
    Youtube,
    Product,
}

impl SlideType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideType::Blog => "blog",
            SlideType::Beat => "beat",
            SlideType::Video => "video",
            SlideType::Mix => "mix",
            SlideType::Youtube => "youtube",
            SlideType::Product => "product",
        }
    }
}

impl fmt::Display for SlideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToAction {
    pub label: String,
    pub link: String,
}

/// Per-type extras shown under the slide title when `show_metadata` is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SlideMeta {
    #[default]
    None,
    Beat {
        bpm: Option<u32>,
        key: Option<String>,
        genre: Option<String>,
    },
    Mix {
        duration: Option<String>,
    },
    Video {
        duration: Option<String>,
    },
    Product {
        price: Option<String>,
        currency: Option<String>,
    },
}

/// One normalized, display-ready hero item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    #[serde(rename = "type")]
    pub slide_type: SlideType,
    pub title: String,
    pub excerpt: String,
    pub image: Option<SlideImage>,
    pub cta: Option<CallToAction>,
    pub meta: SlideMeta,
    pub published_at: Option<DateTime<Utc>>,
    pub url: String,
}

impl Slide {
    /// Age relative to `now`, clamped at zero for future-dated items.
    pub fn age(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.published_at
            .map(|at| (now - at).max(chrono::Duration::zero()))
    }
}
