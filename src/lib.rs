pub mod aggregator;
pub mod config;
pub mod display;
pub mod mapping;
pub mod pinning;
pub mod sources;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::aggregator::{FeedSet, SourceFeed};
    pub use crate::config::{ConfigError, RotationConfiguration};
    pub use crate::display::DisplayParameters;
    pub use crate::sources::{ContentSource, SourceKind, SourceRegistry};
    pub use crate::types::{CallToAction, Slide, SlideImage, SlideMeta, SlideType};
    pub use crate::{HeroRotation, Rotation};
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregator::{aggregate, FeedSet};
use crate::config::{ConfigError, RotationConfiguration};
use crate::display::DisplayParameters;
use crate::pinning::apply_pin;
use crate::sources::SourceRegistry;
use crate::types::Slide;

/// The ordered slides plus the parameters the renderer cycles them with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rotation {
    pub slides: Vec<Slide>,
    pub display: DisplayParameters,
}

impl Rotation {
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Library entry point. Holds validated configuration and the source registry;
/// every build is an independent pure transform over the supplied feeds.
#[derive(Debug, Clone)]
pub struct HeroRotation {
    config: RotationConfiguration,
    registry: SourceRegistry,
    display: DisplayParameters,
}

impl HeroRotation {
    /// Validate the configuration. Fails before any aggregation can run.
    pub fn new(config: RotationConfiguration) -> Result<Self, ConfigError> {
        let display = DisplayParameters::resolve(&config)?;
        let registry = config.registry()?;
        Ok(Self { config, registry, display })
    }

    /// Use an explicit registry instead of the one the configuration declares.
    pub fn with_registry(config: RotationConfiguration, registry: SourceRegistry) -> Result<Self, ConfigError> {
        let display = DisplayParameters::resolve(&config)?;
        Ok(Self { config, registry, display })
    }

    pub fn config(&self) -> &RotationConfiguration {
        &self.config
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn display(&self) -> &DisplayParameters {
        &self.display
    }

    /// Normalize, concatenate and pin. `now` drives pin-age checks.
    pub fn build(&self, feeds: &FeedSet, now: DateTime<Utc>) -> Rotation {
        let combined = aggregate(&self.registry, feeds);
        let slides = apply_pin(combined, &self.config.pin_latest_video, now);
        tracing::info!(slides = slides.len(), "built hero rotation");
        Rotation { slides, display: self.display.clone() }
    }
}
