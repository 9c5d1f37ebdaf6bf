use serde_json::Value;
use std::collections::{HashMap, HashSet};

use crate::sources::SourceRegistry;
use crate::types::Slide;

/// Outcome of the external fetch for one source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceFeed {
    Records(Vec<Value>),
    Unavailable(String),
}

/// Fetch outcomes keyed by source id. A source with no entry is unavailable.
#[derive(Debug, Clone, Default)]
pub struct FeedSet {
    feeds: HashMap<String, SourceFeed>,
}

impl FeedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_records(&mut self, source_id: impl Into<String>, records: Vec<Value>) -> &mut Self {
        self.feeds.insert(source_id.into(), SourceFeed::Records(records));
        self
    }

    pub fn insert_unavailable(&mut self, source_id: impl Into<String>, reason: impl Into<String>) -> &mut Self {
        self.feeds.insert(source_id.into(), SourceFeed::Unavailable(reason.into()));
        self
    }

    pub fn get(&self, source_id: &str) -> Option<&SourceFeed> {
        self.feeds.get(source_id)
    }

    /// Record a raw fetch payload; unrecognized shapes count as unavailable.
    pub fn insert_payload(&mut self, source_id: impl Into<String>, payload: Value) -> &mut Self {
        match records_from_payload(payload) {
            Some(records) => self.insert_records(source_id, records),
            None => self.insert_unavailable(source_id, "unrecognized feed payload"),
        }
    }
}

/// Unwrap the common list envelopes: a bare array, GraphQL `nodes` or
/// `edges[].node`, or a REST-style `items` array.
pub fn records_from_payload(payload: Value) -> Option<Vec<Value>> {
    match payload {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => {
            if let Some(Value::Array(nodes)) = map.remove("nodes") {
                return Some(nodes);
            }
            if let Some(Value::Array(edges)) = map.remove("edges") {
                return Some(
                    edges
                        .into_iter()
                        .filter_map(|mut e| e.get_mut("node").map(Value::take))
                        .collect(),
                );
            }
            match map.remove("items") {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Normalize every enabled source and concatenate in registry order.
///
/// An unavailable source contributes nothing; the others still aggregate.
/// Duplicate slide ids keep their first occurrence.
pub fn aggregate(registry: &SourceRegistry, feeds: &FeedSet) -> Vec<Slide> {
    let mut out = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for source in registry.enabled() {
        let records = match feeds.get(&source.id) {
            Some(SourceFeed::Records(r)) => r,
            Some(SourceFeed::Unavailable(reason)) => {
                tracing::warn!(source = %source.id, reason = %reason, "source unavailable; contributing no slides");
                continue;
            }
            None => {
                tracing::warn!(source = %source.id, "no feed supplied; contributing no slides");
                continue;
            }
        };
        let slides = source.normalize(records);
        tracing::debug!(source = %source.id, records = records.len(), slides = slides.len(), "normalized source");
        for slide in slides {
            if seen.insert(slide.id.clone()) {
                out.push(slide);
            } else {
                tracing::warn!(source = %source.id, slide = %slide.id, "dropping duplicate slide id");
            }
        }
    }
    out
}
