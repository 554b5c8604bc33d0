//! Crime Hotspot Predictor
//!
//! Turns a time context (month, day, hour) into a risk tier and a patrol
//! recommendation for every police district, then partitions the results
//! into tier-keyed heat point collections for density rendering.
//!
//! # Pipeline
//!
//! ```text
//! labels ─► normalize ─► predict_all ─► classify ─► aggregate ─► assemble
//!           TimeContext   zone → class   tier/action  records + heat   PipelineResult
//! ```
//!
//! | Stage      | Module       | Fails with            |
//! |------------|--------------|-----------------------|
//! | Normalize  | `normalize`  | `Validation`          |
//! | Predict    | `batch`      | `Inference`           |
//! | Classify   | `classify`   | `InvalidPrediction`   |
//! | Aggregate  | `aggregate`  | `LocationNotFound`    |
//! | Assemble   | `assemble`   | (none)                |
//!
//! Every request is one full sweep over the valid districts
//! (`1..=25` minus `{13, 21, 23}`). A request either yields a record for
//! every district or fails as a whole.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use zone_model::ModelError;

pub mod aggregate;
pub mod assemble;
pub mod batch;
pub mod classify;
pub mod config;
pub mod loader;
pub mod normalize;
pub mod render;
pub mod runtime;
pub mod zones;

pub use assemble::{assemble, run};
pub use batch::{predict_all, ExecutionMode, ZonePrediction};
pub use classify::{classify, RiskTier};
pub use config::RuntimeConfig;
pub use loader::ZoneDirectory;
pub use normalize::{normalize, TimeContext};
pub use render::RenderStyle;
pub use runtime::Runtime;
pub use zones::valid_zones;

/// Weight given to every heat point
pub const HEAT_WEIGHT: f64 = 1.0;

#[derive(Error, Debug)]
pub enum HotspotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
    #[error("Invalid {field}: {value}")]
    Validation { field: &'static str, value: String },
    #[error("Inference failed for zone {zone}: {source}")]
    Inference { zone: ZoneId, source: ModelError },
    #[error("Invalid prediction{}: class index {index} is not a known risk tier", zone_suffix(.zone))]
    InvalidPrediction { zone: Option<ZoneId>, index: i64 },
    #[error("No location found for zone {0}")]
    LocationNotFound(ZoneId),
}

fn zone_suffix(zone: &Option<ZoneId>) -> String {
    zone.map(|z| format!(" for zone {}", z)).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, HotspotError>;

/// Police district identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u8);

impl ZoneId {
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference location of a district, owned by the coordinate store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Classified district with its recommendation and location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub zone: ZoneId,
    pub tier: RiskTier,
    pub action: &'static str,
    pub location: ZoneLocation,
}

/// Weighted point for a density layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub zone: ZoneId,
    pub latitude: f64,
    pub longitude: f64,
    pub weight: f64,
}

impl HeatPoint {
    /// `[lat, lon, weight]` as heat layers expect it
    pub fn as_triple(&self) -> [f64; 3] {
        [self.latitude, self.longitude, self.weight]
    }
}

/// Heat points partitioned by risk tier, each bucket in zone order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HeatDataset {
    #[serde(rename = "Low")]
    low: Vec<HeatPoint>,
    #[serde(rename = "Medium")]
    medium: Vec<HeatPoint>,
    #[serde(rename = "High")]
    high: Vec<HeatPoint>,
}

impl HeatDataset {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket_mut(&mut self, tier: RiskTier) -> &mut Vec<HeatPoint> {
        match tier {
            RiskTier::Low => &mut self.low,
            RiskTier::Medium => &mut self.medium,
            RiskTier::High => &mut self.high,
        }
    }

    pub fn push(&mut self, tier: RiskTier, point: HeatPoint) {
        self.bucket_mut(tier).push(point);
    }

    pub fn get(&self, tier: RiskTier) -> &[HeatPoint] {
        match tier {
            RiskTier::Low => &self.low,
            RiskTier::Medium => &self.medium,
            RiskTier::High => &self.high,
        }
    }

    /// Buckets in tier order
    pub fn iter(&self) -> impl Iterator<Item = (RiskTier, &[HeatPoint])> {
        RiskTier::ALL.into_iter().map(move |tier| (tier, self.get(tier)))
    }

    pub fn total_points(&self) -> usize {
        self.low.len() + self.medium.len() + self.high.len()
    }
}

/// The artifact handed to the rendering side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    pub records: Vec<PredictionRecord>,
    pub heat: HeatDataset,
}

impl PipelineResult {
    /// Record count per tier, every tier present
    pub fn tier_counts(&self) -> BTreeMap<RiskTier, usize> {
        let mut counts: BTreeMap<RiskTier, usize> =
            RiskTier::ALL.into_iter().map(|tier| (tier, 0)).collect();
        for record in &self.records {
            *counts.entry(record.tier).or_default() += 1;
        }
        counts
    }
}
