//! Zone Risk Model
//!
//! The classification model behind the hotspot pipeline: a pre-trained
//! gradient-boosted tree ensemble that maps a feature vector
//! `[month, day, hour, zone]` to a raw class index.
//!
//! # Predictor contract
//!
//! ```text
//! predict([month, day, hour, zone]) -> class index
//! ```
//!
//! Predictors are loaded once per process and shared read-only across
//! requests, so every implementation must be `Send + Sync` and free of
//! interior mutation during inference. The class index is returned as-is:
//! range checking against the risk tiers belongs to the caller.

use std::sync::Arc;
use thiserror::Error;

pub mod ensemble;

pub use ensemble::{GradientBoostedModel, Node, Tree};

/// Number of features the pipeline supplies per query
pub const FEATURE_COUNT: usize = 4;

/// Feature vector in model order: month, day, hour, zone
pub type Features = [i64; FEATURE_COUNT];

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),
    #[error("Inference failed: {0}")]
    Inference(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// A pre-trained classifier queried once per zone
pub trait Predictor: Send + Sync {
    /// Predict the raw class index for one feature vector
    fn predict(&self, features: &Features) -> Result<i64>;
}

impl<P: Predictor + ?Sized> Predictor for &P {
    fn predict(&self, features: &Features) -> Result<i64> {
        (**self).predict(features)
    }
}

impl<P: Predictor + ?Sized> Predictor for Arc<P> {
    fn predict(&self, features: &Features) -> Result<i64> {
        (**self).predict(features)
    }
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, features: &Features) -> Result<i64> {
        (**self).predict(features)
    }
}
