//! Risk tier classification and deployment mapping

use crate::{HotspotError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal risk class emitted by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// All tiers in ordinal order
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    /// Model class index for this tier
    pub fn index(self) -> i64 {
        match self {
            RiskTier::Low => 0,
            RiskTier::Medium => 1,
            RiskTier::High => 2,
        }
    }

    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(RiskTier::Low),
            1 => Some(RiskTier::Medium),
            2 => Some(RiskTier::High),
            _ => None,
        }
    }

    /// Recommended patrol deployment for this tier
    pub fn action(self) -> &'static str {
        match self {
            RiskTier::Low => "Low crime rate - No special deployment needed.",
            RiskTier::Medium => "Medium crime rate - Increased patrolling recommended.",
            RiskTier::High => "High crime rate - Deploy maximum force.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i64> for RiskTier {
    type Error = HotspotError;

    fn try_from(index: i64) -> Result<Self> {
        RiskTier::from_index(index).ok_or(HotspotError::InvalidPrediction { zone: None, index })
    }
}

/// Map a raw class index to its tier and deployment action.
///
/// The model output is never trusted: anything outside `{0, 1, 2}` is an
/// `InvalidPrediction`, not a clamp or a default.
pub fn classify(raw_index: i64) -> Result<(RiskTier, &'static str)> {
    let tier = RiskTier::try_from(raw_index)?;
    Ok((tier, tier.action()))
}
