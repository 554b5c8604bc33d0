//! Batch prediction over every valid district

use crate::zones::valid_zones;
use crate::{HotspotError, Result, TimeContext, ZoneId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zone_model::Predictor;

/// How the district sweep is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// Parallel map across districts (needs the `threading` feature)
    Parallel,
}

/// Raw model output for one district
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZonePrediction {
    pub zone: ZoneId,
    pub class_index: i64,
}

/// Query the model once per valid district.
///
/// Output is always in district order, whatever the execution mode. The
/// first model failure aborts the sweep and names its district; in parallel
/// mode that is still the lowest failing district.
pub fn predict_all<P: Predictor + ?Sized>(
    ctx: &TimeContext,
    model: &P,
    mode: ExecutionMode,
) -> Result<Vec<ZonePrediction>> {
    let zones = valid_zones();
    info!("Predicting {} districts for {} ({:?})", zones.len(), ctx, mode);

    match mode {
        ExecutionMode::Sequential => zones
            .iter()
            .map(|zone| predict_zone(ctx, model, *zone))
            .collect(),
        ExecutionMode::Parallel => predict_parallel(ctx, model, &zones),
    }
}

#[cfg(feature = "threading")]
fn predict_parallel<P: Predictor + ?Sized>(
    ctx: &TimeContext,
    model: &P,
    zones: &[ZoneId],
) -> Result<Vec<ZonePrediction>> {
    use rayon::prelude::*;

    // Gather every outcome first so the reported failure is the lowest
    // district, same as a sequential sweep
    let outcomes: Vec<Result<ZonePrediction>> = zones
        .par_iter()
        .map(|zone| predict_zone(ctx, model, *zone))
        .collect();
    outcomes.into_iter().collect()
}

#[cfg(not(feature = "threading"))]
fn predict_parallel<P: Predictor + ?Sized>(
    ctx: &TimeContext,
    model: &P,
    zones: &[ZoneId],
) -> Result<Vec<ZonePrediction>> {
    tracing::warn!("Built without the `threading` feature, predicting sequentially");
    zones
        .iter()
        .map(|zone| predict_zone(ctx, model, *zone))
        .collect()
}

fn predict_zone<P: Predictor + ?Sized>(
    ctx: &TimeContext,
    model: &P,
    zone: ZoneId,
) -> Result<ZonePrediction> {
    let features = ctx.features(zone);
    let class_index = model
        .predict(&features)
        .map_err(|source| HotspotError::Inference { zone, source })?;

    debug!("Zone {}: features {:?} -> class {}", zone, features, class_index);

    Ok(ZonePrediction { zone, class_index })
}
