//! Join predictions with district locations and bucket them by tier

use crate::{
    classify, HeatDataset, HeatPoint, HotspotError, PredictionRecord, Result, ZoneDirectory,
    ZonePrediction, HEAT_WEIGHT,
};
use tracing::{debug, warn};

/// Classify each prediction, attach its location, and partition heat points.
///
/// Single pass in prediction order: one record and one heat point per
/// district. A district without coordinates is a reference-data fault and
/// fails the whole aggregation.
pub fn aggregate(
    predictions: &[ZonePrediction],
    locations: &ZoneDirectory,
) -> Result<(Vec<PredictionRecord>, HeatDataset)> {
    let mut records = Vec::with_capacity(predictions.len());
    let mut heat = HeatDataset::new();

    for prediction in predictions {
        let zone = prediction.zone;

        let (tier, action) = classify(prediction.class_index).map_err(|err| {
            let err = match err {
                HotspotError::InvalidPrediction { index, .. } => HotspotError::InvalidPrediction {
                    zone: Some(zone),
                    index,
                },
                other => other,
            };
            warn!("{}", err);
            err
        })?;

        let location = locations
            .get(zone)
            .ok_or(HotspotError::LocationNotFound(zone))?;

        heat.push(
            tier,
            HeatPoint {
                zone,
                latitude: location.latitude,
                longitude: location.longitude,
                weight: HEAT_WEIGHT,
            },
        );
        records.push(PredictionRecord {
            zone,
            tier,
            action,
            location: location.clone(),
        });

        debug!("Zone {} ({}): {}", zone, location.name, tier);
    }

    Ok((records, heat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RiskTier, ZoneId, ZoneLocation};

    fn directory(zones: &[u8]) -> ZoneDirectory {
        zones
            .iter()
            .map(|z| {
                (
                    ZoneId(*z),
                    ZoneLocation {
                        name: format!("District {}", z),
                        latitude: 41.0 + f64::from(*z) / 100.0,
                        longitude: -87.0 - f64::from(*z) / 100.0,
                    },
                )
            })
            .collect()
    }

    fn prediction(zone: u8, class_index: i64) -> ZonePrediction {
        ZonePrediction {
            zone: ZoneId(zone),
            class_index,
        }
    }

    #[test]
    fn test_partitions_by_tier() {
        let predictions = vec![prediction(1, 2), prediction(2, 0), prediction(3, 1), prediction(4, 2)];
        let (records, heat) = aggregate(&predictions, &directory(&[1, 2, 3, 4])).unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(heat.total_points(), 4);

        let high: Vec<ZoneId> = heat.get(RiskTier::High).iter().map(|p| p.zone).collect();
        assert_eq!(high, vec![ZoneId(1), ZoneId(4)]);
        assert_eq!(heat.get(RiskTier::Low)[0].zone, ZoneId(2));
        assert_eq!(heat.get(RiskTier::Medium)[0].zone, ZoneId(3));
    }

    #[test]
    fn test_records_keep_prediction_order_and_location() {
        let predictions = vec![prediction(3, 0), prediction(1, 1)];
        let (records, heat) = aggregate(&predictions, &directory(&[1, 3])).unwrap();

        assert_eq!(records[0].zone, ZoneId(3));
        assert_eq!(records[1].zone, ZoneId(1));
        assert_eq!(records[0].location.name, "District 3");
        assert_eq!(records[1].action, RiskTier::Medium.action());

        let point = heat.get(RiskTier::Low)[0];
        assert_eq!(point.latitude, records[0].location.latitude);
        assert_eq!(point.longitude, records[0].location.longitude);
        assert_eq!(point.weight, 1.0);
    }

    #[test]
    fn test_missing_location_fails() {
        let predictions = vec![prediction(1, 0), prediction(5, 0)];
        match aggregate(&predictions, &directory(&[1])) {
            Err(HotspotError::LocationNotFound(zone)) => assert_eq!(zone, ZoneId(5)),
            other => panic!("expected LocationNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_class_fails() {
        let predictions = vec![prediction(1, 0), prediction(2, 3)];
        let err = aggregate(&predictions, &directory(&[1, 2])).unwrap_err();
        assert!(matches!(
            err,
            HotspotError::InvalidPrediction {
                zone: Some(ZoneId(2)),
                index: 3
            }
        ));
        assert_eq!(
            err.to_string(),
            "Invalid prediction for zone 2: class index 3 is not a known risk tier"
        );
    }

    #[test]
    fn test_empty_predictions() {
        let (records, heat) = aggregate(&[], &directory(&[1])).unwrap();
        assert!(records.is_empty());
        assert_eq!(heat.total_points(), 0);
    }
}
