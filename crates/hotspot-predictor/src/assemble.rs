//! Result assembly and the pipeline entry point

use crate::{
    aggregate::aggregate, predict_all, ExecutionMode, HeatDataset, PipelineResult,
    PredictionRecord, Result, TimeContext, ZoneDirectory,
};
use tracing::info;
use zone_model::Predictor;

/// Package records and heat buckets into the rendering handoff
pub fn assemble(records: Vec<PredictionRecord>, heat: HeatDataset) -> PipelineResult {
    PipelineResult { records, heat }
}

/// Run one full request: predict every district, classify, aggregate, assemble.
///
/// Any stage error is returned as-is and no partial result escapes.
pub fn run<P: Predictor + ?Sized>(
    ctx: &TimeContext,
    predictor: &P,
    locations: &ZoneDirectory,
    mode: ExecutionMode,
) -> Result<PipelineResult> {
    let predictions = predict_all(ctx, predictor, mode)?;
    let (records, heat) = aggregate(&predictions, locations)?;
    let result = assemble(records, heat);

    let counts = result.tier_counts();
    info!(
        "Classified {} districts for {}: {}",
        result.records.len(),
        ctx,
        counts
            .iter()
            .map(|(tier, n)| format!("{}={}", tier, n))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(result)
}


// ============================================================================
// Property-based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::zones::{valid_zones, EXCLUDED_ZONES, VALID_ZONE_COUNT};
    use crate::{RiskTier, TimeContext, ZoneId, ZoneLocation};
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use zone_model::Features;

    /// Class per zone taken from a generated table
    struct Table(Vec<i64>);

    impl Predictor for Table {
        fn predict(&self, features: &Features) -> zone_model::Result<i64> {
            Ok(self.0[features[3] as usize])
        }
    }

    fn directory() -> ZoneDirectory {
        valid_zones()
            .into_iter()
            .map(|zone| {
                (
                    zone,
                    ZoneLocation {
                        name: format!("District {}", zone),
                        latitude: 41.0 + f64::from(zone.get()) * 0.02,
                        longitude: -87.9 + f64::from(zone.get()) * 0.01,
                    },
                )
            })
            .collect()
    }

    fn ctx_strategy() -> impl Strategy<Value = TimeContext> {
        (1i64..=12, 1i64..=7, 0i64..=23)
            .prop_map(|(m, d, h)| TimeContext::new(m, d, h).unwrap())
    }

    // Index 0 unused; zones 1..=25
    fn table_strategy() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::vec(0i64..3, 26)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        // Every valid zone appears exactly once, never an excluded one
        #[test]
        fn prop_exclusion_invariant(ctx in ctx_strategy(), table in table_strategy()) {
            let result = run(&ctx, &Table(table), &directory(), ExecutionMode::Sequential).unwrap();

            prop_assert_eq!(result.records.len(), VALID_ZONE_COUNT);
            for record in &result.records {
                prop_assert!(!EXCLUDED_ZONES.contains(&record.zone.get()));
            }
            let zones: Vec<ZoneId> = result.records.iter().map(|r| r.zone).collect();
            prop_assert_eq!(zones, valid_zones());
        }

        // Buckets are disjoint and cover exactly the records
        #[test]
        fn prop_partition_invariant(ctx in ctx_strategy(), table in table_strategy()) {
            let result = run(&ctx, &Table(table.clone()), &directory(), ExecutionMode::Sequential).unwrap();

            let mut seen = BTreeSet::new();
            for (tier, points) in result.heat.iter() {
                for point in points {
                    prop_assert!(seen.insert(point.zone), "zone {} in two buckets", point.zone);
                    prop_assert_eq!(RiskTier::from_index(table[point.zone.get() as usize]), Some(tier));
                }
            }
            prop_assert_eq!(result.heat.total_points(), result.records.len());

            let record_zones: BTreeSet<ZoneId> = result.records.iter().map(|r| r.zone).collect();
            prop_assert_eq!(seen, record_zones);
        }

        // Same input, same bytes
        #[test]
        fn prop_deterministic(ctx in ctx_strategy(), table in table_strategy()) {
            let directory = directory();
            let a = run(&ctx, &Table(table.clone()), &directory, ExecutionMode::Sequential).unwrap();
            let b = run(&ctx, &Table(table), &directory, ExecutionMode::Parallel).unwrap();
            prop_assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        }
    }
}
