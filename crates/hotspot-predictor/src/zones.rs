//! The fixed set of police districts the model was trained on

use crate::ZoneId;
use std::ops::RangeInclusive;

/// Full district numbering
pub const ZONE_RANGE: RangeInclusive<u8> = 1..=25;

/// Districts that no longer exist (merged into neighbours) and are never predicted
pub const EXCLUDED_ZONES: [u8; 3] = [13, 21, 23];

/// Number of districts in every sweep
pub const VALID_ZONE_COUNT: usize = 22;

pub fn is_valid_zone(zone: ZoneId) -> bool {
    ZONE_RANGE.contains(&zone.get()) && !EXCLUDED_ZONES.contains(&zone.get())
}

/// Valid districts in ascending order
pub fn valid_zones() -> Vec<ZoneId> {
    ZONE_RANGE
        .filter(|z| !EXCLUDED_ZONES.contains(z))
        .map(ZoneId)
        .collect()
}
