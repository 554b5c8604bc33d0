//! Time context normalization
//!
//! Maps the month and weekday labels a user picks to the numeric codes the
//! model was trained on. Weekdays are numbered from Sunday, as in the
//! training data.

use crate::{HotspotError, Result, ZoneId};
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use zone_model::Features;

pub const MONTH_CODES: [(&str, u8); 12] = [
    ("January", 1),
    ("February", 2),
    ("March", 3),
    ("April", 4),
    ("May", 5),
    ("June", 6),
    ("July", 7),
    ("August", 8),
    ("September", 9),
    ("October", 10),
    ("November", 11),
    ("December", 12),
];

pub const DAY_CODES: [(&str, u8); 7] = [
    ("Sunday", 1),
    ("Monday", 2),
    ("Tuesday", 3),
    ("Wednesday", 4),
    ("Thursday", 5),
    ("Friday", 6),
    ("Saturday", 7),
];

pub const HOUR_RANGE: RangeInclusive<i64> = 0..=23;

/// Month, weekday and hour a prediction is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeContext {
    month: u8,
    day: u8,
    hour: u8,
}

impl TimeContext {
    /// Build from numeric codes, applying the same range checks as `normalize`
    pub fn new(month: i64, day: i64, hour: i64) -> Result<Self> {
        let month = code_in(&MONTH_CODES, month).ok_or_else(|| invalid("month", month))?;
        let day = code_in(&DAY_CODES, day).ok_or_else(|| invalid("day", day))?;
        if !HOUR_RANGE.contains(&hour) {
            return Err(invalid("hour", hour));
        }

        Ok(Self {
            month,
            day,
            hour: hour as u8,
        })
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn month_label(&self) -> &'static str {
        label_of(&MONTH_CODES, self.month)
    }

    pub fn day_label(&self) -> &'static str {
        label_of(&DAY_CODES, self.day)
    }

    /// Model input for one district
    pub fn features(&self, zone: ZoneId) -> Features {
        [
            i64::from(self.month),
            i64::from(self.day),
            i64::from(self.hour),
            i64::from(zone.get()),
        ]
    }
}

impl fmt::Display for TimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:02}:00",
            self.day_label(),
            self.month_label(),
            self.hour
        )
    }
}

/// Build a `TimeContext` from month and weekday names plus an hour.
///
/// Names match case-insensitively after trimming.
pub fn normalize(month_label: &str, day_label: &str, hour: i64) -> Result<TimeContext> {
    let month = lookup(&MONTH_CODES, month_label).ok_or_else(|| invalid("month", month_label))?;
    let day = lookup(&DAY_CODES, day_label).ok_or_else(|| invalid("day", day_label))?;
    TimeContext::new(i64::from(month), i64::from(day), hour)
}

fn lookup(table: &[(&str, u8)], label: &str) -> Option<u8> {
    let label = label.trim();
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map(|(_, code)| *code)
}

fn code_in(table: &[(&str, u8)], code: i64) -> Option<u8> {
    table
        .iter()
        .map(|(_, c)| *c)
        .find(|c| i64::from(*c) == code)
}

fn label_of(table: &[(&'static str, u8)], code: u8) -> &'static str {
    table
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
        .unwrap_or("?")
}

fn invalid(field: &'static str, value: impl ToString) -> HotspotError {
    HotspotError::Validation {
        field,
        value: value.to_string(),
    }
}
