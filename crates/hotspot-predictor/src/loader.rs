//! District coordinate loading from JSON files

use crate::zones::is_valid_zone;
use crate::{Result, ZoneId, ZoneLocation};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// Validate latitude is in valid range
fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

/// Validate longitude is in valid range
fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && lon.is_finite()
}

/// Trim and length-limit a station name
fn sanitize_name(name: String) -> String {
    let trimmed: String = name.trim().chars().take(128).collect();
    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed
    }
}

/// Raw district entry from JSON
#[derive(Debug, Deserialize)]
struct RawZoneLocation {
    #[serde(rename = "Name", alias = "name")]
    name: Option<String>,
    #[serde(rename = "Latitude", alias = "latitude")]
    latitude: Option<f64>,
    #[serde(rename = "Longitude", alias = "longitude")]
    longitude: Option<f64>,
}

/// Read-only district → location lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneDirectory {
    entries: BTreeMap<ZoneId, ZoneLocation>,
}

impl ZoneDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, zone: ZoneId, location: ZoneLocation) -> Option<ZoneLocation> {
        self.entries.insert(zone, location)
    }

    pub fn remove(&mut self, zone: ZoneId) -> Option<ZoneLocation> {
        self.entries.remove(&zone)
    }

    pub fn get(&self, zone: ZoneId) -> Option<&ZoneLocation> {
        self.entries.get(&zone)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from a JSON file keyed by district number
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading district coordinates from {:?}", path);

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse `{"<id>": {"Name", "Latitude", "Longitude"}}`.
    ///
    /// Entries with a non-numeric key or unusable coordinates are skipped.
    /// Keys are visited in sorted order; when two keys name the same
    /// district ("5" and "05") the first one wins and the other is skipped.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let raw: BTreeMap<String, RawZoneLocation> = serde_json::from_reader(reader)?;

        let mut directory = Self::new();
        let mut skipped = 0;

        for (key, entry) in raw {
            let zone = match key.trim().parse::<u8>() {
                Ok(id) => ZoneId(id),
                Err(_) => {
                    warn!("Skipping district with non-numeric key {:?}", key);
                    skipped += 1;
                    continue;
                }
            };

            let (latitude, longitude) = match (entry.latitude, entry.longitude) {
                (Some(lat), Some(lon)) if is_valid_latitude(lat) && is_valid_longitude(lon) => {
                    (lat, lon)
                }
                _ => {
                    warn!("Skipping district {}: missing or invalid coordinates", zone);
                    skipped += 1;
                    continue;
                }
            };

            if directory.get(zone).is_some() {
                warn!("Skipping duplicate key {:?} for district {}", key, zone);
                skipped += 1;
                continue;
            }

            if !is_valid_zone(zone) {
                debug!("District {} is outside the prediction domain", zone);
            }

            let name = sanitize_name(entry.name.unwrap_or_default());
            directory.insert(
                zone,
                ZoneLocation {
                    name,
                    latitude,
                    longitude,
                },
            );
        }

        info!(
            "Loaded {} districts ({} skipped for bad or duplicate keys or coords)",
            directory.len(),
            skipped
        );

        Ok(directory)
    }
}

impl FromIterator<(ZoneId, ZoneLocation)> for ZoneDirectory {
    fn from_iter<I: IntoIterator<Item = (ZoneId, ZoneLocation)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
