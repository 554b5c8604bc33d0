//! Render handoff export
//!
//! Converts a `PipelineResult` into the documents a map front end consumes:
//! a GeoJSON FeatureCollection of tier-colored district markers with one
//! weighted heat layer per non-empty tier, and a plain-text district report.
//! Nothing here draws; styling is data.

use crate::{PipelineResult, RiskTier};
use serde::{Deserialize, Serialize};

/// Marker and heat layer styling for one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStyle {
    pub marker_color: String,
    pub layer_name: String,
    /// `(stop, color)` pairs, stops ascending in `(0, 1]`
    pub gradient: Vec<(f64, String)>,
}

impl TierStyle {
    fn new(marker_color: &str, layer_name: &str, gradient: [(f64, &str); 3]) -> Self {
        Self {
            marker_color: marker_color.to_string(),
            layer_name: layer_name.to_string(),
            gradient: gradient
                .iter()
                .map(|(stop, color)| (*stop, color.to_string()))
                .collect(),
        }
    }
}

/// Map view and per-tier styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// `[lat, lon]` of the initial view
    pub center: [f64; 2],
    pub zoom: u8,
    pub low: TierStyle,
    pub medium: TierStyle,
    pub high: TierStyle,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            // Chicago
            center: [41.8781, -87.6298],
            zoom: 11,
            low: TierStyle::new("green", "Low Risk", [(0.4, "green"), (0.65, "lime"), (1.0, "yellow")]),
            medium: TierStyle::new(
                "orange",
                "Medium Risk",
                [(0.4, "orange"), (0.65, "yellow"), (1.0, "red")],
            ),
            high: TierStyle::new("red", "High Risk", [(0.4, "red"), (0.65, "darkred"), (1.0, "maroon")]),
        }
    }
}

impl RenderStyle {
    pub fn tier(&self, tier: RiskTier) -> &TierStyle {
        match tier {
            RiskTier::Low => &self.low,
            RiskTier::Medium => &self.medium,
            RiskTier::High => &self.high,
        }
    }
}

/// Export result to GeoJSON with heat layers
pub fn to_geojson(result: &PipelineResult, style: &RenderStyle) -> serde_json::Value {
    let features: Vec<serde_json::Value> = result
        .records
        .iter()
        .map(|r| {
            serde_json::json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [r.location.longitude, r.location.latitude]
                },
                "properties": {
                    "district": r.zone,
                    "tier": r.tier,
                    "deployment_method": r.action,
                    "location": r.location.name,
                    "marker_color": style.tier(r.tier).marker_color,
                    "popup": format!("District {}: {}\n\n {}", r.zone, r.tier, r.location.name)
                }
            })
        })
        .collect();

    // Empty tiers get no layer
    let heat_layers: Vec<serde_json::Value> = result
        .heat
        .iter()
        .filter(|(_, points)| !points.is_empty())
        .map(|(tier, points)| {
            let tier_style = style.tier(tier);
            let gradient: serde_json::Map<String, serde_json::Value> = tier_style
                .gradient
                .iter()
                .map(|(stop, color)| (stop.to_string(), serde_json::Value::from(color.as_str())))
                .collect();
            let data: Vec<[f64; 3]> = points.iter().map(|p| p.as_triple()).collect();

            serde_json::json!({
                "name": tier_style.layer_name,
                "tier": tier,
                "gradient": gradient,
                "data": data
            })
        })
        .collect();

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
        "heat_layers": heat_layers,
        "view": {
            "center": style.center,
            "zoom": style.zoom
        }
    })
}

/// Per-district report, one block per record
pub fn text_report(result: &PipelineResult) -> String {
    result
        .records
        .iter()
        .map(|r| {
            format!(
                "District {}: {}\nDeployment Method: {}\n\n",
                r.zone, r.tier, r.action
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assemble, HeatDataset, HeatPoint, PredictionRecord, ZoneId, ZoneLocation, HEAT_WEIGHT};

    fn sample() -> PipelineResult {
        let mut heat = HeatDataset::new();
        let mut records = Vec::new();
        for (zone, tier) in [(1u8, RiskTier::High), (5, RiskTier::Low), (6, RiskTier::High)] {
            let location = ZoneLocation {
                name: format!("Station {}", zone),
                latitude: 41.8 + f64::from(zone) / 100.0,
                longitude: -87.6,
            };
            heat.push(
                tier,
                HeatPoint {
                    zone: ZoneId(zone),
                    latitude: location.latitude,
                    longitude: location.longitude,
                    weight: HEAT_WEIGHT,
                },
            );
            records.push(PredictionRecord {
                zone: ZoneId(zone),
                tier,
                action: tier.action(),
                location,
            });
        }
        assemble(records, heat)
    }

    #[test]
    fn test_geojson_markers() {
        let geojson = to_geojson(&sample(), &RenderStyle::default());

        assert_eq!(geojson["type"], "FeatureCollection");
        let features = geojson["features"].as_array().unwrap();
        assert_eq!(features.len(), 3);

        let first = &features[0];
        assert_eq!(first["geometry"]["coordinates"][0], -87.6);
        assert_eq!(first["properties"]["district"], 1);
        assert_eq!(first["properties"]["tier"], "High");
        assert_eq!(first["properties"]["marker_color"], "red");
        assert_eq!(features[1]["properties"]["marker_color"], "green");
        assert_eq!(first["properties"]["popup"], "District 1: High\n\n Station 1");
    }

    #[test]
    fn test_geojson_heat_layers_skip_empty_tiers() {
        let geojson = to_geojson(&sample(), &RenderStyle::default());
        let layers = geojson["heat_layers"].as_array().unwrap();

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0]["name"], "Low Risk");
        assert_eq!(layers[0]["data"].as_array().unwrap().len(), 1);
        assert_eq!(layers[0]["gradient"]["0.65"], "lime");
        assert_eq!(layers[1]["name"], "High Risk");
        assert_eq!(layers[1]["data"][0][2], 1.0);
        assert_eq!(layers[1]["gradient"]["1"], "maroon");
    }

    #[test]
    fn test_geojson_view() {
        let geojson = to_geojson(&sample(), &RenderStyle::default());
        assert_eq!(geojson["view"]["zoom"], 11);
        assert_eq!(geojson["view"]["center"][0], 41.8781);
    }

    #[test]
    fn test_text_report() {
        let report = text_report(&sample());
        assert!(report.starts_with("District 1: High\nDeployment Method: High crime rate - Deploy maximum force.\n"));
        assert!(report.contains("District 5: Low\n"));
    }

    #[test]
    fn test_text_report_blocks() {
        let result = sample();
        let report = text_report(&result);
        let blocks: Vec<&str> = report.split_terminator("\n\n").collect();
        assert_eq!(blocks.len(), result.records.len());
        assert!(report.ends_with(".\n\n"));
        assert!(blocks.iter().all(|b| b.lines().count() == 2));
    }
}
