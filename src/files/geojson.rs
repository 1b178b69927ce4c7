//! GeoJSON export of map markers.

use crate::error::Result;
use crate::logic::map::MapMarker;
use crate::models::EvaluationResult;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub fn to_geojson(results: &[EvaluationResult]) -> serde_json::Value {
    let features: Vec<serde_json::Value> = results
        .iter()
        .map(|r| {
            let marker = MapMarker::from_result(r);
            serde_json::json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [r.lon, r.lat]
                },
                "properties": {
                    "zona": r.zone_name,
                    "cultivo": r.crop_name,
                    "riesgo": r.tier.as_str(),
                    "recomendacion": r.recommendation,
                    "motivo_riesgo": r.reasons_text(),
                    "marker-color": marker.color.as_str(),
                    "popup": marker.popup
                }
            })
        })
        .collect();

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features
    })
}

pub fn write_geojson(path: &Path, results: &[EvaluationResult]) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &to_geojson(results))?;
    tracing::info!("Wrote {} map features to {:?}", results.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Readings, RiskReason, RiskTier};

    fn sample(tier: RiskTier) -> EvaluationResult {
        EvaluationResult {
            zone_name: "Lote 1".into(),
            crop_name: "maíz".into(),
            lat: -1.7,
            lon: -80.8,
            readings: Readings {
                ndvi: 0.3,
                rainfall_mm: 5.0,
                temperature_c: 30.0,
            },
            tier,
            recommendation: "Intervenir".into(),
            reasons: vec![RiskReason::LowNdvi],
        }
    }

    #[test]
    fn features_use_lon_lat_order() {
        let json = to_geojson(&[sample(RiskTier::High)]);
        assert_eq!(json["type"], "FeatureCollection");

        let feature = &json["features"][0];
        assert_eq!(feature["geometry"]["coordinates"][0], -80.8);
        assert_eq!(feature["geometry"]["coordinates"][1], -1.7);
        assert_eq!(feature["properties"]["marker-color"], "red");
        assert_eq!(feature["properties"]["riesgo"], "Alto");
    }

    #[test]
    fn empty_collection() {
        let json = to_geojson(&[]);
        assert_eq!(json["features"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zonas_riesgo.geojson");
        write_geojson(&path, &[sample(RiskTier::Low)]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["features"][0]["properties"]["marker-color"], "green");
    }
}
