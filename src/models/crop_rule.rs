use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Normalize a crop name for rule lookup: trimmed and lowercased.
pub fn normalize_crop(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Threshold and recommendation set for one crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRule {
    #[serde(skip)]
    pub crop_name: String,
    pub ndvi_min: f64,
    #[serde(rename = "lluvia_min")]
    pub rain_min: f64,
    #[serde(rename = "temperatura_max")]
    pub temp_max: f64,
    #[serde(rename = "recomendacion_baja")]
    pub recommendation_low: String,
    #[serde(rename = "recomendacion_media")]
    pub recommendation_medium: String,
    #[serde(rename = "recomendacion_alta")]
    pub recommendation_high: String,
}

/// Crop rules keyed by normalized crop name. Loaded once per session.
#[derive(Debug, Clone, Default)]
pub struct CropRules {
    rules: BTreeMap<String, CropRule>,
}

impl CropRules {
    pub fn new(rules: impl IntoIterator<Item = CropRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|mut rule| {
                rule.crop_name = normalize_crop(&rule.crop_name);
                (rule.crop_name.clone(), rule)
            })
            .collect();
        Self { rules }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, CropRule> = serde_json::from_str(json)?;
        Ok(Self::new(raw.into_iter().map(|(name, mut rule)| {
            rule.crop_name = name;
            rule
        })))
    }

    /// Load the rule file. A missing or malformed file yields an empty rule
    /// set so the session keeps running with no evaluable crops.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Could not read crop rules at {:?}: {}", path, e);
                return Self::default();
            }
        };

        match Self::from_json_str(&content) {
            Ok(rules) => {
                info!("Loaded {} crop rules from {:?}", rules.len(), path);
                rules
            }
            Err(e) => {
                warn!("Could not parse crop rules at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn get(&self, crop: &str) -> Option<&CropRule> {
        self.rules.get(&normalize_crop(crop))
    }

    pub fn contains(&self, crop: &str) -> bool {
        self.get(crop).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn sample_rule(name: &str) -> CropRule {
    CropRule {
        crop_name: name.to_string(),
        ndvi_min: 0.5,
        rain_min: 20.0,
        temp_max: 32.0,
        recommendation_low: "Sin acciones".to_string(),
        recommendation_medium: "Monitorear".to_string(),
        recommendation_high: "Intervenir".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RULES_JSON: &str = r#"{
        "maíz": {
            "ndvi_min": 0.5, "lluvia_min": 20, "temperatura_max": 32,
            "recomendacion_baja": "Sin acciones",
            "recomendacion_media": "Revisar riego",
            "recomendacion_alta": "Riego urgente"
        },
        " Arroz ": {
            "ndvi_min": 0.6, "lluvia_min": 30, "temperatura_max": 35,
            "recomendacion_baja": "Ok", "recomendacion_media": "Atención",
            "recomendacion_alta": "Crítico"
        }
    }"#;

    #[test]
    fn parses_rule_fields() {
        let rules = CropRules::from_json_str(RULES_JSON).unwrap();
        assert_eq!(rules.len(), 2);

        let maiz = rules.get("maíz").unwrap();
        assert_eq!(maiz.crop_name, "maíz");
        assert!((maiz.ndvi_min - 0.5).abs() < 1e-9);
        assert!((maiz.rain_min - 20.0).abs() < 1e-9);
        assert!((maiz.temp_max - 32.0).abs() < 1e-9);
        assert_eq!(maiz.recommendation_high, "Riego urgente");
    }

    #[test]
    fn lookup_is_trimmed_and_case_insensitive() {
        let rules = CropRules::from_json_str(RULES_JSON).unwrap();
        assert!(rules.contains("  MAÍZ "));
        assert!(rules.contains("arroz"));
        assert!(!rules.contains("cacao"));
        assert_eq!(rules.names(), vec!["arroz", "maíz"]);
    }

    #[test]
    fn load_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(RULES_JSON.as_bytes()).unwrap();

        let rules = CropRules::load(file.path());
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn load_missing_file_degrades_to_empty() {
        let rules = CropRules::load(Path::new("/nonexistent/cultivos.json"));
        assert!(rules.is_empty());
    }

    #[test]
    fn load_malformed_file_degrades_to_empty() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let rules = CropRules::load(file.path());
        assert!(rules.is_empty());
    }
}
