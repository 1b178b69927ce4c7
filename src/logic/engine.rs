use super::classifier::classify_with;
use super::readings::{ReadingSource, SyntheticReadings};
use crate::models::{CropRules, EvaluationResult, ZoneRecord};

/// Runs the classifier over a zone collection.
pub struct RiskEngine {
    source: Box<dyn ReadingSource>,
}

impl RiskEngine {
    pub fn new() -> Self {
        Self::with_source(Box::new(SyntheticReadings))
    }

    pub fn with_source(source: Box<dyn ReadingSource>) -> Self {
        Self { source }
    }

    /// Classify every zone whose crop has a rule, in input order. Zones with
    /// an unknown crop are skipped.
    pub fn evaluate(&self, zones: &[ZoneRecord], rules: &CropRules) -> Vec<EvaluationResult> {
        zones
            .iter()
            .filter_map(|zone| self.evaluate_zone(zone, rules))
            .collect()
    }

    pub fn evaluate_zone(&self, zone: &ZoneRecord, rules: &CropRules) -> Option<EvaluationResult> {
        match rules.get(&zone.crop_name) {
            Some(rule) => Some(classify_with(self.source.as_ref(), zone, rule)),
            None => {
                tracing::debug!(
                    "Skipping zone '{}': no rule for crop '{}'",
                    zone.zone_name,
                    zone.crop_name
                );
                None
            }
        }
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_rule;

    fn rules() -> CropRules {
        CropRules::new(vec![sample_rule("maíz"), sample_rule("arroz")])
    }

    #[test]
    fn unknown_crops_are_excluded() {
        let zones = vec![
            ZoneRecord::new("A", 0.0, 0.0, "maíz"),
            ZoneRecord::new("B", 0.0, 0.0, "cacao"),
            ZoneRecord::new("C", 0.0, 0.0, "arroz"),
        ];

        let results = RiskEngine::new().evaluate(&zones, &rules());
        let names: Vec<_> = results.iter().map(|r| r.zone_name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert!(results.iter().all(|r| r.crop_name != "cacao"));
    }

    #[test]
    fn crop_match_is_trimmed_and_case_insensitive() {
        let zones = vec![ZoneRecord::new("A", 0.0, 0.0, "  MAÍZ ")];
        let results = RiskEngine::new().evaluate(&zones, &rules());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].crop_name, "maíz");

        // Same readings as the already-normalized spelling
        let plain = RiskEngine::new()
            .evaluate_zone(&ZoneRecord::new("A", 0.0, 0.0, "maíz"), &rules())
            .unwrap();
        assert_eq!(results[0].readings, plain.readings);
    }

    #[test]
    fn empty_rule_set_evaluates_nothing() {
        let zones = vec![ZoneRecord::new("A", 0.0, 0.0, "maíz")];
        let results = RiskEngine::new().evaluate(&zones, &CropRules::default());
        assert!(results.is_empty());
    }

    #[test]
    fn duplicate_zone_names_are_kept() {
        let zones = vec![
            ZoneRecord::new("A", 0.0, 0.0, "maíz"),
            ZoneRecord::new("A", 1.0, 1.0, "maíz"),
        ];
        assert_eq!(RiskEngine::new().evaluate(&zones, &rules()).len(), 2);
    }
}
