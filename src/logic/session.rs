//! Session-scoped state: the crop rules, the crops selected for import, the
//! active zone collection and the last evaluation.
//!
//! Created at session start, zones replaced wholesale on import, cleared at
//! session end. Results are regenerated from zones and rules, never edited.

use super::engine::RiskEngine;
use super::map::{self, MapMarker};
use crate::error::{AgroRiskError, Result};
use crate::files;
use crate::models::{normalize_crop, CropRules, EvaluationResult, ZoneRecord};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{info, warn};

pub struct Session {
    rules: CropRules,
    selected_crops: BTreeSet<String>,
    zones: Vec<ZoneRecord>,
    results: Vec<EvaluationResult>,
    engine: RiskEngine,
}

impl Session {
    /// Start a session. Configured default crops not present in the rules are
    /// ignored; if none remain, every crop with a rule is selected.
    pub fn new(rules: CropRules, default_crops: &[String]) -> Self {
        Self::with_engine(rules, default_crops, RiskEngine::new())
    }

    pub fn with_engine(rules: CropRules, default_crops: &[String], engine: RiskEngine) -> Self {
        let mut selected_crops: BTreeSet<String> = default_crops
            .iter()
            .map(|c| normalize_crop(c))
            .filter(|c| {
                let known = rules.contains(c);
                if !known {
                    warn!("Default crop '{}' has no rule - ignoring", c);
                }
                known
            })
            .collect();

        if selected_crops.is_empty() {
            selected_crops = rules.names().into_iter().map(String::from).collect();
        }

        Self {
            rules,
            selected_crops,
            zones: Vec::new(),
            results: Vec::new(),
            engine,
        }
    }

    pub fn rules(&self) -> &CropRules {
        &self.rules
    }

    pub fn zones(&self) -> &[ZoneRecord] {
        &self.zones
    }

    pub fn results(&self) -> &[EvaluationResult] {
        &self.results
    }

    pub fn selected_crops(&self) -> &BTreeSet<String> {
        &self.selected_crops
    }

    pub fn is_selected(&self, crop: &str) -> bool {
        self.selected_crops.contains(&normalize_crop(crop))
    }

    /// Flip a crop in or out of the import filter. Returns whether the crop
    /// is selected afterwards. Crops without a rule cannot be selected.
    pub fn toggle_crop(&mut self, crop: &str) -> Result<bool> {
        let crop = normalize_crop(crop);
        if !self.rules.contains(&crop) {
            return Err(AgroRiskError::UnknownCrop(crop));
        }

        if self.selected_crops.remove(&crop) {
            Ok(false)
        } else {
            self.selected_crops.insert(crop);
            Ok(true)
        }
    }

    /// Replace the zone collection with the rows of a zone file whose crop is
    /// selected. On error the current zones are left as they were.
    pub fn import_zones<R: Read>(&mut self, reader: R) -> Result<usize> {
        let parsed = files::read_zones(reader)?;
        let total = parsed.len();

        let kept: Vec<ZoneRecord> = parsed
            .into_iter()
            .filter(|z| self.is_selected(&z.crop_name))
            .collect();

        info!(
            "Imported {} zones ({} filtered out by crop selection)",
            kept.len(),
            total - kept.len()
        );

        self.zones = kept;
        self.results.clear();
        Ok(self.zones.len())
    }

    pub fn import_zones_from_path(&mut self, path: &Path) -> Result<usize> {
        let file = File::open(path)?;
        self.import_zones(BufReader::new(file))
    }

    /// Append a manually entered zone. The crop must have a rule.
    pub fn add_zone(&mut self, zone: ZoneRecord) -> Result<()> {
        if !self.rules.contains(&zone.crop_name) {
            return Err(AgroRiskError::UnknownCrop(zone.crop_name));
        }
        if !zone.has_valid_coordinates() {
            return Err(AgroRiskError::InvalidData(format!(
                "coordinates out of range: {}, {}",
                zone.lat, zone.lon
            )));
        }

        self.zones.push(zone);
        self.results.clear();
        Ok(())
    }

    pub fn export_zones<W: Write>(&self, writer: W) -> Result<()> {
        files::write_zones(writer, &self.zones)
    }

    pub fn export_zones_to_path(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.export_zones(BufWriter::new(file))?;
        info!("Exported {} zones to {:?}", self.zones.len(), path);
        Ok(())
    }

    /// Regenerate results for the whole zone collection.
    pub fn evaluate(&mut self) -> Result<&[EvaluationResult]> {
        if self.zones.is_empty() {
            return Err(AgroRiskError::NoZones);
        }

        self.results = self.engine.evaluate(&self.zones, &self.rules);
        Ok(&self.results)
    }

    /// Evaluate only if nothing has been evaluated since the zones changed.
    pub fn ensure_results(&mut self) -> Result<&[EvaluationResult]> {
        if self.results.is_empty() {
            return self.evaluate();
        }
        Ok(&self.results)
    }

    pub fn map_markers(&mut self) -> Result<Vec<MapMarker>> {
        let results = self.ensure_results()?;
        if results.is_empty() {
            return Err(AgroRiskError::NoEvaluatedZones);
        }
        Ok(map::markers(results))
    }

    pub fn export_results_to_workbook(&mut self, path: &Path) -> Result<()> {
        let results = self.ensure_results()?;
        files::write_workbook(path, results)
    }

    pub fn export_results_to_geojson(&mut self, path: &Path) -> Result<()> {
        let results = self.ensure_results()?;
        files::write_geojson(path, results)
    }

    pub fn clear(&mut self) {
        self.zones.clear();
        self.results.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_rule;

    fn session() -> Session {
        let rules = CropRules::new(vec![
            sample_rule("maíz"),
            sample_rule("arroz"),
            sample_rule("cacao"),
        ]);
        Session::new(rules, &["maíz".to_string(), "arroz".to_string()])
    }

    const ZONES_CSV: &str = "zona,lat,lon,cultivo\n\
        Lote 1,-1.7,-80.8,maíz\n\
        Lote 2,-1.6,-80.7,cacao\n\
        Lote 3,-1.5,-80.6,Arroz\n";

    #[test]
    fn default_crops_selected() {
        let s = session();
        assert!(s.is_selected("maíz"));
        assert!(s.is_selected(" ARROZ"));
        assert!(!s.is_selected("cacao"));
    }

    #[test]
    fn unknown_defaults_fall_back_to_all_crops() {
        let rules = CropRules::new(vec![sample_rule("maíz"), sample_rule("arroz")]);
        let s = Session::new(rules, &["trigo".to_string()]);
        assert_eq!(s.selected_crops().len(), 2);
    }

    #[test]
    fn import_filters_by_selected_crops() {
        let mut s = session();
        let kept = s.import_zones(ZONES_CSV.as_bytes()).unwrap();
        assert_eq!(kept, 2);
        let names: Vec<_> = s.zones().iter().map(|z| z.zone_name.as_str()).collect();
        assert_eq!(names, vec!["Lote 1", "Lote 3"]);
    }

    #[test]
    fn import_replaces_existing_zones() {
        let mut s = session();
        s.add_zone(ZoneRecord::new("Manual", 0.0, 0.0, "maíz")).unwrap();
        s.import_zones(ZONES_CSV.as_bytes()).unwrap();
        assert!(s.zones().iter().all(|z| z.zone_name != "Manual"));
    }

    #[test]
    fn rejected_import_keeps_previous_zones() {
        let mut s = session();
        s.import_zones(ZONES_CSV.as_bytes()).unwrap();
        s.evaluate().unwrap();

        let err = s
            .import_zones("zona,lat,cultivo\nX,0,maíz\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, AgroRiskError::MissingColumns(_)));
        assert_eq!(s.zones().len(), 2);
        assert_eq!(s.results().len(), 2);
    }

    #[test]
    fn import_checks_coordinates_like_manual_entry() {
        let mut s = session();
        s.import_zones(ZONES_CSV.as_bytes()).unwrap();

        let err = s
            .import_zones("zona,lat,lon,cultivo\nA,999,NaN,maíz\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, AgroRiskError::InvalidData(_)));
        assert_eq!(s.zones().len(), 2);
        assert!(s.add_zone(ZoneRecord::new("B", 999.0, 0.0, "maíz")).is_err());
    }

    #[test]
    fn toggling_a_crop_changes_the_filter() {
        let mut s = session();
        assert!(s.toggle_crop("cacao").unwrap());
        assert!(!s.toggle_crop("maíz").unwrap());
        s.import_zones(ZONES_CSV.as_bytes()).unwrap();

        let names: Vec<_> = s.zones().iter().map(|z| z.zone_name.as_str()).collect();
        assert_eq!(names, vec!["Lote 2", "Lote 3"]);

        assert!(matches!(
            s.toggle_crop("trigo"),
            Err(AgroRiskError::UnknownCrop(_))
        ));
    }

    #[test]
    fn add_zone_validates_crop_and_coordinates() {
        let mut s = session();
        assert!(matches!(
            s.add_zone(ZoneRecord::new("X", 0.0, 0.0, "trigo")),
            Err(AgroRiskError::UnknownCrop(_))
        ));
        assert!(matches!(
            s.add_zone(ZoneRecord::new("X", 95.0, 0.0, "maíz")),
            Err(AgroRiskError::InvalidData(_))
        ));
        assert!(s.zones().is_empty());

        // Manual entry is not limited to the import filter
        s.add_zone(ZoneRecord::new("X", 0.0, 0.0, "cacao")).unwrap();
        assert_eq!(s.zones().len(), 1);
    }

    #[test]
    fn evaluate_with_no_zones_warns() {
        let mut s = session();
        let err = s.evaluate().unwrap_err();
        assert!(matches!(err, AgroRiskError::NoZones));
        assert!(err.is_warning());
        assert!(s.results().is_empty());
    }

    #[test]
    fn map_with_no_zones_has_no_markers() {
        let mut s = session();
        assert!(matches!(s.map_markers(), Err(AgroRiskError::NoZones)));
        assert!(s.results().is_empty());
    }

    #[test]
    fn map_computes_results_when_missing() {
        let mut s = session();
        s.import_zones(ZONES_CSV.as_bytes()).unwrap();
        assert!(s.results().is_empty());

        let markers = s.map_markers().unwrap();
        assert_eq!(markers.len(), 2);
        assert_eq!(s.results().len(), 2);
    }

    #[test]
    fn map_with_only_unknown_crops_warns() {
        let rules = CropRules::new(vec![sample_rule("maíz")]);
        let mut s = Session::new(rules, &[]);
        s.add_zone(ZoneRecord::new("A", 0.0, 0.0, "maíz")).unwrap();
        // A zone whose crop has no rule
        s.zones[0].crop_name = "trigo".into();

        assert!(matches!(s.map_markers(), Err(AgroRiskError::NoEvaluatedZones)));
    }

    #[test]
    fn evaluation_is_regenerated_not_accumulated() {
        let mut s = session();
        s.import_zones(ZONES_CSV.as_bytes()).unwrap();
        let first = s.evaluate().unwrap().to_vec();
        let second = s.evaluate().unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn adding_a_zone_invalidates_results() {
        let mut s = session();
        s.import_zones(ZONES_CSV.as_bytes()).unwrap();
        s.evaluate().unwrap();
        s.add_zone(ZoneRecord::new("Nuevo", 1.0, 1.0, "maíz")).unwrap();
        assert!(s.results().is_empty());
        assert_eq!(s.ensure_results().unwrap().len(), 3);
    }

    #[test]
    fn export_writes_current_zones() {
        let mut s = session();
        s.import_zones(ZONES_CSV.as_bytes()).unwrap();

        let mut out = Vec::new();
        s.export_zones(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("Lote 3,-1.5,-80.6,Arroz"));
    }

    #[test]
    fn file_round_trip_through_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zonas.csv");
        std::fs::write(&path, ZONES_CSV).unwrap();

        let mut s = session();
        assert_eq!(s.import_zones_from_path(&path).unwrap(), 2);

        let out = dir.path().join(files::ZONES_FILE_NAME);
        s.export_zones_to_path(&out).unwrap();
        let mut again = session();
        assert_eq!(again.import_zones_from_path(&out).unwrap(), 2);

        let xlsx = dir.path().join(files::WORKBOOK_FILE_NAME);
        s.export_results_to_workbook(&xlsx).unwrap();
        assert!(xlsx.exists());
    }

    #[test]
    fn clear_resets_zones_and_results() {
        let mut s = session();
        s.import_zones(ZONES_CSV.as_bytes()).unwrap();
        s.evaluate().unwrap();
        s.clear();
        assert!(s.zones().is_empty());
        assert!(s.results().is_empty());
        assert!(!s.rules().is_empty());
    }
}
