use crate::config::Config;
use crate::error::{AgroRiskError, Result};
use crate::files;
use crate::logic::map::MapMarker;
use crate::logic::Session;
use crate::models::ZoneRecord;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Zones,
    Evaluation,
    Map,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Zones),
            '2' => Some(Screen::Evaluation),
            '3' => Some(Screen::Map),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneField {
    CropFilter,
    ImportPath,
    Name,
    Crop,
    Latitude,
    Longitude,
}

impl ZoneField {
    pub fn label(&self) -> &'static str {
        match self {
            ZoneField::CropFilter => "Crops to import",
            ZoneField::ImportPath => "CSV file (zona, lat, lon, cultivo)",
            ZoneField::Name => "Zone name",
            ZoneField::Crop => "Crop",
            ZoneField::Latitude => "Latitude",
            ZoneField::Longitude => "Longitude",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            ZoneField::ImportPath | ZoneField::Name | ZoneField::Latitude | ZoneField::Longitude
        )
    }

    pub fn next(&self) -> Self {
        match self {
            ZoneField::CropFilter => ZoneField::ImportPath,
            ZoneField::ImportPath => ZoneField::Name,
            ZoneField::Name => ZoneField::Crop,
            ZoneField::Crop => ZoneField::Latitude,
            ZoneField::Latitude => ZoneField::Longitude,
            ZoneField::Longitude => ZoneField::CropFilter,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ZoneField::CropFilter => ZoneField::Longitude,
            ZoneField::ImportPath => ZoneField::CropFilter,
            ZoneField::Name => ZoneField::ImportPath,
            ZoneField::Crop => ZoneField::Name,
            ZoneField::Latitude => ZoneField::Crop,
            ZoneField::Longitude => ZoneField::Latitude,
        }
    }
}

/// Import path, crop filter cursor and the manual entry form.
pub struct ZonesState {
    pub focused_field: ZoneField,
    pub editing: bool,
    pub edit_buffer: String,
    pub filter_cursor: usize,
    pub import_path: String,
    pub name: String,
    pub crop_index: usize,
    pub lat: String,
    pub lon: String,
}

impl ZonesState {
    pub fn new() -> Self {
        Self {
            focused_field: ZoneField::CropFilter,
            editing: false,
            edit_buffer: String::new(),
            filter_cursor: 0,
            import_path: String::new(),
            name: String::new(),
            crop_index: 0,
            lat: String::new(),
            lon: String::new(),
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn prev_field(&mut self) {
        self.focused_field = self.focused_field.prev();
    }

    pub fn field_value(&self, field: ZoneField) -> &str {
        match field {
            ZoneField::ImportPath => &self.import_path,
            ZoneField::Name => &self.name,
            ZoneField::Latitude => &self.lat,
            ZoneField::Longitude => &self.lon,
            ZoneField::CropFilter | ZoneField::Crop => "",
        }
    }

    pub fn start_editing(&mut self) {
        if !self.focused_field.is_text() {
            return;
        }
        self.editing = true;
        self.edit_buffer = self.field_value(self.focused_field).to_string();
    }

    pub fn cancel_editing(&mut self) {
        self.editing = false;
        self.edit_buffer.clear();
    }

    pub fn finish_editing(&mut self) {
        self.editing = false;
        let value = std::mem::take(&mut self.edit_buffer);
        match self.focused_field {
            ZoneField::ImportPath => self.import_path = value,
            ZoneField::Name => self.name = value,
            ZoneField::Latitude => self.lat = value,
            ZoneField::Longitude => self.lon = value,
            ZoneField::CropFilter | ZoneField::Crop => {}
        }
    }

    pub fn cycle_crop(&mut self, forward: bool, count: usize) {
        if count == 0 {
            return;
        }
        self.crop_index = if forward {
            (self.crop_index + 1) % count
        } else {
            (self.crop_index + count - 1) % count
        };
    }

    /// Build a zone from the form. Blank coordinates count as 0.
    pub fn to_zone(&self, crops: &[&str]) -> Result<ZoneRecord> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AgroRiskError::InvalidData("zone name is required".into()));
        }

        let crop = crops
            .get(self.crop_index)
            .ok_or_else(|| AgroRiskError::InvalidData("no crop selected".into()))?;

        let parse = |label: &str, value: &str| -> Result<f64> {
            let value = value.trim();
            if value.is_empty() {
                return Ok(0.0);
            }
            value
                .parse::<f64>()
                .map_err(|_| AgroRiskError::InvalidData(format!("{} '{}' is not a number", label, value)))
        };

        Ok(ZoneRecord::new(
            name,
            parse("latitude", &self.lat)?,
            parse("longitude", &self.lon)?,
            *crop,
        ))
    }

    pub fn clear_form(&mut self) {
        self.name.clear();
        self.lat.clear();
        self.lon.clear();
    }
}

/// Cursor over a table of rows.
pub struct ListState {
    pub selected_index: usize,
}

impl ListState {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn clamp(&mut self, max: usize) {
        if self.selected_index >= max {
            self.selected_index = max.saturating_sub(1);
        }
    }
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub config: Config,
    pub session: Session,
    pub markers: Vec<MapMarker>,

    // Screen states
    pub zones_state: ZonesState,
    pub evaluation_state: ListState,
    pub map_state: ListState,

    // UI state
    pub status_message: Option<StatusMessage>,
}

impl App {
    pub fn new(config: Config, session: Session) -> Self {
        Self {
            screen: Screen::Zones,
            should_quit: false,
            config,
            session,
            markers: Vec::new(),
            zones_state: ZonesState::new(),
            evaluation_state: ListState::new(),
            map_state: ListState::new(),
            status_message: None,
        }
    }

    /// Switching to the risk or map screen recomputes what it shows.
    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        match screen {
            Screen::Evaluation => self.run_evaluation(),
            Screen::Map => self.refresh_markers(),
            Screen::Zones => {}
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, level: StatusLevel, message: impl Into<String>) {
        self.status_message = Some(StatusMessage {
            text: message.into(),
            level,
        });
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    fn report(&mut self, err: AgroRiskError) {
        let level = if err.is_warning() {
            StatusLevel::Warning
        } else {
            StatusLevel::Error
        };
        tracing::debug!("{}", err);
        self.set_status(level, err.to_string());
    }

    /// Crop names in rule order, for the filter list and the crop selector.
    pub fn crop_options(&self) -> Vec<&str> {
        self.session.rules().names()
    }

    pub fn toggle_filter_crop(&mut self) {
        let Some(crop) = self
            .crop_options()
            .get(self.zones_state.filter_cursor)
            .map(|c| c.to_string())
        else {
            return;
        };

        match self.session.toggle_crop(&crop) {
            Ok(true) => self.set_status(StatusLevel::Info, format!("Importing {}", crop)),
            Ok(false) => self.set_status(StatusLevel::Info, format!("Skipping {}", crop)),
            Err(e) => self.report(e),
        }
    }

    pub fn import_file(&mut self) {
        let path = self.zones_state.import_path.trim().to_string();
        if path.is_empty() {
            self.set_status(StatusLevel::Warning, "Enter a CSV path first");
            return;
        }

        match self.session.import_zones_from_path(&PathBuf::from(&path)) {
            Ok(count) => {
                self.invalidate_views();
                self.set_status(StatusLevel::Success, format!("File loaded: {} zones", count));
            }
            Err(e) => self.report(e),
        }
    }

    pub fn add_manual_zone(&mut self) {
        let parsed = {
            let crops = self.crop_options();
            self.zones_state.to_zone(&crops)
        };
        let zone = match parsed {
            Ok(z) => z,
            Err(e) => return self.report(e),
        };
        let name = zone.zone_name.clone();

        match self.session.add_zone(zone) {
            Ok(()) => {
                self.zones_state.clear_form();
                self.invalidate_views();
                self.set_status(StatusLevel::Success, format!("Zone '{}' added", name));
            }
            Err(e) => self.report(e),
        }
    }

    pub fn export_zones(&mut self) {
        let path = self.config.output_dir.join(files::ZONES_FILE_NAME);
        match self.session.export_zones_to_path(&path) {
            Ok(()) => self.set_status(StatusLevel::Success, format!("Saved {}", path.display())),
            Err(e) => self.report(e),
        }
    }

    pub fn run_evaluation(&mut self) {
        match self.session.evaluate() {
            Ok(results) => {
                let count = results.len();
                self.evaluation_state.clamp(count);
                self.set_status(StatusLevel::Info, format!("{} zones evaluated", count));
            }
            Err(e) => {
                self.evaluation_state = ListState::new();
                self.report(e);
            }
        }
    }

    pub fn refresh_markers(&mut self) {
        match self.session.map_markers() {
            Ok(markers) => {
                self.markers = markers;
                self.map_state.clamp(self.markers.len());
            }
            Err(e) => {
                self.markers.clear();
                self.map_state = ListState::new();
                self.report(e);
            }
        }
    }

    pub fn export_workbook(&mut self) {
        let path = self.config.output_dir.join(files::WORKBOOK_FILE_NAME);
        match self.session.export_results_to_workbook(&path) {
            Ok(()) => self.set_status(StatusLevel::Success, format!("Saved {}", path.display())),
            Err(e) => self.report(e),
        }
    }

    pub fn export_geojson(&mut self) {
        let path = self.config.output_dir.join(files::GEOJSON_FILE_NAME);
        match self.session.export_results_to_geojson(&path) {
            Ok(()) => self.set_status(StatusLevel::Success, format!("Saved {}", path.display())),
            Err(e) => self.report(e),
        }
    }

    fn invalidate_views(&mut self) {
        self.markers.clear();
        self.evaluation_state = ListState::new();
        self.map_state = ListState::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_rule, CropRules};

    fn app() -> App {
        let rules = CropRules::new(vec![sample_rule("arroz"), sample_rule("maíz")]);
        let session = Session::new(rules, &[]);
        App::new(Config::default(), session)
    }

    #[test]
    fn screen_keys() {
        assert_eq!(Screen::from_key('1'), Some(Screen::Zones));
        assert_eq!(Screen::from_key('3'), Some(Screen::Map));
        assert_eq!(Screen::from_key('x'), None);
    }

    #[test]
    fn field_cycle_wraps() {
        let mut field = ZoneField::CropFilter;
        for _ in 0..6 {
            field = field.next();
        }
        assert_eq!(field, ZoneField::CropFilter);
        assert_eq!(ZoneField::CropFilter.prev(), ZoneField::Longitude);
    }

    #[test]
    fn editing_commits_to_focused_field() {
        let mut state = ZonesState::new();
        state.focused_field = ZoneField::Latitude;
        state.start_editing();
        state.edit_buffer.push_str("-1.75");
        state.finish_editing();
        assert_eq!(state.lat, "-1.75");
        assert!(!state.editing);

        // Selector fields are not text-editable
        state.focused_field = ZoneField::Crop;
        state.start_editing();
        assert!(!state.editing);
    }

    #[test]
    fn form_builds_zone() {
        let mut state = ZonesState::new();
        state.name = " Lote 9 ".into();
        state.crop_index = 1;
        state.lat = "-1.7".into();

        let zone = state.to_zone(&["arroz", "maíz"]).unwrap();
        assert_eq!(zone, ZoneRecord::new("Lote 9", -1.7, 0.0, "maíz"));
    }

    #[test]
    fn form_rejects_bad_input() {
        let mut state = ZonesState::new();
        assert!(state.to_zone(&["arroz"]).is_err());

        state.name = "A".into();
        state.lon = "west".into();
        assert!(state.to_zone(&["arroz"]).is_err());

        state.lon.clear();
        assert!(state.to_zone(&[]).is_err());
    }

    #[test]
    fn crop_cycle_wraps_both_ways() {
        let mut state = ZonesState::new();
        state.cycle_crop(false, 3);
        assert_eq!(state.crop_index, 2);
        state.cycle_crop(true, 3);
        assert_eq!(state.crop_index, 0);
        state.cycle_crop(true, 0);
        assert_eq!(state.crop_index, 0);
    }

    #[test]
    fn evaluation_without_zones_warns() {
        let mut app = app();
        app.switch_screen(Screen::Evaluation);
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.level, StatusLevel::Warning);
        assert!(app.session.results().is_empty());
    }

    #[test]
    fn map_without_zones_warns_with_no_markers() {
        let mut app = app();
        app.switch_screen(Screen::Map);
        assert!(app.markers.is_empty());
        assert_eq!(app.status_message.as_ref().unwrap().level, StatusLevel::Warning);
    }

    #[test]
    fn manual_zone_flows_to_map() {
        let mut app = app();
        app.zones_state.name = "Lote 1".into();
        app.zones_state.lat = "-1.8".into();
        app.zones_state.lon = "-79.0".into();
        app.add_manual_zone();
        assert_eq!(app.session.zones().len(), 1);
        assert!(app.zones_state.name.is_empty());

        app.switch_screen(Screen::Map);
        assert_eq!(app.markers.len(), 1);
        assert_eq!(app.markers[0].zone_name, "Lote 1");
    }

    #[test]
    fn import_failure_is_reported_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zonas.csv");
        std::fs::write(&path, "zona,lat,cultivo\nA,0,arroz\n").unwrap();

        let mut app = app();
        app.zones_state.import_path = path.display().to_string();
        app.import_file();

        assert_eq!(app.status_message.as_ref().unwrap().level, StatusLevel::Error);
        assert!(app.session.zones().is_empty());
    }

    #[test]
    fn toggling_filter_crop_updates_session() {
        let mut app = app();
        assert!(app.session.is_selected("arroz"));
        app.zones_state.filter_cursor = 0;
        app.toggle_filter_crop();
        assert!(!app.session.is_selected("arroz"));
    }

    #[test]
    fn list_state_bounds() {
        let mut state = ListState::new();
        state.prev();
        assert_eq!(state.selected_index, 0);
        state.next(2);
        state.next(2);
        assert_eq!(state.selected_index, 1);
        state.clamp(1);
        assert_eq!(state.selected_index, 0);
    }
}
