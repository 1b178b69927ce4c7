use serde::{Deserialize, Serialize};

/// A named point of farmland growing one crop. Column names match the
/// import/export CSV layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    #[serde(rename = "zona")]
    pub zone_name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "cultivo")]
    pub crop_name: String,
}

impl ZoneRecord {
    pub const COLUMNS: [&'static str; 4] = ["zona", "lat", "lon", "cultivo"];

    pub fn new(zone_name: impl Into<String>, lat: f64, lon: f64, crop: impl Into<String>) -> Self {
        Self {
            zone_name: zone_name.into(),
            lat,
            lon,
            crop_name: crop.into(),
        }
    }

    pub fn has_valid_coordinates(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}
