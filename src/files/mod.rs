pub mod geojson;
pub mod workbook;
pub mod zones;

pub use geojson::write_geojson;
pub use workbook::write_workbook;
pub use zones::{read_zones, write_zones};

pub const ZONES_FILE_NAME: &str = "zonas_actualizadas.csv";
pub const WORKBOOK_FILE_NAME: &str = "evaluacion_riesgo.xlsx";
pub const GEOJSON_FILE_NAME: &str = "zonas_riesgo.geojson";
