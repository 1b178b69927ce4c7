//! Zone CSV import and export (`zona,lat,lon,cultivo`).

use crate::error::{AgroRiskError, Result};
use crate::models::ZoneRecord;
use std::io::{Read, Write};

/// Parse a zone file. Extra columns are ignored; a missing required column
/// or an unparsable row rejects the whole file.
pub fn read_zones<R: Read>(reader: R) -> Result<Vec<ZoneRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let missing: Vec<String> = ZoneRecord::COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(AgroRiskError::MissingColumns(missing));
    }

    let mut zones = Vec::new();
    for (i, record) in csv_reader.deserialize::<ZoneRecord>().enumerate() {
        // Header is line 1
        let zone = record
            .map_err(|e| AgroRiskError::InvalidData(format!("row {}: {}", i + 2, e)))?;
        if !zone.has_valid_coordinates() {
            return Err(AgroRiskError::InvalidData(format!(
                "row {}: coordinates out of range: {}, {}",
                i + 2,
                zone.lat,
                zone.lon
            )));
        }
        zones.push(zone);
    }

    Ok(zones)
}

pub fn write_zones<W: Write>(writer: W, zones: &[ZoneRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    // Write the header explicitly so an empty collection still has columns
    csv_writer.write_record(ZoneRecord::COLUMNS)?;
    for zone in zones {
        csv_writer.write_record([
            zone.zone_name.clone(),
            zone.lat.to_string(),
            zone.lon.to_string(),
            zone.crop_name.clone(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
