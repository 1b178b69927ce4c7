//! Single-sheet spreadsheet export of evaluation results.

use crate::error::Result;
use crate::models::EvaluationResult;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

pub const SHEET_NAME: &str = "Riesgo";

pub const HEADERS: [&str; 10] = [
    "zona",
    "cultivo",
    "lat",
    "lon",
    "NDVI",
    "lluvia (mm)",
    "temperatura (°C)",
    "riesgo",
    "recomendación",
    "motivo_riesgo",
];

fn build_workbook(results: &[EvaluationResult]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, result) in results.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, result.zone_name.as_str())?;
        sheet.write_string(row, 1, result.crop_name.as_str())?;
        sheet.write_number(row, 2, result.lat)?;
        sheet.write_number(row, 3, result.lon)?;
        sheet.write_number(row, 4, result.readings.ndvi)?;
        sheet.write_number(row, 5, result.readings.rainfall_mm)?;
        sheet.write_number(row, 6, result.readings.temperature_c)?;
        sheet.write_string(row, 7, result.tier.as_str())?;
        sheet.write_string(row, 8, result.recommendation.as_str())?;
        sheet.write_string(row, 9, result.reasons_text())?;
    }

    Ok(workbook)
}

pub fn workbook_bytes(results: &[EvaluationResult]) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(results)?;
    Ok(workbook.save_to_buffer()?)
}

pub fn write_workbook(path: &Path, results: &[EvaluationResult]) -> Result<()> {
    std::fs::write(path, workbook_bytes(results)?)?;
    tracing::info!("Wrote {} results to {:?}", results.len(), path);
    Ok(())
}
