//! Synthetic reading generator.
//!
//! Placeholder for real sensor or satellite data: readings are drawn from a
//! pseudo-random generator seeded by the zone's identity, so the same zone,
//! crop and coordinates always produce the same values. A real data source
//! plugs in by implementing [`ReadingSource`].

use crate::models::{Readings, ZoneRecord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const NDVI_RANGE: (f64, f64) = (0.2, 0.8);
pub const RAINFALL_RANGE_MM: (f64, f64) = (0.0, 50.0);
pub const TEMPERATURE_RANGE_C: (f64, f64) = (20.0, 40.0);

/// Produces the environmental readings a zone is classified against.
pub trait ReadingSource {
    /// `crop` is the normalized crop name the rule was found under.
    fn readings(&self, zone: &ZoneRecord, crop: &str) -> Readings;
}

/// Deterministic mock readings, seeded by zone name, crop and coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticReadings;

impl SyntheticReadings {
    /// Seed input: `zone + crop + lat + lon`, floats in shortest round-trip form.
    pub fn seed_input(zone: &ZoneRecord, crop: &str) -> String {
        format!("{}{}{:?}{:?}", zone.zone_name, crop, zone.lat, zone.lon)
    }
}

impl ReadingSource for SyntheticReadings {
    fn readings(&self, zone: &ZoneRecord, crop: &str) -> Readings {
        let seed = fnv1a_64(Self::seed_input(zone, crop).as_bytes());
        let mut rng = StdRng::seed_from_u64(seed);

        // Draw order is fixed: ndvi, rainfall, temperature
        let ndvi = round_to(rng.gen_range(NDVI_RANGE.0..=NDVI_RANGE.1), 2);
        let rainfall_mm = round_to(rng.gen_range(RAINFALL_RANGE_MM.0..=RAINFALL_RANGE_MM.1), 1);
        let temperature_c =
            round_to(rng.gen_range(TEMPERATURE_RANGE_C.0..=TEMPERATURE_RANGE_C.1), 1);

        Readings {
            ndvi,
            rainfall_mm,
            temperature_c,
        }
    }
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(PRIME)
    })
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_precision(value: f64, decimals: i32) -> bool {
        let scaled = value * 10f64.powi(decimals);
        (scaled - scaled.round()).abs() < 1e-6
    }

    #[test]
    fn seed_input_concatenates_identity() {
        let zone = ZoneRecord::new("A", 0.0, 0.0, "Maíz");
        assert_eq!(SyntheticReadings::seed_input(&zone, "maíz"), "Amaíz0.00.0");

        let zone = ZoneRecord::new("Lote 3", -1.75, -80.8, "arroz");
        assert_eq!(SyntheticReadings::seed_input(&zone, "arroz"), "Lote 3arroz-1.75-80.8");
    }

    #[test]
    fn same_zone_same_readings() {
        let zone = ZoneRecord::new("A", 0.0, 0.0, "maíz");
        let first = SyntheticReadings.readings(&zone, "maíz");
        for _ in 0..10 {
            assert_eq!(SyntheticReadings.readings(&zone, "maíz"), first);
        }
    }

    #[test]
    fn readings_are_pinned_across_runs() {
        let zone = ZoneRecord::new("A", 0.0, 0.0, "maíz");
        let r = SyntheticReadings.readings(&zone, "maíz");
        assert_eq!(r.ndvi, 0.33);
        assert_eq!(r.rainfall_mm, 9.4);
        assert_eq!(r.temperature_c, 29.4);
    }

    #[test]
    fn readings_stay_in_range_with_rounding() {
        for i in 0..500 {
            let zone = ZoneRecord::new(format!("Zona {}", i), -1.0 - i as f64 * 0.01, -80.0, "cacao");
            let r = SyntheticReadings.readings(&zone, "cacao");

            assert!((0.2..=0.8).contains(&r.ndvi), "ndvi {}", r.ndvi);
            assert!((0.0..=50.0).contains(&r.rainfall_mm), "rain {}", r.rainfall_mm);
            assert!((20.0..=40.0).contains(&r.temperature_c), "temp {}", r.temperature_c);

            assert!(has_precision(r.ndvi, 2));
            assert!(has_precision(r.rainfall_mm, 1));
            assert!(has_precision(r.temperature_c, 1));
        }
    }

    #[test]
    fn identity_changes_readings() {
        let a = SyntheticReadings.readings(&ZoneRecord::new("A", 0.0, 0.0, "maíz"), "maíz");
        let b = SyntheticReadings.readings(&ZoneRecord::new("B", 0.0, 0.0, "maíz"), "maíz");
        let c = SyntheticReadings.readings(&ZoneRecord::new("A", 0.0, 0.0, "arroz"), "arroz");
        assert!(a != b || a != c);
    }

    #[test]
    fn fnv1a_known_vectors() {
        assert_eq!(fnv1a_64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a_64(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn round_to_precision() {
        assert!((round_to(0.456, 2) - 0.46).abs() < 1e-12);
        assert!((round_to(27.349, 1) - 27.3).abs() < 1e-12);
    }
}
