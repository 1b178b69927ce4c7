use super::readings::ReadingSource;
use crate::models::{CropRule, EvaluationResult, Readings, RiskReason, RiskTier, ZoneRecord};

/// Fraction of `ndvi_min` below which a zone is high risk.
pub const HIGH_NDVI_FACTOR: f64 = 0.8;
/// Fraction of `rain_min` below which a zone is high risk.
pub const HIGH_RAIN_FACTOR: f64 = 0.5;
/// Degrees above `temp_max` at which a zone is high risk.
pub const HIGH_TEMP_MARGIN_C: f64 = 2.0;

/// Tier, recommendation and reasons for one set of readings.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub tier: RiskTier,
    pub recommendation: String,
    pub reasons: Vec<RiskReason>,
}

pub fn classify_with<S: ReadingSource + ?Sized>(
    source: &S,
    zone: &ZoneRecord,
    rule: &CropRule,
) -> EvaluationResult {
    let readings = source.readings(zone, &rule.crop_name);
    let assessment = assess(&readings, rule);

    EvaluationResult {
        zone_name: zone.zone_name.clone(),
        crop_name: rule.crop_name.clone(),
        lat: zone.lat,
        lon: zone.lon,
        readings,
        tier: assessment.tier,
        recommendation: assessment.recommendation,
        reasons: assessment.reasons,
    }
}

/// Compare readings against a crop rule.
///
/// Tiers are checked in order Low, Medium, High against the same readings.
/// The High check runs whether or not Medium matched, so a rule configured
/// with non-monotonic thresholds still promotes on its own condition.
pub fn assess(readings: &Readings, rule: &CropRule) -> Assessment {
    let Readings {
        ndvi,
        rainfall_mm,
        temperature_c,
    } = *readings;

    let mut tier = RiskTier::Low;
    let mut recommendation = &rule.recommendation_low;

    if ndvi < rule.ndvi_min || rainfall_mm < rule.rain_min || temperature_c > rule.temp_max {
        tier = RiskTier::Medium;
        recommendation = &rule.recommendation_medium;
    }

    if ndvi < rule.ndvi_min * HIGH_NDVI_FACTOR
        || rainfall_mm < rule.rain_min * HIGH_RAIN_FACTOR
        || temperature_c > rule.temp_max + HIGH_TEMP_MARGIN_C
    {
        tier = RiskTier::High;
        recommendation = &rule.recommendation_high;
    }

    let mut reasons = Vec::new();
    if ndvi < rule.ndvi_min {
        reasons.push(RiskReason::LowNdvi);
    }
    if rainfall_mm < rule.rain_min {
        reasons.push(RiskReason::InsufficientRainfall);
    }
    if temperature_c > rule.temp_max {
        reasons.push(RiskReason::ExcessiveTemperature);
    }
    if reasons.is_empty() {
        reasons.push(RiskReason::WithinRange);
    }

    Assessment {
        tier,
        recommendation: recommendation.clone(),
        reasons,
    }
}
