use serde::{Deserialize, Serialize};

/// Environmental readings for one zone. Currently synthetic, see
/// `logic::readings`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    pub ndvi: f64,
    pub rainfall_mm: f64,
    pub temperature_c: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Bajo",
            RiskTier::Medium => "Medio",
            RiskTier::High => "Alto",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            RiskTier::Low => Color::Green,
            RiskTier::Medium => Color::Rgb(255, 165, 0),
            RiskTier::High => Color::Red,
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskReason {
    LowNdvi,
    InsufficientRainfall,
    ExcessiveTemperature,
    /// Sentinel used alone when no threshold was crossed.
    WithinRange,
}

impl RiskReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskReason::LowNdvi => "NDVI bajo",
            RiskReason::InsufficientRainfall => "lluvia insuficiente",
            RiskReason::ExcessiveTemperature => "temperatura excesiva",
            RiskReason::WithinRange => "Todos los parámetros dentro de rango",
        }
    }
}

impl std::fmt::Display for RiskReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of one zone. Rebuilt on every evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub zone_name: String,
    pub crop_name: String,
    pub lat: f64,
    pub lon: f64,
    pub readings: Readings,
    pub tier: RiskTier,
    pub recommendation: String,
    pub reasons: Vec<RiskReason>,
}

impl EvaluationResult {
    pub fn reasons_text(&self) -> String {
        self.reasons
            .iter()
            .map(RiskReason::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn within_range(&self) -> bool {
        self.reasons == [RiskReason::WithinRange]
    }
}
