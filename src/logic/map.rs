use crate::models::{EvaluationResult, RiskTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Red,
    Orange,
    Green,
}

impl MarkerColor {
    pub fn for_tier(tier: RiskTier) -> Self {
        match tier {
            RiskTier::High => MarkerColor::Red,
            RiskTier::Medium => MarkerColor::Orange,
            RiskTier::Low => MarkerColor::Green,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerColor::Red => "red",
            MarkerColor::Orange => "orange",
            MarkerColor::Green => "green",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub zone_name: String,
    pub lat: f64,
    pub lon: f64,
    pub tier: RiskTier,
    pub color: MarkerColor,
    pub popup: String,
}

impl MapMarker {
    pub fn from_result(result: &EvaluationResult) -> Self {
        let popup = format!(
            "{} ({})<br><b>Recomendación:</b> {}<br><b>Motivo:</b> {}",
            result.zone_name,
            result.tier,
            result.recommendation,
            result.reasons_text()
        );

        Self {
            zone_name: result.zone_name.clone(),
            lat: result.lat,
            lon: result.lon,
            tier: result.tier,
            color: MarkerColor::for_tier(result.tier),
            popup,
        }
    }

    /// Popup split into plain-text lines for terminal display.
    pub fn popup_lines(&self) -> Vec<String> {
        self.popup
            .split("<br>")
            .map(|line| line.replace("<b>", "").replace("</b>", ""))
            .collect()
    }
}

pub fn markers(results: &[EvaluationResult]) -> Vec<MapMarker> {
    results.iter().map(MapMarker::from_result).collect()
}
