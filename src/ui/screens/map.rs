use crate::app::StatusMessage;
use crate::config::MapConfig;
use crate::logic::map::MapMarker;
use crate::models::RiskTier;
use crate::ui::components::{NavBar, StatusLine};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders, Paragraph, Widget, Wrap,
    },
};

/// Smallest longitude span shown when zooming to markers.
const MIN_SPAN_DEG: f64 = 0.2;
/// Padding around the marker extent, as a fraction of it.
const PADDING: f64 = 0.2;

/// Longitude and latitude bounds for the canvas.
///
/// Fits all markers with some padding. Without markers the configured
/// center and span are used. Latitude span is half the longitude span
/// because terminal cells are about twice as tall as they are wide.
pub fn view_bounds(markers: &[MapMarker], map: &MapConfig) -> ([f64; 2], [f64; 2]) {
    let (center_lon, center_lat, half_lon) = if markers.is_empty() {
        (map.center_lon, map.center_lat, map.span_deg / 2.0)
    } else {
        let (mut west, mut east) = (f64::MAX, f64::MIN);
        let (mut south, mut north) = (f64::MAX, f64::MIN);
        for m in markers {
            west = west.min(m.lon);
            east = east.max(m.lon);
            south = south.min(m.lat);
            north = north.max(m.lat);
        }

        let lon_extent = east - west;
        let lat_extent = (north - south) * 2.0;
        let half = (lon_extent.max(lat_extent) * (1.0 + PADDING) / 2.0).max(MIN_SPAN_DEG / 2.0);
        ((west + east) / 2.0, (south + north) / 2.0, half)
    };

    let half_lat = half_lon / 2.0;
    (
        [
            (center_lon - half_lon).max(-180.0),
            (center_lon + half_lon).min(180.0),
        ],
        [
            (center_lat - half_lat).max(-90.0),
            (center_lat + half_lat).min(90.0),
        ],
    )
}

pub struct MapScreen<'a> {
    markers: &'a [MapMarker],
    map: &'a MapConfig,
    selected_index: usize,
    status: Option<&'a StatusMessage>,
}

impl<'a> MapScreen<'a> {
    pub fn new(markers: &'a [MapMarker], map: &'a MapConfig) -> Self {
        Self {
            markers,
            map,
            selected_index: 0,
            status: None,
        }
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn with_status(mut self, status: Option<&'a StatusMessage>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for MapScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(10),   // Map + popup
                Constraint::Length(1), // Legend
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Risk Map", Theme::title()),
            Span::styled(format!(" ({} zones)", self.markers.len()), Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(36)])
            .split(chunks[1]);

        self.render_canvas(content[0], buf);
        self.render_popup(content[1], buf);
        self.render_legend(chunks[2], buf);

        StatusLine::new(self.status).render(chunks[3], buf);
        NavBar::new(&[("[↑↓]", "Zone "), ("[g]", "Export GeoJSON ")]).render(chunks[4], buf);
    }
}

impl MapScreen<'_> {
    fn render_canvas(&self, area: Rect, buf: &mut Buffer) {
        let (x_bounds, y_bounds) = view_bounds(self.markers, self.map);
        let selected = self.markers.get(self.selected_index);

        Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            )
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                ctx.draw(&Map {
                    color: Theme::COASTLINE,
                    resolution: MapResolution::High,
                });
                ctx.layer();

                for tier in [RiskTier::Low, RiskTier::Medium, RiskTier::High] {
                    let coords: Vec<(f64, f64)> = self
                        .markers
                        .iter()
                        .filter(|m| m.tier == tier)
                        .map(|m| (m.lon, m.lat))
                        .collect();
                    ctx.draw(&Points {
                        coords: &coords,
                        color: tier.color(),
                    });
                }

                if let Some(m) = selected {
                    ctx.print(
                        m.lon,
                        m.lat,
                        Line::from(Span::styled(format!("● {}", m.zone_name), Theme::tier(m.tier))),
                    );
                }
            })
            .render(area, buf);
    }

    fn render_popup(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Zone")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let Some(marker) = self.markers.get(self.selected_index) else {
            Paragraph::new(Span::styled("No zones evaluated", Theme::dim()))
                .block(block)
                .render(area, buf);
            return;
        };

        let mut lines: Vec<Line> = marker
            .popup_lines()
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let style = if i == 0 {
                    Theme::tier(marker.tier)
                } else {
                    Theme::normal()
                };
                Line::from(Span::styled(text, style))
            })
            .collect();

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{:.4}, {:.4}  {}", marker.lat, marker.lon, marker.color.as_str()),
            Theme::dim(),
        )));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn render_legend(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled("Legend: ", Theme::dim())];
        for tier in [RiskTier::High, RiskTier::Medium, RiskTier::Low] {
            spans.push(Span::styled("● ", Style::default().fg(tier.color())));
            spans.push(Span::styled(format!("{}  ", tier), Theme::normal()));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::map::MarkerColor;

    fn marker(lat: f64, lon: f64) -> MapMarker {
        MapMarker {
            zone_name: "A".into(),
            lat,
            lon,
            tier: RiskTier::Low,
            color: MarkerColor::Green,
            popup: String::new(),
        }
    }

    #[test]
    fn empty_map_uses_configured_center() {
        let config = MapConfig::default();
        let (x, y) = view_bounds(&[], &config);
        assert!((x[0] - (config.center_lon - 3.0)).abs() < 1e-9);
        assert!((x[1] - (config.center_lon + 3.0)).abs() < 1e-9);
        assert!((y[0] - (config.center_lat - 1.5)).abs() < 1e-9);
    }

    #[test]
    fn bounds_contain_all_markers() {
        let markers = [marker(-1.75, -80.8), marker(-2.2, -79.9), marker(-0.5, -78.5)];
        let (x, y) = view_bounds(&markers, &MapConfig::default());
        for m in &markers {
            assert!(x[0] < m.lon && m.lon < x[1]);
            assert!(y[0] < m.lat && m.lat < y[1]);
        }
    }

    #[test]
    fn single_marker_gets_minimum_span() {
        let (x, y) = view_bounds(&[marker(10.0, 20.0)], &MapConfig::default());
        assert!((x[1] - x[0] - MIN_SPAN_DEG).abs() < 1e-9);
        assert!(y[0] < 10.0 && 10.0 < y[1]);
    }

    #[test]
    fn bounds_clamp_to_world() {
        let (x, y) = view_bounds(&[marker(89.9, 179.9), marker(-89.9, -179.9)], &MapConfig::default());
        assert_eq!(x, [-180.0, 180.0]);
        assert_eq!(y, [-90.0, 90.0]);
    }
}
