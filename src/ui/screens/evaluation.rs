use crate::app::{StatusLevel, StatusMessage};
use crate::models::{EvaluationResult, RiskTier};
use crate::ui::components::{NavBar, StatusLine};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget, Wrap},
};

pub struct EvaluationScreen<'a> {
    results: &'a [EvaluationResult],
    selected_index: usize,
    status: Option<&'a StatusMessage>,
}

impl<'a> EvaluationScreen<'a> {
    pub fn new(results: &'a [EvaluationResult]) -> Self {
        Self {
            results,
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

    fn count(&self, tier: RiskTier) -> usize {
        self.results.iter().filter(|r| r.tier == tier).count()
    }
}

impl Widget for EvaluationScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(10),   // Table
                Constraint::Length(7), // Details
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let mut title = vec![Span::styled("Risk Evaluation", Theme::title())];
        for tier in [RiskTier::High, RiskTier::Medium, RiskTier::Low] {
            title.push(Span::styled("  ", Theme::dim()));
            title.push(Span::styled(
                format!("{}: {}", tier, self.count(tier)),
                Theme::tier(tier),
            ));
        }
        Paragraph::new(Line::from(title)).render(chunks[0], buf);

        self.render_table(chunks[1], buf);
        self.render_details(chunks[2], buf);

        StatusLine::new(self.status).render(chunks[3], buf);
        NavBar::new(&[
            ("[↑↓]", "Select "),
            ("[r]", "Re-evaluate "),
            ("[x]", "Export XLSX "),
        ])
        .render(chunks[4], buf);
    }
}

impl EvaluationScreen<'_> {
    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());

        if self.results.is_empty() {
            Paragraph::new(Span::styled("No zones evaluated", Theme::dim()))
                .block(block)
                .render(area, buf);
            return;
        }

        let header = Row::new(
            ["Zone", "Crop", "NDVI", "Rain (mm)", "Temp (°C)", "Risk"]
                .iter()
                .map(|h| Cell::from(*h).style(Theme::header())),
        );

        let rows: Vec<Row> = self
            .results
            .iter()
            .map(|r| {
                Row::new(vec![
                    Cell::from(r.zone_name.as_str()),
                    Cell::from(r.crop_name.as_str()),
                    Cell::from(format!("{:.2}", r.readings.ndvi)),
                    Cell::from(format!("{:.1}", r.readings.rainfall_mm)),
                    Cell::from(format!("{:.1}", r.readings.temperature_c)),
                    Cell::from(r.tier.as_str()).style(Theme::tier(r.tier)),
                ])
                .style(Theme::normal())
            })
            .collect();

        let widths = [
            Constraint::Min(16),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(6),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Theme::selected());

        let mut state = TableState::default();
        state.select(Some(self.selected_index));
        StatefulWidget::render(table, area, buf, &mut state);
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let Some(result) = self.results.get(self.selected_index) else {
            block.render(area, buf);
            return;
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(result.zone_name.as_str(), Theme::header()),
                Span::styled(format!(" ({})", result.crop_name), Theme::dim()),
                Span::raw(" "),
                Span::styled(result.tier.as_str(), Theme::tier(result.tier)),
            ]),
            Line::from(vec![
                Span::styled("Recomendación: ", Theme::dim()),
                Span::styled(result.recommendation.as_str(), Theme::normal()),
            ]),
            Line::from(vec![
                Span::styled("Motivo: ", Theme::dim()),
                Span::styled(
                    result.reasons_text(),
                    if result.within_range() {
                        Theme::status(StatusLevel::Success)
                    } else {
                        Theme::status(StatusLevel::Warning)
                    },
                ),
            ]),
        ];

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
