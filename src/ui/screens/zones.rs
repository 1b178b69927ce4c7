use crate::app::{StatusMessage, ZoneField, ZonesState};
use crate::logic::Session;
use crate::ui::components::{CheckListWidget, InputWidget, NavBar, SelectWidget, StatusLine};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

pub struct ZonesScreen<'a> {
    session: &'a Session,
    state: &'a ZonesState,
    status: Option<&'a StatusMessage>,
}

impl<'a> ZonesScreen<'a> {
    pub fn new(session: &'a Session, state: &'a ZonesState) -> Self {
        Self {
            session,
            state,
            status: None,
        }
    }

    pub fn with_status(mut self, status: Option<&'a StatusMessage>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for ZonesScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Zones", Theme::title()),
            Span::styled(
                format!(
                    " ({} loaded, importing {} of {} crops)",
                    self.session.zones().len(),
                    self.session.selected_crops().len(),
                    self.session.rules().len()
                ),
                Theme::dim(),
            ),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(30)])
            .split(chunks[1]);

        self.render_form(content[0], buf);
        self.render_table(content[1], buf);

        StatusLine::new(self.status).render(chunks[2], buf);

        let keys: &[(&str, &str)] = if self.state.editing {
            &[("[Enter]", "Done "), ("[Esc]", "Cancel ")]
        } else {
            &[
                ("[↑↓]", "Field "),
                ("[Enter]", "Edit "),
                ("[Space]", "Toggle "),
                ("[i]", "Import "),
                ("[a]", "Add "),
                ("[s]", "Save CSV "),
            ]
        };
        NavBar::new(keys).render(chunks[3], buf);
    }
}

impl ZonesScreen<'_> {
    fn render_form(&self, area: Rect, buf: &mut Buffer) {
        let crops = self.session.rules().names();
        let options: Vec<(&str, bool)> = crops
            .iter()
            .map(|c| (*c, self.session.is_selected(c)))
            .collect();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(options.len().max(1) as u16 + 2),
                Constraint::Length(3), // Import path
                Constraint::Length(1),
                Constraint::Length(3), // Name
                Constraint::Length(3), // Crop
                Constraint::Length(3), // Latitude
                Constraint::Length(3), // Longitude
                Constraint::Min(0),
            ])
            .split(area);

        let focused = self.state.focused_field;
        let cursor = (focused == ZoneField::CropFilter).then_some(self.state.filter_cursor);
        CheckListWidget::new(ZoneField::CropFilter.label(), &options)
            .cursor(cursor)
            .render(rows[0], buf);

        self.text_field(ZoneField::ImportPath, "zonas.csv")
            .render(rows[1], buf);

        Paragraph::new(Span::styled("Add a zone", Theme::header())).render(rows[2], buf);

        self.text_field(ZoneField::Name, "Lote 1").render(rows[3], buf);

        SelectWidget::new(ZoneField::Crop.label(), &crops, self.state.crop_index)
            .focused(focused == ZoneField::Crop)
            .render(rows[4], buf);

        self.text_field(ZoneField::Latitude, "-1.8").render(rows[5], buf);
        self.text_field(ZoneField::Longitude, "-79.0").render(rows[6], buf);
    }

    fn text_field(&self, field: ZoneField, placeholder: &'static str) -> InputWidget<'_> {
        let focused = self.state.focused_field == field;
        let editing = focused && self.state.editing;
        let value = if editing {
            self.state.edit_buffer.as_str()
        } else {
            self.state.field_value(field)
        };

        InputWidget::new(field.label(), value)
            .placeholder(placeholder)
            .focused(focused)
            .editing(editing)
    }

    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Current zones", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let zones = self.session.zones();
        if zones.is_empty() {
            Paragraph::new(Span::styled(
                "No zones yet. Import a CSV or add one by hand.",
                Theme::dim(),
            ))
            .block(block)
            .render(area, buf);
            return;
        }

        let header = Row::new(
            ["Zone", "Lat", "Lon", "Crop"]
                .iter()
                .map(|h| Cell::from(*h).style(Theme::header())),
        );

        let rows: Vec<Row> = zones
            .iter()
            .map(|z| {
                Row::new(vec![
                    Cell::from(z.zone_name.as_str()),
                    Cell::from(format!("{:.4}", z.lat)),
                    Cell::from(format!("{:.4}", z.lon)),
                    Cell::from(z.crop_name.as_str()),
                ])
                .style(Theme::normal())
            })
            .collect();

        let widths = [
            Constraint::Min(16),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(14),
        ];

        Table::new(rows, widths)
            .header(header)
            .block(block)
            .render(area, buf);
    }
}
