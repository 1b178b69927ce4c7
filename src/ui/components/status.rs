use crate::app::StatusMessage;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct StatusLine<'a> {
    message: Option<&'a StatusMessage>,
}

impl<'a> StatusLine<'a> {
    pub fn new(message: Option<&'a StatusMessage>) -> Self {
        Self { message }
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if let Some(msg) = self.message {
            Paragraph::new(Span::styled(msg.text.as_str(), Theme::status(msg.level)))
                .render(area, buf);
        }
    }
}

/// Key hints: `[key]Label` pairs followed by the global screen keys.
pub struct NavBar<'a> {
    keys: &'a [(&'a str, &'a str)],
}

impl<'a> NavBar<'a> {
    pub fn new(keys: &'a [(&'a str, &'a str)]) -> Self {
        Self { keys }
    }
}

static GLOBAL_KEYS: [(&str, &str); 4] = [
    ("[1]", "Zones "),
    ("[2]", "Risk "),
    ("[3]", "Map "),
    ("[q]", "Quit"),
];

impl Widget for NavBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let spans: Vec<Span> = self
            .keys
            .iter()
            .chain(GLOBAL_KEYS.iter())
            .flat_map(|(key, label)| {
                [
                    Span::styled(*key, Theme::nav_key()),
                    Span::styled(*label, Theme::nav_label()),
                ]
            })
            .collect();

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
