use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Single-line text field. Shows a block cursor while being edited.
pub struct InputWidget<'a> {
    label: &'a str,
    value: &'a str,
    placeholder: &'a str,
    focused: bool,
    editing: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(label: &'a str, value: &'a str) -> Self {
        Self {
            label,
            value,
            placeholder: "",
            focused: false,
            editing: false,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let block = Block::default()
            .title(self.label)
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        let line = if self.editing {
            Line::from(vec![
                Span::raw(self.value),
                Span::styled(" ", Theme::selected()),
            ])
        } else if self.value.is_empty() {
            Line::from(Span::styled(self.placeholder, Theme::dim()))
        } else {
            Line::from(Span::styled(self.value, Theme::normal()))
        };

        Paragraph::new(line).render(inner, buf);
    }
}

/// Cycles through a fixed option list with left/right.
pub struct SelectWidget<'a> {
    label: &'a str,
    options: &'a [&'a str],
    selected: usize,
    focused: bool,
}

impl<'a> SelectWidget<'a> {
    pub fn new(label: &'a str, options: &'a [&'a str], selected: usize) -> Self {
        Self {
            label,
            options,
            selected,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for SelectWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let block = Block::default()
            .title(self.label)
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        let display = match self.options.get(self.selected) {
            Some(value) if self.focused => format!("< {} >", value),
            Some(value) => value.to_string(),
            None => "No crops configured".to_string(),
        };

        let style = if self.focused {
            Theme::highlight()
        } else {
            Theme::normal()
        };

        Paragraph::new(Span::styled(display, style)).render(inner, buf);
    }
}

/// Checkbox list, one line per option.
pub struct CheckListWidget<'a> {
    title: &'a str,
    options: &'a [(&'a str, bool)],
    cursor: Option<usize>,
}

impl<'a> CheckListWidget<'a> {
    pub fn new(title: &'a str, options: &'a [(&'a str, bool)]) -> Self {
        Self {
            title,
            options,
            cursor: None,
        }
    }

    pub fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }
}

impl Widget for CheckListWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(self.title, Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.options.is_empty() {
            Paragraph::new(Span::styled("No crop rules loaded", Theme::dim())).render(inner, buf);
            return;
        }

        let lines: Vec<Line> = self
            .options
            .iter()
            .enumerate()
            .map(|(i, (label, checked))| {
                let mark = if *checked { "[x] " } else { "[ ] " };
                let style = if self.cursor == Some(i) {
                    Theme::highlight()
                } else if *checked {
                    Theme::normal()
                } else {
                    Theme::dim()
                };
                Line::from(Span::styled(format!("{}{}", mark, label), style))
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}
