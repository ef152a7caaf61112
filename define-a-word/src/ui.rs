use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Widget};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, ThrobberState};
use tui_textarea::TextArea;

use crate::utilities::wrap_text;
use crate::view::{
    Card, LineKind, ResultsView, SubmitButton, View, INPUT_LABEL, NOT_FOUND_MESSAGE, SUBMIT_LABEL, SUBTITLE, TITLE,
};

/// Blank rows above each card.
const CARD_GAP: u16 = 1;
const BUTTON_WIDTH: u16 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Button,
}

/// Terminal-only state: the input widget, focus, scroll offset and spinner.
pub struct UiState {
    pub input: TextArea<'static>,
    pub focus: Focus,
    pub scroll: u16,
    pub throbber: ThrobberState,
}

impl UiState {
    pub fn new() -> Self {
        let mut input = TextArea::default();
        input.set_cursor_line_style(Style::default());
        input.set_placeholder_text("type a word, then press Enter");
        let mut state = Self {
            input,
            focus: Focus::Input,
            scroll: 0,
            throbber: ThrobberState::default(),
        };
        state.apply_focus();
        state
    }

    /// Current text of the input, which is always a single line.
    pub fn query(&self) -> String {
        self.input.lines().join("")
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Button,
            Focus::Button => Focus::Input,
        };
        self.apply_focus();
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = i32::from(self.scroll).saturating_add(delta).clamp(0, i32::from(u16::MAX));
        self.scroll = next as u16;
    }

    fn apply_focus(&mut self) {
        let focused = self.focus == Focus::Input;
        let border = if focused {
            Style::new().fg(Color::Cyan)
        } else {
            Style::new().fg(Color::DarkGray)
        };
        self.input
            .set_block(Block::bordered().title(format!(" {INPUT_LABEL} ")).border_style(border));
        self.input.set_cursor_style(if focused {
            Style::new().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        });
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn draw(frame: &mut Frame, view: &View, ui: &mut UiState) {
    let [header, input_row, results, status] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());
    let [input_area, button_area] =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(BUTTON_WIDTH)]).areas(input_row);

    render_header(frame, header);
    frame.render_widget(&ui.input, input_area);
    render_button(frame, button_area, view.submit, ui.focus == Focus::Button, &ui.throbber);
    match &view.results {
        ResultsView::Idle => {}
        ResultsView::Cards(cards) => render_cards(frame, results, cards, &mut ui.scroll),
        ResultsView::NotFound => render_not_found(frame, results),
    }
    render_status(frame, status, view.error.as_deref());
}

fn render_header(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(TITLE, Style::new().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(SUBTITLE, Style::new().fg(Color::Gray))),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_button(frame: &mut Frame, area: Rect, submit: SubmitButton, focused: bool, throbber: &ThrobberState) {
    let mut style = if submit.enabled && !submit.loading {
        Style::new().fg(Color::Cyan)
    } else {
        Style::new().fg(Color::DarkGray)
    };
    if focused && submit.enabled {
        style = style.add_modifier(Modifier::REVERSED);
    }
    let mut line = Line::default();
    if submit.loading {
        let spinner = Throbber::default().style(style).throbber_style(style);
        line.spans.push(spinner.to_symbol_span(throbber));
    }
    line.spans.push(Span::styled(SUBMIT_LABEL, style));
    let button = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(style));
    frame.render_widget(button, area);
}

fn render_not_found(frame: &mut Frame, area: Rect) {
    if area.height < 2 {
        return;
    }
    let row = Rect::new(area.x, area.y + 1, area.width, 1);
    frame.render_widget(Paragraph::new(NOT_FOUND_MESSAGE).alignment(Alignment::Center), row);
}

fn render_status(frame: &mut Frame, area: Rect, error: Option<&str>) {
    let line = match error {
        Some(error) => Line::from(Span::styled(error.to_owned(), Style::new().fg(Color::Red))),
        None => Line::from(Span::styled(
            "Enter define · Tab switch focus · ↑/↓ scroll · Esc quit",
            Style::new().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Stack the cards on an off-screen canvas and copy the visible window.
fn render_cards(frame: &mut Frame, area: Rect, cards: &[Card], scroll: &mut u16) {
    if area.is_empty() {
        return;
    }
    // borders plus one column of padding on each side
    let inner_width = usize::from(area.width.saturating_sub(4));
    let rendered: Vec<Vec<Line<'static>>> = cards.iter().map(|card| card_lines(card, inner_width)).collect();
    let total = rendered.iter().fold(0u16, |total, lines| {
        total
            .saturating_add(CARD_GAP)
            .saturating_add(lines.len() as u16)
            .saturating_add(2)
    });

    let mut canvas = Buffer::empty(Rect::new(0, 0, area.width, total));
    let mut y = 0u16;
    for lines in rendered {
        y = y.saturating_add(CARD_GAP);
        let height = (lines.len() as u16).saturating_add(2);
        let card_area = Rect::new(0, y, area.width, height).intersection(canvas.area);
        if card_area.is_empty() {
            break;
        }
        Paragraph::new(lines)
            .block(Block::bordered().padding(Padding::horizontal(1)))
            .render(card_area, &mut canvas);
        y = y.saturating_add(height);
    }

    let canvas_height = canvas.area.height;
    *scroll = (*scroll).min(canvas_height.saturating_sub(area.height));
    let visible = area.height.min(canvas_height - *scroll);
    let buf = frame.buffer_mut();
    for row in 0..visible {
        for col in 0..area.width {
            buf[(area.x + col, area.y + row)] = canvas[(col, row + *scroll)].clone();
        }
    }
}

fn card_lines(card: &Card, width: usize) -> Vec<Line<'static>> {
    let secondary = Style::new().fg(Color::Gray).add_modifier(Modifier::ITALIC);
    let mut lines = Vec::new();
    let mut previous = None;
    for line in card.lines() {
        match line.kind {
            LineKind::Title => {
                lines.push(Line::from(Span::styled(line.text, Style::new().add_modifier(Modifier::BOLD))));
            }
            LineKind::Subtitle => lines.push(Line::from(line.text)),
            LineKind::Divider => {
                lines.push(Line::from(Span::styled("─".repeat(width), Style::new().fg(Color::DarkGray))));
            }
            LineKind::PartOfSpeech | LineKind::SynonymsLabel => {
                if matches!(previous, Some(LineKind::Title | LineKind::Subtitle)) {
                    lines.push(Line::default());
                }
                lines.push(Line::from(Span::styled(line.text, secondary)));
            }
            LineKind::Definition | LineKind::Synonyms => {
                lines.extend(wrap_text(&line.text, width).into_iter().map(Line::from));
            }
        }
        previous = Some(line.kind);
    }
    lines
}
