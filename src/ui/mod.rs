// UI module for drawing the terminal widget.
// Paints a view model as a bordered, fixed-layout ranked list with a status bar.

pub mod terminal;

use ratatui::{layout::Flex, prelude::*, widgets::*};

use crate::app::App;
use crate::render::{Rgb, ViewBody, ViewModel};

/// Width of the widget box, borders included.
const WIDGET_WIDTH: u16 = 42;

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let view = app.view();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Widget
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let mut list_state = ListState::default().with_selected(app.selected);
    draw_widget(frame, chunks[0], &view, &mut list_state);
    draw_status_bar(frame, app, chunks[1]);
}

/// Draw the widget box centered in `area`.
///
/// Only populated rows take space; hidden slots are not drawn.
pub fn draw_widget(frame: &mut Frame, area: Rect, view: &ViewModel, list_state: &mut ListState) {
    let theme = view.theme;
    let body_height = match &view.body {
        ViewBody::Rows(rows) => rows.len() as u16,
        _ => 3,
    };
    // Borders plus body.
    let height = (body_height + 2).min(area.height);
    let widget_area = centered(area, WIDGET_WIDTH.min(area.width), height);

    let base = Style::default()
        .fg(color(theme.text))
        .bg(color(theme.background));

    let mut block = Block::bordered()
        .title(Line::from(view.title).bold())
        .style(base);
    if let Some(label) = &view.updated_label {
        block = block.title_bottom(
            Line::from(format!(" Updated: {} ", label))
                .right_aligned()
                .style(Style::default().fg(color(theme.last_update))),
        );
    }

    frame.render_widget(Clear, widget_area);

    match &view.body {
        ViewBody::Rows(rows) => {
            let rank_width = rows.iter().map(|r| r.rank_text.len()).max().unwrap_or(1);
            let items: Vec<ListItem> = rows
                .iter()
                .map(|row| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:>width$} ", row.rank_text, width = rank_width),
                            Style::default()
                                .fg(color(row.rank_color.rgb()))
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(row.keyword.clone(), Style::default().fg(color(theme.text))),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .block(block)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            frame.render_stateful_widget(list, widget_area, list_state);
        }
        ViewBody::Empty { message } => {
            let paragraph = Paragraph::new(message.as_str())
                .style(base.fg(color(theme.secondary)))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, widget_area);
        }
        ViewBody::Error { message } => {
            let paragraph = Paragraph::new(message.as_str())
                .style(base.fg(color(theme.error)))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(paragraph, widget_area);
        }
    }
}

/// Draw the status bar with key hints and the latest status message.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" r", Style::default().fg(Color::Yellow)),
        Span::raw(" refresh  "),
        Span::styled("d", Style::default().fg(Color::Yellow)),
        Span::raw(" theme  "),
        Span::styled("s", Style::default().fg(Color::Yellow)),
        Span::raw(format!(" size ({})  ", app.size.label())),
        Span::styled("enter", Style::default().fg(Color::Yellow)),
        Span::raw(" open  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ];

    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("  {}", status),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Rect of the given size centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    rect
}
