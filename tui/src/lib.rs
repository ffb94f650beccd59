//! TUI rendering for rota using ratatui.
//!
//! Rendering is immediate-mode: [`draw`] is a full projection of coordinator
//! state into the frame, every frame. Nothing is patched incrementally and no
//! handler or widget state survives from one render to the next.

mod input;
mod theme;

pub use input::{InputPump, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Padding, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use rota_engine::{App, InputMode, SyncPhase};
use rota_types::Task;

/// Main draw function.
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.options();
    let palette = palette(options);
    let glyphs = glyphs(options);

    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),    // Task list
            Constraint::Length(3), // Draft input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_tasks(frame, app, chunks[0], &palette, &glyphs);
    draw_input(frame, app, chunks[1], &palette);
    draw_status_bar(frame, app, chunks[2], &palette);
}

fn draw_tasks(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.text_muted))
        .padding(Padding::horizontal(1))
        .title(" tasks ");

    if app.is_empty() {
        let hint = match app.phase() {
            SyncPhase::Loading => {
                Span::styled("syncing with the collection...", Style::default().fg(palette.warning))
            }
            SyncPhase::Ready => Span::styled(
                "no tasks - press i and type a title",
                Style::default().fg(palette.text_muted),
            ),
        };
        frame.render_widget(Paragraph::new(Line::from(hint)).block(block), area);
        return;
    }

    let items: Vec<ListItem> = app
        .tasks()
        .iter()
        .map(|task| task_row(task, palette, glyphs))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(styles::selected_row(palette))
        .highlight_symbol(glyphs.selector);

    let mut state = ListState::default().with_selected(Some(app.selected()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn task_row<'a>(task: &'a Task, palette: &Palette, glyphs: &Glyphs) -> ListItem<'a> {
    let (marker, marker_style, title_style) = if task.completed {
        (
            glyphs.done,
            Style::default().fg(palette.success),
            styles::completed_title(palette),
        )
    } else {
        (
            glyphs.pending,
            Style::default().fg(palette.text_muted),
            styles::pending_title(palette),
        )
    };

    ListItem::new(Line::from(vec![
        Span::styled(format!("{marker} "), marker_style),
        Span::styled(task.title.as_str(), title_style),
    ]))
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let editing = app.input_mode() == InputMode::Insert;
    let border_color = if editing {
        palette.accent
    } else {
        palette.text_muted
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .padding(Padding::horizontal(1))
        .title(" new task ");

    let inner = block.inner(area);
    let draft = app.draft();
    let text_style = if editing {
        Style::default().fg(palette.text_primary)
    } else {
        Style::default().fg(palette.text_secondary)
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(draft.text(), text_style))).block(block),
        area,
    );

    if editing {
        let cursor_x = inner.x + draft.text_before_cursor().width() as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let progress = match app.phase() {
        SyncPhase::Loading => Span::styled("syncing...", Style::default().fg(palette.warning)),
        SyncPhase::Ready => Span::styled(
            format!("{}/{} done", app.completed_count(), app.tasks().len()),
            Style::default().fg(palette.text_secondary),
        ),
    };

    let hints = match app.input_mode() {
        InputMode::Normal => "i edit  space toggle  d delete  r reload  q quit",
        InputMode::Insert => "enter add  esc back",
    };

    let line = Line::from(vec![
        Span::raw(" "),
        progress,
        Span::styled("   ", Style::default()),
        Span::styled(hints, Style::default().fg(palette.text_muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
