use crate::cache::FetchStatus;
use crate::catalog::Movie;
use crate::pagination::page_strip;
use crate::tui::app::{App, Toast};
use crate::tui::colors;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use unicode_width::UnicodeWidthStr;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Results
            Constraint::Length(1), // Pagination
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_search_bar(frame, app, chunks[0]);
    draw_results(frame, app, chunks[1]);
    draw_pagination(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    // Overlays
    if let Some(movie) = app.controller.selected() {
        draw_detail_overlay(frame, movie, area);
    }
    if let Some(toast) = &app.toast {
        draw_toast(frame, toast, area);
    }

    // Show cursor in the search bar when it has focus and no overlay is open
    if app.input.focused && app.controller.selected().is_none() {
        // Account for border (1) + space (1) + search icon " \u{1F50D} " (approx 4 display cols)
        let prefix = &app.input.text[..app.input.cursor_pos];
        let cursor_x = chunks[0].x + 1 + 4 + prefix.width() as u16;
        let cursor_y = chunks[0].y + 1;
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_style = if app.input.focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Search Movies ");

    let search_text = format!(" \u{1F50D} {}", app.input.text);
    let paragraph = Paragraph::new(search_text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn draw_results(frame: &mut Frame, app: &mut App, area: Rect) {
    match app.status {
        FetchStatus::Idle => {
            draw_hint(frame, area, "Type a movie title and press Enter to search.");
        }
        FetchStatus::Loading if app.results().is_empty() => {
            draw_loader(frame, area);
        }
        FetchStatus::Error => {
            draw_error(frame, app, area);
        }
        _ => {
            // Success, or Loading with the previous page still visible
            if app.results().is_empty() {
                draw_hint(frame, area, "No movies matched this search.");
            } else {
                draw_grid(frame, app, area);
            }
        }
    }
}

fn draw_loader(frame: &mut Frame, area: Rect) {
    let y = area.y + area.height / 3;
    let line_area = Rect::new(area.x, y, area.width, 1);
    frame.render_widget(
        Paragraph::new("\u{23F3} Searching the catalog...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Cyan)),
        line_area,
    );
}

fn draw_hint(frame: &mut Frame, area: Rect, message: &str) {
    let y = area.y + area.height / 3;
    let line_area = Rect::new(area.x, y, area.width, 1);
    frame.render_widget(
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        line_area,
    );
}

fn draw_error(frame: &mut Frame, app: &App, area: Rect) {
    let message = app
        .last_error
        .clone()
        .unwrap_or_else(|| "The search request failed.".to_string());

    let width = 60u16.min(area.width.saturating_sub(4));
    let height = 6u16.min(area.height);
    let popup_area = centered_rect(width, height, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Error ")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = Text::from(vec![
        Line::from(message),
        Line::from(""),
        Line::from(Span::styled(
            "Change the search or page to try again.",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(text_paragraph(text), inner);
}

fn text_paragraph(text: Text<'_>) -> Paragraph<'_> {
    Paragraph::new(text).wrap(Wrap { trim: true })
}

fn draw_grid(frame: &mut Frame, app: &mut App, area: Rect) {
    // Calculate visible rows (area height minus header)
    let grid_height = area.height.saturating_sub(1) as usize;
    app.grid.visible_rows = grid_height;

    let header = Row::new(
        ["Title", "Year", "Rating", "Votes", "Lang", "Overview"].map(|name| {
            Cell::from(name).style(
                Style::default()
                    .fg(Color::White)
                    .bg(colors::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
        }),
    )
    .height(1);

    let start = app.grid.scroll_offset;
    let end = (start + grid_height).min(app.results().len());

    let rows: Vec<Row> = (start..end)
        .enumerate()
        .map(|(visual_idx, logical_idx)| {
            let movie = &app.results()[logical_idx];
            let is_selected = app.grid.cursor == Some(logical_idx);

            let year = movie
                .year()
                .map(|y| y.to_string())
                .unwrap_or_default();
            let rating = if movie.vote_count == 0 {
                String::new()
            } else {
                format!("{:.1}", movie.vote_average)
            };
            let votes = if movie.vote_count == 0 {
                String::new()
            } else {
                crate::format_count(movie.vote_count)
            };
            let lang = colors::language_label(movie.original_language.as_deref());
            let overview = movie.overview.replace('\n', " ");

            // Alternating row background
            let bg = if is_selected {
                colors::ROW_SELECTED_BG
            } else if visual_idx % 2 == 1 {
                colors::ROW_ALT_BG
            } else {
                Color::Reset
            };
            let fg_modifier = if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            };

            Row::new(vec![
                Cell::from(movie.title.clone()).style(
                    Style::default()
                        .fg(Color::LightBlue)
                        .bg(bg)
                        .add_modifier(fg_modifier),
                ),
                Cell::from(year).style(Style::default().fg(Color::White).bg(bg)),
                Cell::from(rating).style(
                    Style::default()
                        .fg(colors::rating_color(movie.vote_average))
                        .bg(bg),
                ),
                Cell::from(votes).style(Style::default().fg(Color::Gray).bg(bg)),
                Cell::from(lang).style(Style::default().fg(Color::DarkGray).bg(bg)),
                Cell::from(overview).style(Style::default().fg(Color::Gray).bg(bg)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(34),
        Constraint::Length(5),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(4),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::NONE));

    frame.render_widget(table, area);
}

fn draw_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let total_pages = app.total_pages();
    if app.status != FetchStatus::Success || total_pages <= 1 {
        return;
    }

    let current = app.controller.page();
    let arrow_style = |active: bool| {
        if active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled("\u{2190}", arrow_style(current > 1)),
        Span::raw(" "),
    ];
    for slot in page_strip(current, total_pages) {
        match slot {
            Some(p) if p == current => spans.push(Span::styled(
                format!(" {p} "),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Some(p) => spans.push(Span::styled(
                format!(" {p} "),
                Style::default().fg(Color::White),
            )),
            None => spans.push(Span::styled(
                " \u{2026} ",
                Style::default().fg(Color::DarkGray),
            )),
        }
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled("\u{2192}", arrow_style(current < total_pages)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = match app.status {
        FetchStatus::Idle => " Ready".to_string(),
        FetchStatus::Loading if app.results().is_empty() => " \u{23F3} Searching...".to_string(),
        FetchStatus::Loading => format!(" \u{23F3} Fetching page {}...", app.controller.page()),
        FetchStatus::Error => " Search failed".to_string(),
        FetchStatus::Success => {
            if app.total_results() == 0 {
                " 0 results".to_string()
            } else {
                format!(
                    " {} results | page {}/{}",
                    crate::format_count(u64::from(app.total_results())),
                    app.controller.page(),
                    app.total_pages().max(1)
                )
            }
        }
    };

    let right_text = " /:Search  \u{2191}\u{2193}:Move  Enter:Details  \u{2190}\u{2192}:Page  Ctrl+Q:Quit ";

    // Left-aligned state + padding + right-aligned key hints
    let available_width = area.width as usize;
    let left_width = left_text.as_str().width();
    let right_width = right_text.width();

    let status_str = if left_width + right_width < available_width {
        let padding = available_width - left_width - right_width;
        format!("{}{}{}", left_text, " ".repeat(padding), right_text)
    } else {
        left_text
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(colors::ACCENT));

    frame.render_widget(status, area);
}

fn draw_detail_overlay(frame: &mut Frame, movie: &Movie, area: Rect) {
    let width = 72u16.min(area.width.saturating_sub(4));
    let height = 18u16.min(area.height.saturating_sub(2));
    let popup_area = centered_rect(width, height, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", movie.title))
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let label = Style::default().fg(Color::Gray);

    let released = movie
        .release_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("unknown");
    let rating_line = if movie.vote_count == 0 {
        Line::from(vec![
            Span::styled("Rating:   ", label),
            Span::styled("no votes yet", Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled("Rating:   ", label),
            Span::styled(
                format!("{:.1}/10", movie.vote_average),
                Style::default().fg(colors::rating_color(movie.vote_average)),
            ),
            Span::raw(format!(" ({} votes)", crate::format_count(movie.vote_count))),
        ])
    };

    let mut lines = vec![
        Line::from(vec![Span::styled("Released: ", label), Span::raw(released)]),
        rating_line,
        Line::from(vec![
            Span::styled("Language: ", label),
            Span::raw(colors::language_label(movie.original_language.as_deref())),
        ]),
    ];
    if let Some(poster) = movie.poster_url() {
        lines.push(Line::from(vec![
            Span::styled("Poster:   ", label),
            Span::styled(poster, Style::default().fg(Color::DarkGray)),
        ]));
    }
    lines.push(Line::from(""));
    if movie.overview.is_empty() {
        lines.push(Line::from(Span::styled(
            "No overview available.",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(movie.overview.clone()));
    }

    let body_area = Rect::new(
        inner.x + 1,
        inner.y,
        inner.width.saturating_sub(2),
        inner.height.saturating_sub(2),
    );
    frame.render_widget(text_paragraph(Text::from(lines)), body_area);

    let hint_area = Rect::new(
        inner.x + 1,
        inner.y + inner.height.saturating_sub(1),
        inner.width.saturating_sub(2),
        1,
    );
    frame.render_widget(
        Paragraph::new("Esc:Close  o:Open in browser  \u{2190}\u{2192}:Page")
            .style(Style::default().fg(Color::DarkGray)),
        hint_area,
    );
}

fn draw_toast(frame: &mut Frame, toast: &Toast, area: Rect) {
    let width = (toast.message.as_str().width() as u16 + 4).min(area.width.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width + 1);
    let popup_area = Rect::new(x, area.y + 1, width, 3);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);
    frame.render_widget(
        Paragraph::new(toast.message.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow)),
        inner,
    );
}

/// Helper to create a centered popup area
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
