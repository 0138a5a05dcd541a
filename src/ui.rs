use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};

use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::map::MosaicLayers;
use crate::mosaic::{Cell, Status};
use crate::view::Overlay;

const GOLD: Color = Color::Yellow;
const GOLD_SOFT: Color = Color::LightYellow;
const OUTLINE: Color = Color::DarkGray;
const INK: Color = Color::White;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);

    match app.view.overlay() {
        None => render_tooltip(frame, app, chunks[0]),
        Some(Overlay::ImageViewer(id)) => {
            if let Some(cell) = app.cell_by_id(id) {
                render_image_viewer(frame, cell, area);
            }
        }
        Some(Overlay::Purchase(id)) => {
            if let Some(cell) = app.cell_by_id(id) {
                render_purchase(frame, cell, area);
            }
        }
    }
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(OUTLINE))
        .title(Span::styled(
            " World Mosaic ",
            Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cursor_pos = app.mouse_pos().and_then(|(col, row)| {
        let cx = col.saturating_sub(1);
        let cy = row.saturating_sub(1);
        (cx < inner.width && cy < inner.height).then_some((cx, cy))
    });

    let widget = MosaicWidget {
        layers: app.render_layers(),
        cursor_pos: if app.view.overlay().is_none() {
            cursor_pos
        } else {
            None
        },
    };
    frame.render_widget(widget, inner);
}

/// Blits the per-class braille layers with their colors, back to front.
struct MosaicWidget {
    layers: MosaicLayers,
    cursor_pos: Option<(u16, u16)>,
}

impl MosaicWidget {
    /// Render one braille canvas layer in a single color
    fn render_layer(&self, canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for (row_idx, row_str) in canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_fg(color);
            }
        }
    }
}

impl Widget for MosaicWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_layer(&self.layers.outline, OUTLINE, area, buf);
        self.render_layer(&self.layers.empty, GOLD_SOFT, area, buf);
        self.render_layer(&self.layers.approved, GOLD, area, buf);
        self.render_layer(&self.layers.hover, INK, area, buf);

        if let Some((cx, cy)) = self.cursor_pos {
            let x = area.x + cx;
            let y = area.y + cy;
            if x < area.x + area.width && y < area.y + area.height {
                buf[(x, y)].set_char('╋').set_fg(Color::Red);
            }
        }
    }
}

/// Floating tooltip next to the pointer: price for empty cells,
/// caption for approved ones.
fn render_tooltip(frame: &mut Frame, app: &App, map_area: Rect) {
    let Some(cell) = app.hovered_cell() else {
        return;
    };
    let Some((col, row)) = app.mouse_pos() else {
        return;
    };

    let text = match cell.status {
        Status::Empty => format!("Price: {}", cell.price_display()),
        Status::Approved => cell
            .artwork
            .as_ref()
            .map(|a| a.caption.clone())
            .unwrap_or_else(|| "—".to_owned()),
    };

    let width = (text.chars().count() as u16 + 2).min(map_area.width);
    let height = 3u16;

    // Offset from the pointer; flip to the other side near the edges
    let mut x = col.saturating_add(2);
    if x + width > map_area.right() {
        x = col.saturating_sub(width + 1);
    }
    let mut y = row.saturating_add(1);
    if y + height > map_area.bottom() {
        y = row.saturating_sub(height);
    }

    let rect = Rect::new(x.max(map_area.x), y.max(map_area.y), width, height)
        .intersection(map_area);
    if rect.width < 3 || rect.height < 3 {
        return;
    }

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(INK))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(GOLD))),
        rect,
    );
}

/// Rect of the active modal, exposed so the event loop can tell backdrop
/// clicks from clicks inside the dialog.
pub fn overlay_rect(overlay: Overlay, area: Rect) -> Rect {
    match overlay {
        Overlay::ImageViewer(_) => centered_rect(area, area.width * 7 / 10, area.height * 7 / 10),
        Overlay::Purchase(_) => centered_rect(area, 48.min(area.width), 9),
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Image/caption viewer for an approved cell. The terminal can't show the
/// photo itself; the dialog shows the title, caption and image references.
fn render_image_viewer(frame: &mut Frame, cell: &Cell, area: Rect) {
    let rect = overlay_rect(Overlay::ImageViewer(cell.id), area);
    frame.render_widget(Clear, rect);

    let title = cell
        .artwork
        .as_ref()
        .map(|a| a.title.as_str())
        .unwrap_or("Untitled");
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GOLD))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(INK).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let mut lines = vec![Line::raw("")];
    match cell.artwork.as_ref() {
        Some(art) => {
            lines.push(Line::styled(
                "▄▄▄▄▄▄▄▄▄▄▄▄  [ image ]  ▄▄▄▄▄▄▄▄▄▄▄▄",
                Style::default().fg(OUTLINE),
            ));
            lines.push(Line::raw(""));
            lines.push(Line::styled(art.full_url.clone(), Style::default().fg(OUTLINE)));
            lines.push(Line::raw(""));
            lines.push(Line::styled(art.caption.clone(), Style::default().fg(INK)));
        }
        None => lines.push(Line::styled("No image", Style::default().fg(OUTLINE))),
    }
    if let Some(country) = cell.country.as_deref() {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("{country} · {}", cell.coords_display()),
            Style::default().fg(GOLD_SOFT),
        ));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Esc: close · click outside to dismiss",
        Style::default().fg(OUTLINE),
    ));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(ratatui::layout::Alignment::Center),
        inner,
    );
}

/// Purchase confirmation placeholder for an empty cell.
fn render_purchase(frame: &mut Frame, cell: &Cell, area: Rect) {
    let rect = overlay_rect(Overlay::Purchase(cell.id), area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GOLD))
        .title(Span::styled(
            " Buy cell ",
            Style::default().fg(INK).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(rect);
    frame.render_widget(block, rect);

    let lines = vec![
        Line::raw(""),
        Line::styled(
            format!(
                "Position: {} · Price: {}",
                cell.coords_display(),
                cell.price_display()
            ),
            Style::default().fg(INK),
        ),
        Line::raw(""),
        Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Black).bg(GOLD)),
            Span::styled(" Checkout (demo)   ", Style::default().fg(INK)),
            Span::styled(" Esc ", Style::default().fg(INK).bg(Color::DarkGray)),
            Span::styled(" Cancel", Style::default().fg(INK)),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center),
        inner,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(notice) = app.view.notice() {
        Line::from(vec![
            Span::styled(" ✓ ", Style::default().fg(GOLD)),
            Span::styled(notice.to_owned(), Style::default().fg(GOLD_SOFT)),
        ])
    } else {
        let approved = app
            .cells()
            .iter()
            .filter(|c| c.status == Status::Approved)
            .count();
        let mut spans = vec![
            Span::styled(" Cells: ", Style::default().fg(OUTLINE)),
            Span::styled(
                format!("{}", app.cells().len()),
                Style::default().fg(GOLD_SOFT),
            ),
            Span::styled(
                format!(" ({approved} approved)"),
                Style::default().fg(GOLD),
            ),
            Span::styled(" | ", Style::default().fg(OUTLINE)),
            Span::styled(
                format!("Seed: {:016x}", app.seed()),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(" | ", Style::default().fg(OUTLINE)),
            Span::styled(
                format!("Step: {}°", app.step_deg()),
                Style::default().fg(Color::Cyan),
            ),
        ];
        if let Some(cell) = app.hovered_cell() {
            spans.push(Span::styled(" | ", Style::default().fg(OUTLINE)));
            spans.push(Span::styled(
                cell.coords_display(),
                Style::default().fg(Color::Cyan),
            ));
        }
        spans.push(Span::styled(
            " | r:reshuffle q:quit",
            Style::default().fg(OUTLINE),
        ));
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(status), area);
}
