use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::layout::{Position, Rect, Size};
use ratatui::DefaultTerminal;
use std::path::Path;
use std::time::Duration;

use tui_mosaic::app::App;
use tui_mosaic::{data, ui};

fn main() -> Result<()> {
    // Load geometry before touching the terminal so loader warnings stay
    // visible on stderr
    let world = data::load_world(Path::new("data"));

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, world);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events: hover tracking plus click routing.
/// While a dialog is open, a click outside it is a backdrop dismissal.
fn handle_mouse(app: &mut App, mouse: MouseEvent, size: Size) {
    // Always track mouse position for the cursor marker and tooltip
    app.set_mouse_pos(mouse.column, mouse.row);

    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        match app.view.overlay() {
            Some(overlay) => {
                let area = Rect::new(0, 0, size.width, size.height);
                let dialog = ui::overlay_rect(overlay, area);
                if !dialog.contains(Position::new(mouse.column, mouse.row)) {
                    app.view.dismiss();
                }
            }
            None => app.click(mouse.column, mouse.row),
        }
    }
}

fn run(terminal: &mut DefaultTerminal, world: data::WorldGeometry) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(
        size.width as usize,
        size.height as usize,
        world,
        rand::random(),
    );

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Esc | KeyCode::Char('q') => {
                                if app.view.overlay().is_some() {
                                    app.view.dismiss();
                                } else {
                                    app.quit();
                                }
                            }

                            // Confirm on the purchase dialog
                            KeyCode::Enter | KeyCode::Char('y') => {
                                app.view.confirm_purchase();
                            }

                            // Fresh seed, fresh mosaic
                            KeyCode::Char('r') => app.reshuffle(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse, terminal.size()?);
                }
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
