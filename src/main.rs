use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use gadm_map::app::App;
use gadm_map::data;
use gadm_map::map::{Region, StyleInput, Viewport};
use ratatui::style::Color;
use ratatui::DefaultTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let data_dir = PathBuf::from(args.get(1).map(String::as_str).unwrap_or("data"));
    let level: u8 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(0);

    // Load everything before the terminal enters raw mode so warnings
    // stay readable on stderr
    let regions = load_map_data(&data_dir, level);

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, regions);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Load country codes and all shapefile triples found in the data
/// directory, flattened to one region per shape record
fn load_map_data(data_dir: &Path, level: u8) -> Vec<Region> {
    if !data_dir.is_dir() {
        eprintln!(
            "Warning: data directory {} not found, showing the world frame only",
            data_dir.display()
        );
        return Vec::new();
    }

    match data::load_country_codes(data_dir) {
        Ok(codes) => eprintln!("{} country codes loaded", codes.len()),
        Err(e) => eprintln!("Warning: failed to load country code tables: {e}"),
    }

    let countries = match data::discover_countries(data_dir, level) {
        Ok(codes) => codes,
        Err(e) => {
            eprintln!("Warning: failed to scan {}: {e}", data_dir.display());
            return Vec::new();
        }
    };

    data::load_countries(data_dir, &countries, level)
        .into_iter()
        .flat_map(|(_, regions)| regions)
        .collect()
}

/// Evenly spaced fill colors over a dark-purple to yellow ramp,
/// one per region
fn palette(n: usize) -> Vec<Option<Color>> {
    const ANCHORS: [(u8, u8, u8); 4] = [(68, 1, 84), (49, 104, 142), (53, 183, 121), (253, 231, 37)];

    (0..n)
        .map(|i| {
            let t = if n > 1 {
                i as f64 / (n - 1) as f64
            } else {
                0.0
            };
            let pos = t * (ANCHORS.len() - 1) as f64;
            let lo = (pos.floor() as usize).min(ANCHORS.len() - 2);
            let f = pos - lo as f64;

            let (r0, g0, b0) = ANCHORS[lo];
            let (r1, g1, b1) = ANCHORS[lo + 1];
            let lerp = |a: u8, b: u8| (a as f64 + f * (b as f64 - a as f64)).round() as u8;

            Some(Color::Rgb(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1)))
        })
        .collect()
}

/// Handle mouse events for panning and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for cursor marker
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Click and drag to pan
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, regions: Vec<Region>) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width as usize, size.height as usize);

    let faces = StyleInput::PerRegion(palette(regions.len()));
    app.map_renderer.set_regions(
        regions,
        faces,
        StyleInput::Single(Color::Gray),
        StyleInput::Single(0.2),
    )?;

    // Main loop
    loop {
        // Draw
        terminal.draw(|frame| gadm_map::ui::render(frame, &app))?;

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            // Pan with hjkl or arrow keys
                            KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                            KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                            KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                            KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                            // Zoom
                            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                            // Projection cycling and layer toggles
                            KeyCode::Char('p') | KeyCode::Char('P') => {
                                app.map_renderer.cycle_projection();
                            }
                            KeyCode::Char('o') | KeyCode::Char('O') => {
                                app.map_renderer.toggle_outline();
                            }
                            KeyCode::Char('f') | KeyCode::Char('F') => {
                                app.map_renderer.toggle_fill();
                            }
                            KeyCode::Char('e') | KeyCode::Char('E') => {
                                app.map_renderer.toggle_edges();
                            }

                            // Reset view
                            KeyCode::Char('r') | KeyCode::Char('0') => {
                                let size = terminal.size()?;
                                let width = (size.width as usize).saturating_sub(2) * 2;
                                let height = (size.height as usize).saturating_sub(3) * 4;
                                app.viewport = Viewport::world(width, height);
                            }

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
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
