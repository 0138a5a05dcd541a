use crate::data::WorldGeometry;
use crate::map::{MapProjection, MosaicLayers, MosaicRenderer, SpatialGrid};
use crate::mosaic::{generate, Cell, CellId, GenConfig};
use crate::view::ViewState;

/// Pixels kept clear around the projected sphere
const MAP_MARGIN_PX: f64 = 4.0;

/// Hover hit-test radius in braille pixels
const HIT_RADIUS_PX: f64 = 4.0;

/// Bucket size of the hit-test grid, in braille pixels
const HIT_BUCKET_PX: f64 = 8.0;

/// Application state: the generated mosaic plus transient view state.
/// Cells are regenerated only when the projection changes (terminal
/// resize, same seed) or on an explicit reshuffle (fresh seed).
pub struct App {
    world: WorldGeometry,
    config: GenConfig,
    projection: MapProjection,
    cells: Vec<Cell>,
    hit_index: SpatialGrid<usize>,
    renderer: MosaicRenderer,
    pub view: ViewState,
    pub should_quit: bool,
    /// Current mouse position in terminal cells
    mouse_pos: Option<(u16, u16)>,
    /// Map pane size in characters (inside the border)
    inner_width: usize,
    inner_height: usize,
}

struct Scene {
    projection: MapProjection,
    cells: Vec<Cell>,
    hit_index: SpatialGrid<usize>,
    renderer: MosaicRenderer,
}

fn build_scene(
    inner_width: usize,
    inner_height: usize,
    world: &WorldGeometry,
    config: &GenConfig,
) -> Scene {
    // Braille gives 2x4 pixels per character
    let px_width = inner_width * 2;
    let px_height = inner_height * 4;

    let projection = MapProjection::fit(px_width, px_height, MAP_MARGIN_PX);
    let cells = generate(config, &world.land, world.countries.as_ref(), &projection);

    let mut hit_index = SpatialGrid::new(HIT_BUCKET_PX);
    for (i, cell) in cells.iter().enumerate() {
        hit_index.insert(cell.x, cell.y, i);
    }

    let renderer = MosaicRenderer::new(inner_width, inner_height, &world.land, &projection);

    Scene {
        projection,
        cells,
        hit_index,
        renderer,
    }
}

impl App {
    /// Build the app for a terminal of `width` x `height` characters.
    pub fn new(width: usize, height: usize, world: WorldGeometry, seed: u64) -> Self {
        // Account for the border (2 chars) and the status bar (1 char)
        let inner_width = width.saturating_sub(2).max(1);
        let inner_height = height.saturating_sub(3).max(1);
        let config = GenConfig::with_seed(seed);
        let scene = build_scene(inner_width, inner_height, &world, &config);

        Self {
            world,
            config,
            projection: scene.projection,
            cells: scene.cells,
            hit_index: scene.hit_index,
            renderer: scene.renderer,
            view: ViewState::default(),
            should_quit: false,
            mouse_pos: None,
            inner_width,
            inner_height,
        }
    }

    /// Update pane size when the terminal resizes and regenerate with the
    /// same seed: statuses and prices stay put, only positions move.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.inner_width = width.saturating_sub(2).max(1);
        self.inner_height = height.saturating_sub(3).max(1);
        self.rebuild();
    }

    /// Reshuffle: a fresh seed, a fresh mosaic.
    pub fn reshuffle(&mut self) {
        self.config.seed = rand::random();
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let scene = build_scene(self.inner_width, self.inner_height, &self.world, &self.config);
        self.projection = scene.projection;
        self.cells = scene.cells;
        self.hit_index = scene.hit_index;
        self.renderer = scene.renderer;
        self.view.reset();
    }

    /// Rasterize the current frame
    pub fn render_layers(&self) -> MosaicLayers {
        self.renderer.render(&self.cells, self.hovered_cell())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn projection(&self) -> &MapProjection {
        &self.projection
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn step_deg(&self) -> f64 {
        self.config.step_deg
    }

    pub fn cell_by_id(&self, id: CellId) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id)
    }

    pub fn hovered_cell(&self) -> Option<&Cell> {
        self.view.hover().and_then(|id| self.cell_by_id(id))
    }

    /// Current mouse position in terminal cells
    pub fn mouse_pos(&self) -> Option<(u16, u16)> {
        self.mouse_pos
    }

    /// Track the pointer and update the hover target.
    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        match self.cell_at(col, row) {
            Some(cell) => {
                let id = cell.id;
                self.view.hover_enter(id);
            }
            None => self.view.hover_clear(),
        }
    }

    /// Route a click on the map: the nearest cell within the hit radius
    /// opens its dialog. The event loop handles backdrop dismissal while
    /// an overlay is open, so this only fires on the bare map.
    pub fn click(&mut self, col: u16, row: u16) {
        if let Some(cell) = self.cell_at(col, row) {
            let (id, status) = (cell.id, cell.status);
            self.view.click(id, status);
        }
    }

    /// Terminal cell (col, row) to the nearest mosaic cell, if any.
    /// One-cell border offset, 2x4 braille pixels per character.
    fn cell_at(&self, col: u16, row: u16) -> Option<&Cell> {
        let px = (col.saturating_sub(1)) as f64 * 2.0;
        let py = (row.saturating_sub(1)) as f64 * 4.0;
        self.hit_index
            .nearest_within(px, py, HIT_RADIUS_PX)
            .map(|&i| &self.cells[i])
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::builtin_world;
    use crate::mosaic::Status;
    use crate::view::Overlay;

    fn app() -> App {
        let world = WorldGeometry {
            land: builtin_world(),
            countries: None,
        };
        App::new(120, 40, world, 7)
    }

    /// Terminal cell whose braille block contains the cell's pixel
    fn terminal_pos(cell: &Cell) -> (u16, u16) {
        let col = (cell.x.round() as i64 / 2 + 1) as u16;
        let row = (cell.y.round() as i64 / 4 + 1) as u16;
        (col, row)
    }

    #[test]
    fn hover_finds_cell_under_pointer() {
        let mut app = app();
        let target = app.cells()[0].clone();
        let (col, row) = terminal_pos(&target);
        app.set_mouse_pos(col, row);
        // Nearest cell within the radius; with neighbors closer than the
        // grid step this may be an adjacent cell, but never none.
        assert!(app.view.hover().is_some());
    }

    #[test]
    fn hover_clears_over_open_ocean() {
        let mut app = app();
        // Top-left corner is outside the sphere
        app.set_mouse_pos(1, 1);
        assert_eq!(app.view.hover(), None);
    }

    #[test]
    fn click_routes_by_status() {
        let mut app = app();
        let empty = app
            .cells()
            .iter()
            .find(|c| c.status == Status::Empty)
            .unwrap()
            .clone();
        let (col, row) = terminal_pos(&empty);
        app.set_mouse_pos(col, row);
        let hovered = app.hovered_cell().unwrap().clone();
        app.click(col, row);
        match (hovered.status, app.view.overlay().unwrap()) {
            (Status::Empty, Overlay::Purchase(id)) => assert_eq!(id, hovered.id),
            (Status::Approved, Overlay::ImageViewer(id)) => assert_eq!(id, hovered.id),
            other => panic!("status/overlay mismatch: {other:?}"),
        }
    }

    #[test]
    fn resize_keeps_assignment() {
        let mut app = app();
        let before: Vec<_> = app
            .cells()
            .iter()
            .map(|c| (c.id, c.status, c.price_cents))
            .collect();
        app.resize(200, 60);
        let after: Vec<_> = app
            .cells()
            .iter()
            .map(|c| (c.id, c.status, c.price_cents))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn reshuffle_draws_a_new_seed() {
        let mut app = app();
        let seed = app.seed();
        app.reshuffle();
        assert_ne!(seed, app.seed());
        assert_eq!(app.view.overlay(), None);
    }
}
