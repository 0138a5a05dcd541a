use crate::braille::BrailleCanvas;
use crate::map::arc::walk_great_circle;
use crate::map::land::LandGeometry;
use crate::map::projection::MapProjection;
use crate::mosaic::{Cell, Status};

/// One Braille canvas per color class; the UI colors them at blit time.
pub struct MosaicLayers {
    /// Sphere boundary and landmass outline
    pub outline: BrailleCanvas,
    /// Empty (purchasable) cells
    pub empty: BrailleCanvas,
    /// Approved cells
    pub approved: BrailleCanvas,
    /// Hover highlight
    pub hover: BrailleCanvas,
}

/// Rasterizes the mosaic scene. The projected outline polylines are
/// computed once per projection fit; per-frame work is dot plotting.
pub struct MosaicRenderer {
    width: usize,  // characters
    height: usize, // characters
    outline_paths: Vec<Vec<(i32, i32)>>,
}

impl MosaicRenderer {
    pub fn new(
        width_chars: usize,
        height_chars: usize,
        land: &LandGeometry,
        proj: &MapProjection,
    ) -> Self {
        let mut outline_paths = Vec::new();

        // Sphere boundary, already densely sampled in geographic space
        let boundary: Vec<(i32, i32)> = MapProjection::sphere_boundary(1.0)
            .into_iter()
            .filter_map(|(lon, lat)| proj.project(lon, lat))
            .map(|(x, y)| (x.round() as i32, y.round() as i32))
            .collect();
        outline_paths.push(boundary);

        // Landmass rings, resampled along great circles so long segments
        // follow the projected curve instead of cutting across it
        for ring in land.outlines() {
            if ring.len() < 3 {
                continue;
            }
            let mut path = Vec::new();
            if let Some((x, y)) = proj.project(ring[0].0, ring[0].1) {
                path.push((x.round() as i32, y.round() as i32));
            }
            for i in 0..ring.len() {
                let (lon0, lat0) = ring[i];
                let (lon1, lat1) = ring[(i + 1) % ring.len()];
                walk_great_circle(lon0, lat0, lon1, lat1, |lon, lat| {
                    if let Some((x, y)) = proj.project(lon, lat) {
                        path.push((x.round() as i32, y.round() as i32));
                    }
                });
            }
            outline_paths.push(path);
        }

        Self {
            width: width_chars,
            height: height_chars,
            outline_paths,
        }
    }

    /// Rasterize one frame: outline plus a dot per cell, with the hovered
    /// cell emphasized on its own layer.
    pub fn render(&self, cells: &[Cell], hovered: Option<&Cell>) -> MosaicLayers {
        let mut layers = MosaicLayers {
            outline: BrailleCanvas::new(self.width, self.height),
            empty: BrailleCanvas::new(self.width, self.height),
            approved: BrailleCanvas::new(self.width, self.height),
            hover: BrailleCanvas::new(self.width, self.height),
        };

        let max_jump = (self.width as i32 * 2) / 2;
        for path in &self.outline_paths {
            let mut prev: Option<(i32, i32)> = None;
            for &(x, y) in path {
                if let Some((px, py)) = prev {
                    // Skip wrap-around jumps (e.g. rings crossing ±180°)
                    if (x - px).abs() < max_jump {
                        layers.outline.line(px, py, x, y);
                    }
                }
                prev = Some((x, y));
            }
        }

        for cell in cells {
            let (x, y) = (cell.x.round() as i32, cell.y.round() as i32);
            match cell.status {
                Status::Empty => layers.empty.set_pixel_signed(x, y),
                Status::Approved => layers.approved.fill_circle(x, y, 1),
            }
        }

        if let Some(cell) = hovered {
            layers
                .hover
                .fill_circle(cell.x.round() as i32, cell.y.round() as i32, 2);
        }

        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::builtin_world;
    use crate::mosaic::{generate, GenConfig};

    #[test]
    fn renders_without_panicking_and_plots_cells() {
        let land = builtin_world();
        let proj = MapProjection::fit(200, 96, 4.0);
        let renderer = MosaicRenderer::new(100, 24, &land, &proj);
        let cells = generate(&GenConfig::with_seed(5), &land, None, &proj);
        let layers = renderer.render(&cells, cells.first());

        let empty_dots: String = layers.empty.rows().collect();
        assert!(empty_dots.chars().any(|c| c != '\u{2800}'));
        let outline: String = layers.outline.rows().collect();
        assert!(outline.chars().any(|c| c != '\u{2800}'));
    }
}
