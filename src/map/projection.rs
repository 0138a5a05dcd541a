use std::f64::consts::{FRAC_PI_2, PI};

/// Natural Earth projection in raw projection units.
/// Polynomial form after Šavrič et al.; the same coefficients d3-geo ships.
#[inline(always)]
fn natural_earth_raw(lon_rad: f64, lat_rad: f64) -> (f64, f64) {
    let p2 = lat_rad * lat_rad;
    let p4 = p2 * p2;
    let x = lon_rad
        * (0.8707 - 0.131979 * p2 + p4 * (-0.013791 + p4 * (0.003971 * p2 - 0.001529 * p4)));
    let y = lat_rad
        * (1.007226 + p2 * (0.015085 + p4 * (-0.044475 + 0.028874 * p2 - 0.005916 * p4)));
    (x, y)
}

/// Whole-world projection fit to a fixed output rectangle with margins.
/// Configured once; a pure deterministic mapping from (lon, lat) to pixel
/// coordinates. There is no pan or zoom: cell positions are computed at
/// generation time and frozen.
#[derive(Clone)]
pub struct MapProjection {
    /// Output pixel width
    pub width: usize,
    /// Output pixel height
    pub height: usize,
    /// Margin in pixels kept clear on all sides
    pub margin: f64,
    scale: f64,
    cx: f64,
    cy: f64,
}

impl MapProjection {
    /// Fit the full sphere extent into `width` x `height` pixels,
    /// keeping `margin` pixels clear on every side.
    pub fn fit(width: usize, height: usize, margin: f64) -> Self {
        // Raw extents of the projected sphere
        let (x_max, _) = natural_earth_raw(PI, 0.0);
        let (_, y_max) = natural_earth_raw(0.0, FRAC_PI_2);

        let half_w = (width as f64 / 2.0 - margin).max(1.0);
        let half_h = (height as f64 / 2.0 - margin).max(1.0);
        let scale = (half_w / x_max).min(half_h / y_max);

        Self {
            width,
            height,
            margin,
            scale,
            cx: width as f64 / 2.0,
            cy: height as f64 / 2.0,
        }
    }

    /// Project a geographic coordinate to pixel coordinates.
    /// Returns `None` for coordinates outside the projection domain
    /// (non-finite input or beyond the ±180°/±90° sphere extent).
    pub fn project(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if !lon.is_finite() || !lat.is_finite() || lon.abs() > 180.0 || lat.abs() > 90.0 {
            return None;
        }
        let (rx, ry) = natural_earth_raw(lon.to_radians(), lat.to_radians());
        Some((self.cx + rx * self.scale, self.cy - ry * self.scale))
    }

    /// Sample the sphere boundary as a closed polyline in geographic
    /// coordinates: up the 180°W meridian, across the north edge, down
    /// 180°E, back across the south edge. Projected, this traces the
    /// outline of the world shape.
    pub fn sphere_boundary(step_deg: f64) -> Vec<(f64, f64)> {
        let mut boundary = Vec::new();
        let step = step_deg.max(0.5);

        let mut lat = -90.0;
        while lat <= 90.0 {
            boundary.push((-180.0, lat));
            lat += step;
        }
        let mut lon = -180.0;
        while lon <= 180.0 {
            boundary.push((lon, 90.0));
            lon += step;
        }
        let mut lat = 90.0;
        while lat >= -90.0 {
            boundary.push((180.0, lat));
            lat -= step;
        }
        let mut lon = 180.0;
        while lon >= -180.0 {
            boundary.push((lon, -90.0));
            lon -= step;
        }
        boundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_maps_to_center() {
        let proj = MapProjection::fit(200, 100, 4.0);
        let (x, y) = proj.project(0.0, 0.0).unwrap();
        assert!((x - 100.0).abs() < 1e-9);
        assert!((y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn east_is_right_north_is_up() {
        let proj = MapProjection::fit(200, 100, 4.0);
        let (cx, cy) = proj.project(0.0, 0.0).unwrap();
        let (ex, _) = proj.project(90.0, 0.0).unwrap();
        let (_, ny) = proj.project(0.0, 45.0).unwrap();
        assert!(ex > cx);
        assert!(ny < cy);
    }

    #[test]
    fn extent_respects_margin() {
        let proj = MapProjection::fit(400, 200, 10.0);
        for &(lon, lat) in &[(-180.0, 0.0), (180.0, 0.0), (0.0, 90.0), (0.0, -90.0)] {
            let (x, y) = proj.project(lon, lat).unwrap();
            assert!(x >= 9.9 && x <= 390.1, "x out of extent: {x}");
            assert!(y >= 9.9 && y <= 190.1, "y out of extent: {y}");
        }
    }

    #[test]
    fn out_of_domain_is_discarded() {
        let proj = MapProjection::fit(200, 100, 4.0);
        assert!(proj.project(181.0, 0.0).is_none());
        assert!(proj.project(0.0, 91.0).is_none());
        assert!(proj.project(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn projection_is_deterministic() {
        let proj = MapProjection::fit(240, 136, 4.0);
        assert_eq!(proj.project(12.5, -33.0), proj.project(12.5, -33.0));
    }
}
