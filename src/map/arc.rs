use glam::DVec3;

/// Convert lon/lat (degrees) to a unit sphere vector.
#[inline(always)]
pub fn lonlat_to_vec3(lon: f64, lat: f64) -> DVec3 {
    let lon_rad = lon.to_radians();
    let lat_rad = lat.to_radians();
    DVec3::new(
        lat_rad.cos() * lon_rad.cos(),
        lat_rad.cos() * lon_rad.sin(),
        lat_rad.sin(),
    )
}

/// Interpolate along a great circle arc and call a visitor for each subdivision point.
/// Subdivides adaptively: ~2° segments keep projected outline curves smooth at
/// braille resolution (a long segment projected flat would cut across the curve).
/// No allocation — the visitor receives each point inline, endpoint included.
#[inline]
pub fn walk_great_circle(
    lon0: f64, lat0: f64,
    lon1: f64, lat1: f64,
    mut visitor: impl FnMut(f64, f64),
) {
    let a = lonlat_to_vec3(lon0, lat0);
    let b = lonlat_to_vec3(lon1, lat1);

    let dot = a.dot(b).clamp(-1.0, 1.0);
    let angle = dot.acos(); // angular distance in radians

    // ~2° segments
    let steps = ((angle.to_degrees() / 2.0).ceil() as usize).max(1);

    if steps == 1 {
        // Short segment, just emit endpoint
        visitor(lon1, lat1);
        return;
    }

    let sin_angle = angle.sin();
    if sin_angle.abs() < 1e-10 {
        // Points are nearly identical or antipodal
        visitor(lon1, lat1);
        return;
    }

    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let sa = ((1.0 - t) * angle).sin() / sin_angle;
        let sb = (t * angle).sin() / sin_angle;
        let p = a * sa + b * sb;

        let lat = p.z.clamp(-1.0, 1.0).asin().to_degrees();
        let lon = p.y.atan2(p.x).to_degrees();
        visitor(lon, lat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_vectors() {
        let p = lonlat_to_vec3(0.0, 0.0);
        assert!((p.x - 1.0).abs() < 1e-12);
        let n = lonlat_to_vec3(123.0, 90.0);
        assert!((n.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn walk_ends_at_endpoint() {
        let mut last = (f64::NAN, f64::NAN);
        walk_great_circle(-30.0, 10.0, 60.0, 45.0, |lon, lat| last = (lon, lat));
        assert!((last.0 - 60.0).abs() < 1e-6);
        assert!((last.1 - 45.0).abs() < 1e-6);
    }

    #[test]
    fn walk_subdivides_long_segments() {
        let mut count = 0;
        walk_great_circle(0.0, 0.0, 90.0, 0.0, |_, _| count += 1);
        // 90° of arc at ~2° per step
        assert!(count >= 40);
    }
}
