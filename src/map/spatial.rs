use std::collections::HashMap;

/// Spatial hash grid for O(1) neighborhood queries over 2-D points.
/// The mosaic uses one in screen-pixel space to resolve which cell
/// the pointer is hovering.
pub struct SpatialGrid<T> {
    /// Grid buckets indexed by (cell_x, cell_y)
    buckets: HashMap<(i32, i32), Vec<usize>>,
    /// All items with their positions (indices into this vec stored in buckets)
    items: Vec<(f64, f64, T)>,
    /// Bucket size in the same units as the stored positions
    bucket_size: f64,
}

impl<T> SpatialGrid<T> {
    /// Create a new spatial grid with the given bucket size
    pub fn new(bucket_size: f64) -> Self {
        Self {
            buckets: HashMap::new(),
            items: Vec::new(),
            bucket_size,
        }
    }

    #[inline(always)]
    fn to_bucket(&self, x: f64, y: f64) -> (i32, i32) {
        (
            (x / self.bucket_size).floor() as i32,
            (y / self.bucket_size).floor() as i32,
        )
    }

    /// Insert an item at a position
    pub fn insert(&mut self, x: f64, y: f64, item: T) {
        let idx = self.items.len();
        let bucket = self.to_bucket(x, y);
        self.items.push((x, y, item));
        self.buckets.entry(bucket).or_default().push(idx);
    }

    /// Find the item nearest to (x, y) within `radius`, if any.
    /// Scans the bucket neighborhood covering the radius and picks the
    /// closest candidate by squared distance.
    pub fn nearest_within(&self, x: f64, y: f64, radius: f64) -> Option<&T> {
        let center = self.to_bucket(x, y);
        let reach = (radius / self.bucket_size).ceil() as i32;

        let mut best: Option<(f64, &T)> = None;
        let r2 = radius * radius;

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let Some(indices) = self.buckets.get(&(center.0 + dx, center.1 + dy)) else {
                    continue;
                };
                for &idx in indices {
                    let (ix, iy, ref item) = self.items[idx];
                    let d2 = (ix - x) * (ix - x) + (iy - y) * (iy - y);
                    if d2 <= r2 && best.as_ref().map_or(true, |(bd, _)| d2 < *bd) {
                        best = Some((d2, item));
                    }
                }
            }
        }

        best.map(|(_, item)| item)
    }

    /// Number of items
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Spatial index for geographic features using conservative approximation.
/// Each feature's bounding box is indexed into every bucket it overlaps,
/// guaranteeing no false negatives while allowing false positives
/// (eliminated by the downstream containment test).
pub struct FeatureGrid {
    buckets: HashMap<(i32, i32), Vec<usize>>,
    bucket_size: f64,
}

impl FeatureGrid {
    #[inline(always)]
    fn to_bucket(&self, lon: f64, lat: f64) -> (i32, i32) {
        (
            (lon / self.bucket_size).floor() as i32,
            (lat / self.bucket_size).floor() as i32,
        )
    }

    /// Build from feature bounding boxes (conservative approximation:
    /// each feature inserted into every bucket its bbox overlaps)
    pub fn build(bboxes: impl Iterator<Item = (f64, f64, f64, f64)>, bucket_size: f64) -> Self {
        let mut grid = Self {
            buckets: HashMap::new(),
            bucket_size,
        };
        for (idx, (min_lon, min_lat, max_lon, max_lat)) in bboxes.enumerate() {
            let min_bucket = grid.to_bucket(min_lon, min_lat);
            let max_bucket = grid.to_bucket(max_lon, max_lat);
            for y in min_bucket.1..=max_bucket.1 {
                for x in min_bucket.0..=max_bucket.0 {
                    grid.buckets.entry((x, y)).or_default().push(idx);
                }
            }
        }
        grid
    }

    /// Feature indices whose bbox overlaps the bucket containing the point.
    /// May contain false positives; the caller's containment test settles them.
    pub fn query_point(&self, lon: f64, lat: f64) -> &[usize] {
        self.buckets
            .get(&self.to_bucket(lon, lat))
            .map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_prefers_closer_item() {
        let mut grid = SpatialGrid::new(8.0);
        grid.insert(10.0, 10.0, "far");
        grid.insert(3.0, 4.0, "near");
        assert_eq!(grid.nearest_within(0.0, 0.0, 20.0), Some(&"near"));
    }

    #[test]
    fn nearest_respects_radius() {
        let mut grid = SpatialGrid::new(8.0);
        grid.insert(10.0, 0.0, "far");
        assert_eq!(grid.nearest_within(0.0, 0.0, 5.0), None);
    }

    #[test]
    fn feature_grid_never_drops_containing_bbox() {
        let grid = FeatureGrid::build([(0.0, 0.0, 10.0, 10.0)].into_iter(), 4.0);
        assert!(grid.query_point(9.5, 9.5).contains(&0));
        assert!(grid.query_point(0.1, 9.9).contains(&0));
        assert!(grid.query_point(50.0, 50.0).is_empty());
    }
}
