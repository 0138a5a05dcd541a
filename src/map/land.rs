use crate::map::spatial::FeatureGrid;

/// Bounding-box bucket size for the containment pre-filter, in degrees.
const INDEX_BUCKET_DEG: f64 = 10.0;

/// A polygon with an exterior ring and optional interior holes.
/// Rings are sequences of (lon, lat) vertices; the closing edge from the
/// last vertex back to the first is implicit.
#[derive(Clone)]
pub struct Polygon {
    exterior: Vec<(f64, f64)>,
    holes: Vec<Vec<(f64, f64)>>,
    bbox: (f64, f64, f64, f64),
}

impl Polygon {
    pub fn new(exterior: Vec<(f64, f64)>, holes: Vec<Vec<(f64, f64)>>) -> Self {
        let bbox = bounds(&exterior);
        Self { exterior, holes, bbox }
    }

    /// (min_lon, min_lat, max_lon, max_lat) of the exterior ring
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        self.bbox
    }

    pub fn exterior(&self) -> &[(f64, f64)] {
        &self.exterior
    }

    /// Even-odd containment: inside the exterior and outside every hole.
    /// Points exactly on a boundary edge follow the half-open crossing
    /// rule and may classify either way.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let (min_lon, min_lat, max_lon, max_lat) = self.bbox;
        if lon < min_lon || lon > max_lon || lat < min_lat || lat > max_lat {
            return false;
        }
        if !ring_contains(&self.exterior, lon, lat) {
            return false;
        }
        !self.holes.iter().any(|hole| ring_contains(hole, lon, lat))
    }
}

/// Ray-cast crossing test against a single ring (even-odd rule).
fn ring_contains(ring: &[(f64, f64)], lon: f64, lat: f64) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = ring[i];
        let (xj, yj) = ring[j];
        if (yi > lat) != (yj > lat) && lon < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn bounds(ring: &[(f64, f64)]) -> (f64, f64, f64, f64) {
    let mut bbox = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for &(lon, lat) in ring {
        bbox.0 = bbox.0.min(lon);
        bbox.1 = bbox.1.min(lat);
        bbox.2 = bbox.2.max(lon);
        bbox.3 = bbox.3.max(lat);
    }
    bbox
}

/// The world landmass outline: a multipolygon with a bbox pre-filter so
/// the per-point containment test only touches plausible polygons.
pub struct LandGeometry {
    polygons: Vec<Polygon>,
    index: FeatureGrid,
}

impl LandGeometry {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let index = FeatureGrid::build(polygons.iter().map(|p| p.bbox()), INDEX_BUCKET_DEG);
        Self { polygons, index }
    }

    /// Land classification for one coordinate.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.index
            .query_point(lon, lat)
            .iter()
            .any(|&i| self.polygons[i].contains(lon, lat))
    }

    /// Exterior rings, for drawing the landmass outline.
    pub fn outlines(&self) -> impl Iterator<Item = &[(f64, f64)]> {
        self.polygons.iter().map(|p| p.exterior())
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }
}

/// A named country as a multipolygon.
pub struct Country {
    pub name: String,
    pub polygons: Vec<Polygon>,
}

/// Per-country boundaries for best-effort name resolution.
/// One flat polygon index; each indexed polygon remembers its country.
pub struct CountryGeometry {
    countries: Vec<Country>,
    /// (country idx, polygon idx) per indexed feature
    features: Vec<(usize, usize)>,
    index: FeatureGrid,
}

impl CountryGeometry {
    pub fn new(countries: Vec<Country>) -> Self {
        let features: Vec<(usize, usize)> = countries
            .iter()
            .enumerate()
            .flat_map(|(ci, c)| (0..c.polygons.len()).map(move |pi| (ci, pi)))
            .collect();
        let index = FeatureGrid::build(
            features
                .iter()
                .map(|&(ci, pi)| countries[ci].polygons[pi].bbox()),
            INDEX_BUCKET_DEG,
        );
        Self { countries, features, index }
    }

    /// Resolve the country containing a coordinate, if any.
    pub fn locate(&self, lon: f64, lat: f64) -> Option<&str> {
        self.index.query_point(lon, lat).iter().find_map(|&f| {
            let (ci, pi) = self.features[f];
            self.countries[ci].polygons[pi]
                .contains(lon, lat)
                .then(|| self.countries[ci].name.as_str())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}
