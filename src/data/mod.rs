use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};

use crate::map::{Country, CountryGeometry, LandGeometry, Polygon};

/// Land outline candidates, probed in order
const LAND_FILES: [&str; 2] = ["ne_110m_land.json", "world-land.json"];

/// Country outline candidates, probed in order
const COUNTRY_FILES: [&str; 2] = ["ne_110m_countries.json", "world-countries.json"];

/// The static world-geometry input: the landmass outline plus optional
/// per-country boundaries for name resolution.
pub struct WorldGeometry {
    pub land: LandGeometry,
    pub countries: Option<CountryGeometry>,
}

/// Load world geometry from `data_dir`. Missing files are not an error;
/// a malformed file logs a warning and the built-in outline takes over so
/// the demo always runs.
pub fn load_world(data_dir: &Path) -> WorldGeometry {
    let mut land = None;
    for filename in LAND_FILES {
        let path = data_dir.join(filename);
        if !path.exists() {
            continue;
        }
        match load_land(&path) {
            Ok(geometry) if !geometry.is_empty() => {
                land = Some(geometry);
                break;
            }
            Ok(_) => eprintln!("Warning: no polygons in {filename}"),
            Err(e) => eprintln!("Warning: failed to load {filename}: {e}"),
        }
    }

    let mut countries = None;
    for filename in COUNTRY_FILES {
        let path = data_dir.join(filename);
        if !path.exists() {
            continue;
        }
        match load_countries(&path) {
            Ok(geometry) if !geometry.is_empty() => {
                countries = Some(geometry);
                break;
            }
            Ok(_) => eprintln!("Warning: no country features in {filename}"),
            Err(e) => eprintln!("Warning: failed to load {filename}: {e}"),
        }
    }

    WorldGeometry {
        land: land.unwrap_or_else(builtin_world),
        countries,
    }
}

fn load_land(path: &Path) -> Result<LandGeometry> {
    let geojson = parse_geojson(path)?;
    let mut polygons = Vec::new();
    for_each_geometry(&geojson, &mut |geometry| {
        collect_polygons(geometry, &mut polygons);
    });
    Ok(LandGeometry::new(polygons))
}

fn load_countries(path: &Path) -> Result<CountryGeometry> {
    let geojson = parse_geojson(path)?;
    let mut countries = Vec::new();

    if let GeoJson::FeatureCollection(fc) = geojson {
        for feature in fc.features {
            let name = feature
                .properties
                .as_ref()
                .and_then(|p| {
                    p.get("name")
                        .or_else(|| p.get("NAME"))
                        .or_else(|| p.get("ADMIN"))
                })
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown")
                .to_owned();

            let mut polygons = Vec::new();
            if let Some(ref geometry) = feature.geometry {
                collect_polygons(geometry, &mut polygons);
            }
            if !polygons.is_empty() {
                countries.push(Country { name, polygons });
            }
        }
    }

    Ok(CountryGeometry::new(countries))
}

/// Parse a GeoJSON file, trying simd-json first (the Natural Earth files
/// are megabytes) and falling back to the serde_json path on rejection.
fn parse_geojson(path: &Path) -> Result<GeoJson> {
    let mut bytes =
        fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    if let Ok(geojson) = simd_json::serde::from_slice::<GeoJson>(&mut bytes) {
        return Ok(geojson);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("re-reading {}", path.display()))?;
    content
        .parse::<GeoJson>()
        .with_context(|| format!("parsing {}", path.display()))
}

/// Visit every geometry in a GeoJSON document
fn for_each_geometry<F>(geojson: &GeoJson, visit: &mut F)
where
    F: FnMut(&Geometry),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    visit(geometry);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                visit(geometry);
            }
        }
        GeoJson::Geometry(geometry) => visit(geometry),
    }
}

/// Extract polygons (exterior + holes) from a geometry
fn collect_polygons(geometry: &Geometry, out: &mut Vec<Polygon>) {
    match &geometry.value {
        Value::Polygon(rings) => {
            if let Some(polygon) = rings_to_polygon(rings) {
                out.push(polygon);
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(polygon) = rings_to_polygon(rings) {
                    out.push(polygon);
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_polygons(g, out);
            }
        }
        _ => {}
    }
}

fn rings_to_polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon> {
    let mut iter = rings.iter().map(|ring| {
        ring.iter()
            .filter(|c| c.len() >= 2)
            .map(|c| (c[0], c[1]))
            .collect::<Vec<_>>()
    });
    let exterior = iter.next()?;
    if exterior.len() < 3 {
        return None;
    }
    Some(Polygon::new(exterior, iter.collect()))
}

/// Simplified continent outlines used when no data file is available.
/// Coarse closed rings, good enough for the demo to stand alone.
pub fn builtin_world() -> LandGeometry {
    let rings: [&[(f64, f64)]; 7] = [
        // North America
        &[
            (-168.0, 65.0), (-166.0, 60.0), (-141.0, 60.0), (-130.0, 55.0),
            (-125.0, 48.0), (-124.0, 40.0), (-117.0, 32.0), (-110.0, 25.0),
            (-97.0, 25.0), (-97.0, 28.0), (-82.0, 24.0), (-80.0, 25.0),
            (-81.0, 31.0), (-75.0, 35.0), (-70.0, 41.0), (-67.0, 45.0),
            (-65.0, 47.0), (-55.0, 47.0), (-52.0, 47.0), (-55.0, 52.0),
            (-58.0, 55.0), (-64.0, 60.0), (-73.0, 62.0), (-80.0, 63.0),
            (-95.0, 62.0), (-110.0, 68.0), (-130.0, 70.0), (-145.0, 70.0),
        ],
        // South America
        &[
            (-80.0, 10.0), (-75.0, 5.0), (-70.0, 5.0), (-60.0, 5.0),
            (-50.0, 0.0), (-35.0, -5.0), (-35.0, -10.0), (-38.0, -15.0),
            (-40.0, -22.0), (-48.0, -25.0), (-55.0, -34.0), (-58.0, -38.0),
            (-65.0, -42.0), (-68.0, -50.0), (-75.0, -52.0), (-75.0, -45.0),
            (-72.0, -40.0), (-72.0, -30.0), (-70.0, -20.0), (-70.0, -15.0),
            (-80.0, -5.0), (-80.0, 0.0),
        ],
        // Europe
        &[
            (-10.0, 36.0), (-5.0, 36.0), (0.0, 38.0), (5.0, 43.0),
            (10.0, 44.0), (15.0, 45.0), (20.0, 40.0), (25.0, 37.0),
            (30.0, 40.0), (35.0, 42.0), (40.0, 43.0), (40.0, 55.0),
            (30.0, 60.0), (25.0, 65.0), (20.0, 70.0), (10.0, 71.0),
            (5.0, 62.0), (5.0, 58.0), (-5.0, 58.0), (-10.0, 52.0),
            (-5.0, 48.0), (-5.0, 43.0),
        ],
        // Sub-Saharan Africa
        &[
            (-17.0, 15.0), (-15.0, 10.0), (-10.0, 5.0), (0.0, 5.0),
            (10.0, 5.0), (15.0, 0.0), (20.0, -5.0), (25.0, -10.0),
            (35.0, -20.0), (35.0, -25.0), (30.0, -30.0), (20.0, -35.0),
            (18.0, -35.0), (15.0, -30.0), (10.0, -15.0), (10.0, 0.0),
            (5.0, 5.0), (-5.0, 5.0), (-10.0, 10.0),
        ],
        // North Africa and Arabia
        &[
            (-17.0, 15.0), (-17.0, 20.0), (-15.0, 28.0), (-5.0, 35.0),
            (10.0, 37.0), (20.0, 33.0), (25.0, 32.0), (35.0, 30.0),
            (35.0, 20.0), (42.0, 12.0), (50.0, 12.0), (45.0, 5.0),
            (35.0, -5.0), (35.0, -20.0), (25.0, -10.0), (20.0, -5.0),
            (15.0, 0.0), (10.0, 5.0), (0.0, 5.0), (-10.0, 5.0),
            (-15.0, 10.0),
        ],
        // Asia
        &[
            (35.0, 42.0), (40.0, 43.0), (50.0, 40.0), (55.0, 37.0),
            (60.0, 25.0), (65.0, 25.0), (70.0, 20.0), (75.0, 15.0),
            (80.0, 8.0), (80.0, 15.0), (88.0, 22.0), (92.0, 22.0),
            (95.0, 16.0), (100.0, 14.0), (105.0, 10.0), (110.0, 20.0),
            (115.0, 22.0), (120.0, 22.0), (122.0, 25.0), (125.0, 30.0),
            (130.0, 35.0), (135.0, 35.0), (140.0, 40.0), (145.0, 45.0),
            (145.0, 50.0), (140.0, 55.0), (135.0, 55.0), (130.0, 52.0),
            (130.0, 43.0), (120.0, 40.0), (110.0, 45.0), (90.0, 50.0),
            (70.0, 55.0), (60.0, 55.0), (50.0, 50.0),
        ],
        // Australia
        &[
            (115.0, -20.0), (120.0, -18.0), (130.0, -12.0), (140.0, -12.0),
            (145.0, -15.0), (150.0, -25.0), (153.0, -30.0), (150.0, -35.0),
            (145.0, -38.0), (140.0, -38.0), (135.0, -35.0), (130.0, -32.0),
            (125.0, -32.0), (115.0, -35.0), (115.0, -25.0),
        ],
    ];

    LandGeometry::new(
        rings
            .iter()
            .map(|ring| Polygon::new(ring.to_vec(), Vec::new()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_world_has_continents() {
        let land = builtin_world();
        assert_eq!(land.len(), 7);
        assert!(land.contains(10.0, 50.0)); // central Europe
        assert!(land.contains(-100.0, 40.0)); // North America
        assert!(land.contains(135.0, -25.0)); // Australia
    }

    #[test]
    fn builtin_world_oceans_are_water() {
        let land = builtin_world();
        assert!(!land.contains(-150.0, 0.0)); // mid-Pacific
        assert!(!land.contains(-30.0, 30.0)); // mid-Atlantic
        assert!(!land.contains(80.0, -50.0)); // southern Indian Ocean
    }

    #[test]
    fn missing_data_dir_falls_back() {
        let world = load_world(Path::new("definitely/not/here"));
        assert!(!world.land.is_empty());
        assert!(world.countries.is_none());
    }
}
