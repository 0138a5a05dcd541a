use serde::{Deserialize, Serialize};

/// Cell status: empty cells are purchasable placeholders, approved cells
/// carry demo imagery and a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Empty,
    Approved,
}

/// Cell identity, derived from the grid coordinates in milli-degrees.
/// Grid points are distinct by construction, so identities are unique
/// within one generation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    pub lon_mdeg: i32,
    pub lat_mdeg: i32,
}

impl CellId {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon_mdeg: (lon * 1000.0).round() as i32,
            lat_mdeg: (lat * 1000.0).round() as i32,
        }
    }
}

/// Demo imagery and caption for an approved cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub thumb_url: String,
    pub full_url: String,
    pub caption: String,
    pub title: String,
}

/// One sampled, land-qualifying grid point.
/// Projected position is computed once at generation time and never
/// changes afterwards; interaction state lives in the view, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: CellId,
    pub lon: f64,
    pub lat: f64,
    pub x: f64,
    pub y: f64,
    pub status: Status,
    pub price_cents: u32,
    /// Only populated when status is Approved
    pub artwork: Option<Artwork>,
    /// Best-effort country name from the per-country containment pass
    pub country: Option<String>,
}

impl Cell {
    /// Price formatted in whole currency, e.g. "€2.04"
    pub fn price_display(&self) -> String {
        format!("€{}.{:02}", self.price_cents / 100, self.price_cents % 100)
    }

    /// Coordinates formatted for the purchase dialog, e.g. "48.0°N, 11.0°E"
    pub fn coords_display(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.lat.abs(),
            if self.lat >= 0.0 { "N" } else { "S" },
            self.lon.abs(),
            if self.lon >= 0.0 { "E" } else { "W" },
        )
    }
}
