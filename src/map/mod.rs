pub mod arc;
pub mod land;
pub mod projection;
pub mod renderer;
pub mod spatial;

pub use land::{Country, CountryGeometry, LandGeometry, Polygon};
pub use projection::MapProjection;
pub use renderer::{MosaicLayers, MosaicRenderer};
pub use spatial::SpatialGrid;
