mod cell;
mod gen;

pub use cell::{Artwork, Cell, CellId, Status};
pub use gen::{approx_region, generate, GenConfig};
pub use gen::{DEFAULT_APPROVAL_RATE, DEFAULT_BASE_PRICE_CENTS, DEFAULT_STEP_DEG};
