pub mod error;
pub mod header;
pub mod point;

pub use error::*;
pub use header::*;
pub use point::*;

/// Масштаб координат в файле: градусы × 10⁵.
pub const COORD_SCALE: f64 = 0.000_01;

/// Перевод км/ч в м/с (5/18).
pub const KMH_TO_MPS: f64 = 0.277_777_777_777_778;
