pub mod config;
pub mod error;
pub mod gpx_sink;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use gpx_sink::*;
pub use pipeline::*;
