//! Побайтовое чтение и запись little-endian примитивов и UTF-16 строк.

pub mod read;
pub mod write;

pub use read::*;
pub use write::*;
