pub mod format;
pub mod stock;
