//! Presentation of per-author stats: console text, JSON and CSV.

pub mod csv;
pub mod json;
pub mod text;
