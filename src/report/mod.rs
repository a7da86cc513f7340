//! Report generation: console, CSV and JSON

pub mod console;
pub mod csv;
pub mod json;
