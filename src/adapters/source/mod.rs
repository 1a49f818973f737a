//! Tabular source adapter

pub mod reader;

pub use reader::{CsvSource, RowIter};
