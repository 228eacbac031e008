//! Capability traits consumed by the analysis and synthesis layers.

pub mod file_reader;

pub use file_reader::{FileReader, FsReader, MapReader, StringReader};
