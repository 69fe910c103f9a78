//! Document chunking
//!
//! Word-window splitting with a fixed overlap between consecutive chunks.

mod splitter;

pub use splitter::*;
