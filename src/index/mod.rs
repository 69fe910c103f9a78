//! Vector storage for the semantic retriever

mod vector_store;

pub use vector_store::*;
