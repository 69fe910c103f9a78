//! Query routing
//!
//! Classifies a query into a coarse category and picks the generation model
//! profile for it, honoring credential availability.

mod classifier;
mod models;

pub use classifier::*;
pub use models::*;
