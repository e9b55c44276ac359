pub mod cli;
pub mod config;
pub mod curation;
pub mod generate;
pub mod graph;
pub mod model;
pub mod resolver;

mod api;
mod flock;

pub use api::{DepTree, DepTreeBuilder};
