use thiserror::Error;

pub mod build;
pub mod node;
pub mod project;
pub mod results;

pub use node::{DependencyNode, NodeIndex};
pub use project::Project;
pub use results::ProjectResult;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing key `{0}` while parsing")]
    MissingKey(String),
}
