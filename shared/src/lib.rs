// Data models and helpers shared across the workspace.
pub mod models;
pub mod utils;
