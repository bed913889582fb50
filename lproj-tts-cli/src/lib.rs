//! CLI library for testing purposes

pub mod config;
pub mod embed;
pub mod generate;
pub mod git;
pub mod validation;
pub mod view;
pub mod voices;

pub use config::{FileConfig, load_config};
pub use generate::{GenerateSettings, GenerationArgs};
