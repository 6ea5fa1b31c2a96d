//! Application Layer
//!
//! The `stroke-kin` command line and the TOML configuration that feeds
//! extractor parameters, decode options and the joint map.

pub mod cli;
pub mod config;

pub use cli::{Cli, Commands, ConfigAction};
pub use config::Config;
