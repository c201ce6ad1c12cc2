pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use api::{create_router, serve};
pub use config::{toml_config::TomlConfig, CliConfig};
pub use crate::core::{relay::RelayEngine, upstream::HttpUpstream};
pub use utils::error::{RelayError, Result};
