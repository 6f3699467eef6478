#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod hosts;
pub mod loader;
pub mod settings;
pub mod version;

pub use error::Error;
pub use hosts::AllowedHosts;
pub use loader::{find_config_file, load_config, resolve_config};
pub use settings::{DevServerConfig, ServerSettings};
pub use version::VERSION;
