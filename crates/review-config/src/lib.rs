//! Configuration for the self-review pipeline
//!
//! Credentials and API keys live in a TOML file. Every key is optional;
//! an absent or empty key means the corresponding service is not
//! configured, and the pipeline skips or refuses stages accordingly.
//! Nothing here defaults a credential.

pub mod app_config;
pub mod config_file;

pub use app_config::Config;
pub use config_file::load_config_file;
