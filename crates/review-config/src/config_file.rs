use std::{env, path::PathBuf};

const LOCAL_CONFIG_FILE: &str = ".self-review.toml";
const HOME_CONFIG_DIR: &str = ".config/self-review";
const HOME_CONFIG_FILE: &str = "config.toml";

/// Load config file content from CWD first, then home directory
///
/// Searches in:
/// 1. `.self-review.toml` in the current working directory
/// 2. `~/.config/self-review/config.toml`
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    // Try current directory first
    if let Ok(content) = std::fs::read_to_string(LOCAL_CONFIG_FILE) {
        log::debug!("Loaded config from {}", LOCAL_CONFIG_FILE);
        return Some(content);
    }

    // Try home directory
    if let Some(home_config) = get_home_config_path() {
        if let Ok(content) = std::fs::read_to_string(&home_config) {
            log::debug!("Loaded config from {}", home_config.display());
            return Some(content);
        }
    }

    None
}

/// Get the path to the config file in the home directory
fn get_home_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(HOME_CONFIG_DIR)
            .join(HOME_CONFIG_FILE)
    })
}
