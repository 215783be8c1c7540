use std::env;
use std::path::PathBuf;

use crate::constants::envvars;

/// Load the local `.env`, then `$CONTRACTS_CONFIG_DIR/.env` if set. Returns
/// the files that were loaded, so the caller can report them once logging is
/// up.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();
    if let Ok(path) = dotenv::dotenv() {
        loaded.push(path);
    }
    if let Ok(config_dir) = env::var(envvars::CONFIG_DIR) {
        let config_dotenv = PathBuf::from(config_dir).join(".env");
        if dotenv::from_path(&config_dotenv).is_ok() {
            loaded.push(config_dotenv);
        }
    }
    loaded
}
