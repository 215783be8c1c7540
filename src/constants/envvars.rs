pub const LOG_LEVEL: &str = "LOGGING_LEVEL";

pub const HTTP_TIMEOUT_SECS: &str = "CONTRACTS_HTTP_TIMEOUT_SECS";
pub const CONFIG_DIR: &str = "CONTRACTS_CONFIG_DIR";
