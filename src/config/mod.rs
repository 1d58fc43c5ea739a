// Configuration module entry point
// Loads application configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StaticFilesConfig,
    StorageConfig,
};

/// Config file looked up when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

impl Config {
    /// Load configuration from specified file path
    ///
    /// The file is optional; every key falls back to a built-in default.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();
        let settings = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("storage.data_dir", defaults.storage.data_dir)?
            .set_default("storage.vocabs_file", defaults.storage.vocabs_file)?
            .set_default("storage.marked_file", defaults.storage.marked_file)?
            .set_default("static_files.root", defaults.static_files.root)?
            .set_default("static_files.index_files", defaults.static_files.index_files)?
            .set_default("http.server_name", defaults.http.server_name)?
            .set_default("http.enable_cors", defaults.http.enable_cors)?
            .set_default("http.max_body_size", 102_400)? // 100KB
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.access_log", defaults.logging.access_log)?
            .set_default("logging.access_log_format", defaults.logging.access_log_format)?
            .set_default("performance.keep_alive", defaults.performance.keep_alive)?
            .set_default("performance.request_timeout", 30)?
            .add_source(config::File::with_name(config_path).required(false))
            .build()?;

        settings.try_deserialize()
    }

    /// Load from the path given as first CLI argument, or `config.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
