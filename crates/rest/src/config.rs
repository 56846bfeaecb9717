//! Server configuration for the Petitio REST API.
//!
//! Configuration can be built programmatically, parsed from the command line,
//! or read from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PETITIO_PORT` | 4941 | Server port |
//! | `PETITIO_HOST` | 127.0.0.1 | Host to bind |
//! | `PETITIO_LOG_LEVEL` | info | Log level |
//! | `PETITIO_DATABASE` | petitio.db | SQLite file path, or `:memory:` |
//! | `PETITIO_IMAGE_DIR` | storage/images | Directory for uploaded images |
//! | `PETITIO_BASE_PATH` | /api/v1 | Path prefix for every route |
//! | `PETITIO_MAX_BODY_SIZE` | 10485760 | Max request body (bytes) |
//! | `PETITIO_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `PETITIO_BCRYPT_COST` | 10 | Password hashing cost |
//! | `PETITIO_ENABLE_CORS` | true | Enable CORS |
//! | `PETITIO_CORS_ORIGINS` | * | Allowed origins |
//! | `PETITIO_CORS_METHODS` | GET,POST,PUT,PATCH,DELETE,OPTIONS | Allowed methods |
//! | `PETITIO_CORS_HEADERS` | Content-Type,Accept,X-Authorization | Allowed headers |
//!
//! # Example
//!
//! ```rust
//! use petitio_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     database_path: ":memory:".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use clap::Parser;

/// Path value selecting an in-memory database.
pub const MEMORY_DATABASE: &str = ":memory:";

/// Cost bounds accepted by bcrypt.
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Server configuration for the Petitio REST API.
#[derive(Debug, Clone, Parser)]
#[command(name = "petitio")]
#[command(about = "Petition and crowdfunding REST API server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "PETITIO_PORT", default_value = "4941")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "PETITIO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "PETITIO_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// SQLite database file, or `:memory:` for a transient database.
    #[arg(long, env = "PETITIO_DATABASE", default_value = "petitio.db")]
    pub database_path: String,

    /// Directory where petition and user images are written.
    #[arg(long, env = "PETITIO_IMAGE_DIR", default_value = "storage/images")]
    pub image_dir: PathBuf,

    /// Path prefix under which all routes are mounted.
    #[arg(long, env = "PETITIO_BASE_PATH", default_value = "/api/v1")]
    pub base_path: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "PETITIO_MAX_BODY_SIZE", default_value = "10485760")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "PETITIO_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// bcrypt cost factor used when hashing passwords.
    #[arg(long, env = "PETITIO_BCRYPT_COST", default_value = "10")]
    pub bcrypt_cost: u32,

    /// Enable CORS.
    #[arg(long, env = "PETITIO_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "PETITIO_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "PETITIO_CORS_METHODS",
        default_value = "GET,POST,PUT,PATCH,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "PETITIO_CORS_HEADERS",
        default_value = "Content-Type,Accept,X-Authorization"
    )]
    pub cors_headers: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 4941,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            database_path: "petitio.db".to_string(),
            image_dir: PathBuf::from("storage/images"),
            base_path: "/api/v1".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout: 30,
            bcrypt_cost: 10,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,PATCH,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Accept,X-Authorization".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns true when the database lives only in memory.
    pub fn uses_memory_database(&self) -> bool {
        self.database_path == MEMORY_DATABASE
    }

    /// The base path with any trailing slash removed. An empty string means
    /// routes are mounted at the root.
    pub fn normalized_base_path(&self) -> &str {
        self.base_path.trim_end_matches('/')
    }

    /// Validates the configuration and returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.database_path.trim().is_empty() {
            errors.push("Database path cannot be empty".to_string());
        }

        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            errors.push("Base path must start with '/'".to_string());
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            errors.push(format!(
                "bcrypt cost must be between {} and {}",
                MIN_BCRYPT_COST,
                MAX_BCRYPT_COST
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses an in-memory database, the cheapest bcrypt cost and a short
    /// timeout. The image directory should be replaced with a temporary one.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            database_path: MEMORY_DATABASE.to_string(),
            image_dir: std::env::temp_dir().join("petitio-test-images"),
            base_path: "/api/v1".to_string(),
            max_body_size: 10 * 1024 * 1024,
            request_timeout: 5,
            bcrypt_cost: MIN_BCRYPT_COST,
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
        }
    }
}
