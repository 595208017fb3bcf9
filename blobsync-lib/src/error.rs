//! Errors that might be returned when using this crate.
//!
//! Only the configuration and database setup errors are meant to be fatal; fetch and persist errors are
//! scoped to a single ingestion cycle.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // HTTP Errors
    #[error("Failed to initialize HTTP client; {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to send HTTP request; {0}")]
    HttpRequest(#[source] reqwest::Error),

    #[error("Failed to fetch data: {code} {reason}")]
    HttpStatus { code: u16, reason: String },

    #[error("Failed to deserialize JSON input; {0}")]
    DeserializeError(#[from] serde_json::Error),

    // Config Errors
    #[error("Failed to read .env file; {0}")]
    ConfigRead(#[from] dotenv::Error),

    #[error("Failed to read config file '{0}'; {1}")]
    ConfigFileRead(String, #[source] std::io::Error),

    #[error("Failed to parse config file; {0}")]
    ConfigFileParse(#[from] toml::de::Error),

    #[error("Option '{option}' is not set; set the '{env_var}' environment variable or add it to the config file")]
    ConfigMissingOption { option: &'static str, env_var: &'static str },

    #[error("Environment variable '{0}' is empty")]
    ConfigReadEmptyEnvironmentVariable(&'static str),

    #[error("Invalid value '{value}' for option '{option}'")]
    ConfigInvalidValue { option: &'static str, value: String },

    // Database Errors
    #[error("Failed to connect to database; {0}")]
    DatabaseConnect(#[source] diesel::r2d2::PoolError),

    #[error("No database connection available; {0}")]
    DatabaseUnavailable(#[source] diesel::r2d2::PoolError),

    #[error("Database is not reachable; {0}")]
    DatabasePing(#[source] diesel::result::Error),

    #[error("Failed to create table 'blobs'; {0}")]
    DatabaseSchema(#[source] diesel::result::Error),

    #[error("Failed to save blob {0}; {1}")]
    DatabasePersist(i64, #[source] diesel::result::Error),

    #[error("Failed to query database; {0}")]
    DatabaseQuery(#[source] diesel::result::Error),
}
