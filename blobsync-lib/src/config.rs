//! Config manager, reading the content of the `.env` file, an optional TOML config file and the process
//! environment.
//!
//! Every option can be set either in the TOML file pointed to by `BLOBSYNC_CONFIG` (using the option name as
//! key) or through its `BLOBSYNC_*` environment variable, where the environment takes precedence. The
//! resulting [`Config`] is built once at startup and handed to the API and database clients.

use crate::error::Error;
use dotenv::dotenv;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub struct Config {
    /// PostgreSQL connection details.
    pub database: DatabaseConfig,

    /// Celenium API endpoint and key.
    pub api: ApiConfig,

    /// Sleep duration between two ingestion cycles.
    pub poll_interval: Duration,
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Blob endpoint of a rollup, e.g. <https://api-mocha.celenium.io/v1/rollup/10/blobs>
    pub url: Url,

    /// Value sent with the `apikey` header.
    pub key: String,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    host: Option<String>,
    port: Option<u16>,
    user: Option<String>,
    password: Option<String>,
    dbname: Option<String>,
    api_url: Option<String>,
    api_key: Option<String>,
    poll_interval: Option<u64>,
}

const ENV_VAR_CONFIG: &str = "BLOBSYNC_CONFIG";
const ENV_VAR_HOST: &str = "BLOBSYNC_HOST";
const ENV_VAR_PORT: &str = "BLOBSYNC_PORT";
const ENV_VAR_USER: &str = "BLOBSYNC_USER";
const ENV_VAR_PASSWORD: &str = "BLOBSYNC_PASSWORD";
const ENV_VAR_DBNAME: &str = "BLOBSYNC_DBNAME";
const ENV_VAR_API_URL: &str = "BLOBSYNC_API_URL";
const ENV_VAR_API_KEY: &str = "BLOBSYNC_API_KEY";
const ENV_VAR_POLL_INTERVAL: &str = "BLOBSYNC_POLL_INTERVAL";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_API_URL: &str = "https://api-mocha.celenium.io/v1/rollup/10/blobs";
const DEFAULT_POLL_INTERVAL: u64 = 12;

impl Config {
    /// Returns a new config, reading `.env` (if present), the config file referenced by `BLOBSYNC_CONFIG`
    /// (if set) and the `BLOBSYNC_*` environment variables.
    pub fn new() -> Result<Self, Error> {
        if Path::new(".env").exists() {
            dotenv()?;
        } else if Path::new("../.env").exists() {
            dotenv::from_filename("../.env")?; // If executed within a sub-directory
        }

        let file = match std::env::var(ENV_VAR_CONFIG) {
            Ok(path) => ConfigFile::read(&path)?,
            Err(_) => ConfigFile::default(),
        };

        Config::from_sources(file, |env_var| std::env::var(env_var).ok())
    }

    fn from_sources<F>(file: ConfigFile, env: F) -> Result<Self, Error>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let lookup = Lookup { env };

        let host = lookup.string(ENV_VAR_HOST, file.host)?.unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup.parsed("port", ENV_VAR_PORT, file.port)?.unwrap_or(DEFAULT_PORT);
        let user = lookup.required("user", ENV_VAR_USER, file.user)?;
        let password = lookup.required("password", ENV_VAR_PASSWORD, file.password)?;
        let dbname = lookup.required("dbname", ENV_VAR_DBNAME, file.dbname)?;

        let api_url =
            lookup.string(ENV_VAR_API_URL, file.api_url)?.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_key = lookup.required("api_key", ENV_VAR_API_KEY, file.api_key)?;

        let poll_interval = lookup
            .parsed("poll_interval", ENV_VAR_POLL_INTERVAL, file.poll_interval)?
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        if poll_interval == 0 {
            return Err(Error::ConfigInvalidValue {
                option: "poll_interval",
                value: poll_interval.to_string(),
            });
        }

        // The query parameters are set by the client, a query in the URL would send them twice
        let url = match Url::parse(&api_url) {
            Ok(url) if url.query().is_none() => url,
            _ => {
                return Err(Error::ConfigInvalidValue {
                    option: "api_url",
                    value: api_url,
                })
            }
        };

        Ok(Config {
            database: DatabaseConfig {
                host,
                port,
                user,
                password,
                dbname,
            },
            api: ApiConfig { url, key: api_key },
            poll_interval: Duration::from_secs(poll_interval),
        })
    }
}

impl DatabaseConfig {
    /// Returns a libpq keyword/value connection string, e.g.
    /// `host='localhost' port=5432 user='blobs' password='secret' dbname='celestia'`.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            quote(&self.host),
            self.port,
            quote(&self.user),
            quote(&self.password),
            quote(&self.dbname),
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("dbname", &self.dbname)
            .finish()
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig").field("url", &self.url.as_str()).field("key", &"***").finish()
    }
}

impl ConfigFile {
    fn read(path: &str) -> Result<Self, Error> {
        let content =
            std::fs::read_to_string(path).map_err(|err| Error::ConfigFileRead(path.to_string(), err))?;

        Ok(toml::from_str(&content)?)
    }
}

/// Resolves a single option, preferring the environment over the config file.
struct Lookup<F> {
    env: F,
}

impl<F> Lookup<F>
where
    F: Fn(&'static str) -> Option<String>,
{
    #[inline]
    fn env_var(&self, env_var: &'static str) -> Result<Option<String>, Error> {
        match (self.env)(env_var) {
            Some(value) if value.is_empty() => Err(Error::ConfigReadEmptyEnvironmentVariable(env_var)),
            value => Ok(value),
        }
    }

    fn string(&self, env_var: &'static str, file_value: Option<String>) -> Result<Option<String>, Error> {
        Ok(self.env_var(env_var)?.or(file_value))
    }

    fn required(
        &self,
        option: &'static str,
        env_var: &'static str,
        file_value: Option<String>,
    ) -> Result<String, Error> {
        self.string(env_var, file_value)?
            .filter(|value| !value.is_empty())
            .ok_or(Error::ConfigMissingOption { option, env_var })
    }

    fn parsed<T: FromStr>(
        &self,
        option: &'static str,
        env_var: &'static str,
        file_value: Option<T>,
    ) -> Result<Option<T>, Error> {
        match self.env_var(env_var)? {
            Some(value) => match value.trim().parse() {
                Ok(parsed) => Ok(Some(parsed)),
                Err(_) => Err(Error::ConfigInvalidValue { option, value }),
            },

            None => Ok(file_value),
        }
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
