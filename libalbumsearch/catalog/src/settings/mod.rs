mod config_error;

pub use config_error::*;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::consts::{
    DATABASE_FILE, DEFAULT_API_URL, DEFAULT_HISTORY_CAPACITY, DEFAULT_TIMEOUT_SECS, PROJECT_NAME,
    USER_AGENT,
};

const API_URL_VAR: &str = "ALBUMSEARCH_API_URL";
const COUNTRY_VAR: &str = "ALBUMSEARCH_COUNTRY";
const LIMIT_VAR: &str = "ALBUMSEARCH_LIMIT";
const TIMEOUT_VAR: &str = "ALBUMSEARCH_TIMEOUT_SECS";
const DB_PATH_VAR: &str = "ALBUMSEARCH_DB_PATH";
const HISTORY_CAPACITY_VAR: &str = "ALBUMSEARCH_HISTORY_CAPACITY";

#[derive(Clone, Debug)]
pub struct Settings {
    pub api_base_url: String,
    /// Two-letter storefront code. The catalog assumes `US` when unset.
    pub country: Option<String>,
    pub result_limit: Option<u32>,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Falls back to the platform data directory when unset.
    pub database_path: Option<PathBuf>,
    /// Maximum number of search terms kept in the history log. Zero disables the bound.
    pub history_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_owned(),
            country: None,
            result_limit: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_owned(),
            database_path: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());
        let mut settings = Self::default();

        if let Some(api_url) = lookup(API_URL_VAR) {
            settings.api_base_url = api_url;
        }
        if let Some(country) = lookup(COUNTRY_VAR) {
            settings.country = Some(country);
        }
        if let Some(limit) = lookup(LIMIT_VAR) {
            settings.result_limit = Some(parse_var(LIMIT_VAR, &limit)?);
        }
        if let Some(timeout) = lookup(TIMEOUT_VAR) {
            settings.request_timeout = Duration::from_secs(parse_var(TIMEOUT_VAR, &timeout)?);
        }
        if let Some(db_path) = lookup(DB_PATH_VAR) {
            settings.database_path = Some(PathBuf::from(db_path));
        }
        if let Some(capacity) = lookup(HISTORY_CAPACITY_VAR) {
            settings.history_capacity = parse_var(HISTORY_CAPACITY_VAR, &capacity)?;
        }

        Ok(settings)
    }

    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => {
                let proj_dirs = directories::ProjectDirs::from("", "", PROJECT_NAME)
                    .ok_or(ConfigError::NoHomeDir)?;
                Ok(proj_dirs.data_dir().join(DATABASE_FILE))
            }
        }
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.to_owned(), value.to_owned()))
}
