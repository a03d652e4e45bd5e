use std::env;
use std::time::Duration;

use thiserror::Error;

const PLACEHOLDER_URL: &str = "https://your-project-id.supabase.co";
const PLACEHOLDER_ANON_KEY: &str = "your-anon-key";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Which record store backs the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Supabase,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub table: String,
    pub backend: StoreBackend,
    pub request_timeout: Duration,
    pub operator_email: Option<String>,
    pub operator_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: PLACEHOLDER_URL.to_string(),
            supabase_anon_key: PLACEHOLDER_ANON_KEY.to_string(),
            table: "villas".to_string(),
            backend: StoreBackend::Supabase,
            request_timeout: Duration::from_secs(30),
            operator_email: None,
            operator_password: None,
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    /// Missing optional values fall back to `Config::default()`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backend = match env::var("VILLA_STORE") {
            Ok(value) => match value.to_ascii_lowercase().as_str() {
                "supabase" => StoreBackend::Supabase,
                "memory" => StoreBackend::Memory,
                _ => return Err(ConfigError::Invalid { name: "VILLA_STORE", value }),
            },
            Err(_) => defaults.backend,
        };

        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(value) => {
                let secs = value.parse::<u64>().map_err(|_| ConfigError::Invalid {
                    name: "REQUEST_TIMEOUT_SECS",
                    value: value.clone(),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => defaults.request_timeout,
        };

        Ok(Self {
            supabase_url: env::var("SUPABASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.supabase_url),
            supabase_anon_key: env::var("SUPABASE_ANON_KEY").unwrap_or(defaults.supabase_anon_key),
            table: env::var("VILLA_TABLE").unwrap_or(defaults.table),
            backend,
            request_timeout,
            operator_email: env::var("VILLA_AGENT_EMAIL").ok(),
            operator_password: env::var("VILLA_AGENT_PASSWORD").ok(),
        })
    }

    /// Whether real Supabase credentials have been filled in
    pub fn is_configured(&self) -> bool {
        self.supabase_url != PLACEHOLDER_URL
            && self.supabase_url.starts_with("https")
            && self.supabase_anon_key != PLACEHOLDER_ANON_KEY
    }

    /// Instructions shown instead of the dashboard until `is_configured()`
    pub fn setup_instructions(&self) -> String {
        format!(
            "Supabase is not configured.\n\
             1. Create a project at https://supabase.com/ and open Project Settings > API.\n\
             2. Set SUPABASE_URL and SUPABASE_ANON_KEY (in the environment or a .env file).\n\
             3. Create a table named '{}' with columns:\n\
             \x20  id bigint identity primary key, created_at timestamptz default now(),\n\
             \x20  name text, description text, facilities text[], price numeric,\n\
             \x20  commission numeric, google_maps_link text, photo_link text,\n\
             \x20  owner_phone text, is_available boolean default true, marketing_caption text\n\
             4. Row Level Security is on by default: add a policy granting the\n\
             \x20  signed-in operator access to the table.",
            self.table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_not_configured() {
        assert!(!Config::default().is_configured());
    }

    #[test]
    fn real_credentials_are_configured() {
        let config = Config {
            supabase_url: "https://abcd.supabase.co".to_string(),
            supabase_anon_key: "eyJhbGciOi".to_string(),
            ..Config::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn plain_http_url_is_not_configured() {
        let config = Config {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "eyJhbGciOi".to_string(),
            ..Config::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn setup_instructions_name_the_table() {
        let config = Config {
            table: "rentals".to_string(),
            ..Config::default()
        };
        assert!(config.setup_instructions().contains("'rentals'"));
    }
}
