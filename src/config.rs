use std::{env, fs::read_to_string};

use thiserror::Error;
use tracing::info;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE: &str = "SaveGas";
const DEFAULT_HF_API_URL: &str = "https://api-inference.huggingface.co/models";
const DEFAULT_HF_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read credentials file {path}: {source}")]
    Credentials {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone)]
pub struct StoreConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Clone)]
pub struct InferenceConfig {
    pub api_url: String,
    pub model: String,
    pub api_token: String,
}

impl InferenceConfig {
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), self.model)
    }
}

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub store: StoreConfig,
    pub inference: InferenceConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match var("PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| {
                ConfigError::Invalid {
                    key: "PORT",
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => {
                info!("PORT not set, using default: {DEFAULT_PORT}");
                DEFAULT_PORT
            }
        };

        let uri = match var("MONGODB_CREDENTIALS_PATH") {
            Some(path) => read_credentials(path)?,
            None => var("MONGODB_URI").ok_or(ConfigError::Missing("MONGODB_URI"))?,
        };
        let store = StoreConfig {
            uri,
            database: var("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_owned()),
        };

        let inference = InferenceConfig {
            api_url: var("HF_API_URL").unwrap_or_else(|| DEFAULT_HF_API_URL.to_owned()),
            model: var("HF_MODEL").unwrap_or_else(|| DEFAULT_HF_MODEL.to_owned()),
            api_token: var("HF_API_TOKEN").ok_or(ConfigError::Missing("HF_API_TOKEN"))?,
        };

        Ok(Self {
            host,
            port,
            cors_origin: var("CORS_ALLOWED_ORIGIN"),
            store,
            inference,
        })
    }
}

fn read_credentials(path: String) -> Result<String, ConfigError> {
    let uri = read_to_string(&path)
        .map_err(|source| ConfigError::Credentials {
            path: path.clone(),
            source,
        })?
        .trim()
        .to_owned();

    if uri.is_empty() {
        return Err(ConfigError::Invalid {
            key: "MONGODB_CREDENTIALS_PATH",
            value: path,
            reason: "file is empty".to_owned(),
        });
    }
    Ok(uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_fill_optional_values() {
        let config = Config::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("HF_API_TOKEN", "hf_token"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origin, None);
        assert_eq!(config.store.database, "SaveGas");
        assert_eq!(
            config.inference.endpoint(),
            "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2"
        );
    }

    #[test]
    fn token_is_required() {
        let err = Config::from_lookup(lookup(&[
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("HF_API_TOKEN", "   "),
        ]))
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::Missing("HF_API_TOKEN")));
    }

    #[test]
    fn store_uri_is_required() {
        let err = Config::from_lookup(lookup(&[("HF_API_TOKEN", "hf_token")]))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::Missing("MONGODB_URI")));
    }

    #[test]
    fn unreadable_credentials_file_is_reported() {
        let err = Config::from_lookup(lookup(&[
            ("MONGODB_CREDENTIALS_PATH", "/nonexistent/savegas/credentials"),
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("HF_API_TOKEN", "hf_token"),
        ]))
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::Credentials { .. }));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("PORT", "eighty"),
            ("MONGODB_URI", "mongodb://localhost:27017"),
            ("HF_API_TOKEN", "hf_token"),
        ]))
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
