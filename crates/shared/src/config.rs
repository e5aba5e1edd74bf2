use std::env;
use thiserror::Error;

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/todolist";
pub const DEFAULT_DATABASE: &str = "todolist";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// API サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// ドキュメントストアの接続文字列
    pub mongodb_uri: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "PORT",
                    value,
                })?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            mongodb_uri: lookup("MONGODB_URI").unwrap_or_else(|| DEFAULT_MONGODB_URI.to_string()),
            port,
        })
    }
}

/// CLI クライアントの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API のベース URL（例: http://localhost:5000/api）
    pub api_base_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = lookup("TODO_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        ClientConfig { api_base_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.mongodb_uri, DEFAULT_MONGODB_URI);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn reads_port_and_uri() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("MONGODB_URI", "mongodb://db:27017/todos"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.mongodb_uri, "mongodb://db:27017/todos");
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = Config::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "PORT",
                value: "http".to_string()
            }
        );
    }

    #[test]
    fn client_base_url_drops_trailing_slash() {
        let config = ClientConfig::from_lookup(lookup(&[("TODO_API_URL", "http://x:1/api/")]));
        assert_eq!(config.api_base_url, "http://x:1/api");
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[])).api_base_url,
            DEFAULT_API_URL
        );
    }
}
