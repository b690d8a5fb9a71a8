//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: URL del backend,
//! archivo de sesión, timeout HTTP y secreto opcional del JWT.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::errors::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_SESSION_FILE: &str = ".backoffice-session.json";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub http_timeout_secs: u64,
    /// Si está presente, la firma del token se verifica (HS256)
    pub jwt_secret: Option<String>,
    pub log_level: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            api_base_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            jwt_secret: None,
            log_level: "info".to_string(),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde variables de entorno (con valores por defecto)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables inyectable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let http_timeout_secs = match non_empty("BACKOFFICE_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber {
                name: "BACKOFFICE_HTTP_TIMEOUT_SECS",
                value: raw,
            })?,
            None => defaults.http_timeout_secs,
        };

        Ok(Self {
            environment: non_empty("ENVIRONMENT").unwrap_or(defaults.environment),
            api_base_url: non_empty("BACKOFFICE_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            session_file: non_empty("BACKOFFICE_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            http_timeout_secs,
            jwt_secret: non_empty("BACKOFFICE_JWT_SECRET"),
            log_level: non_empty("BACKOFFICE_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
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
    fn test_defaults_when_unset() {
        let config = EnvironmentConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert!(config.jwt_secret.is_none());
        assert!(config.is_development());
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = EnvironmentConfig::from_lookup(lookup(&[
            ("BACKOFFICE_API_URL", "https://dealer.example.com/api/"),
            ("BACKOFFICE_HTTP_TIMEOUT_SECS", "5"),
            ("BACKOFFICE_JWT_SECRET", "s3cret"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://dealer.example.com/api");
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.jwt_secret.as_deref(), Some("s3cret"));
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_timeout() {
        let result = EnvironmentConfig::from_lookup(lookup(&[("BACKOFFICE_HTTP_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(ConfigError::InvalidNumber { .. })));
    }
}
