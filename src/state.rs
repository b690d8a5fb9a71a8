//! Estado compartido de la aplicación
//!
//! La sesión persistida (token + flag de autenticado) vive detrás del trait
//! `SessionStore`; `AppState` se construye una sola vez al arrancar y se pasa
//! explícitamente a quien lo necesite.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::clients::api_client::ApiClient;
use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::{ClientError, ClientResult};

pub const TOKEN_KEY: &str = "token";
pub const AUTHENTICATED_KEY: &str = "isAuthenticated";

/// Valores persistidos entre ejecuciones, con sus nombres fijos
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(rename = "token", default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "isAuthenticated", default, skip_serializing_if = "Option::is_none")]
    pub is_authenticated: Option<String>,
}

impl StoredSession {
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            is_authenticated: Some("true".to_string()),
        }
    }
}

/// Almacenamiento de la sesión del cliente
pub trait SessionStore: Send + Sync {
    fn load(&self) -> ClientResult<StoredSession>;

    fn save(&self, session: &StoredSession) -> ClientResult<()>;

    /// Borrar token y flag juntos
    fn clear(&self) -> ClientResult<()>;
}

/// Sesión guardada en un archivo JSON
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> ClientResult<StoredSession> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(StoredSession::default()),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(session) => Ok(session),
                Err(e) => {
                    warn!("⚠️ Archivo de sesión corrupto en {}: {}", self.path.display(), e);
                    Ok(StoredSession::default())
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoredSession::default()),
            Err(e) => Err(ClientError::Store(format!("{}: {}", self.path.display(), e))),
        }
    }

    fn save(&self, session: &StoredSession) -> ClientResult<()> {
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)
            .map_err(|e| ClientError::Store(format!("{}: {}", self.path.display(), e)))?;
        debug!("💾 Sesión guardada en {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("🧹 Sesión eliminada ({})", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Store(format!("{}: {}", self.path.display(), e))),
        }
    }
}

/// Sesión en memoria (tests y ejecuciones efímeras)
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<StoredSession>,
}

impl MemorySessionStore {
    pub fn new(session: StoredSession) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(StoredSession::authenticated(token))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> ClientResult<StoredSession> {
        self.session
            .read()
            .map(|session| session.clone())
            .map_err(|_| ClientError::Store("session lock poisoned".to_string()))
    }

    fn save(&self, session: &StoredSession) -> ClientResult<()> {
        let mut guard = self
            .session
            .write()
            .map_err(|_| ClientError::Store("session lock poisoned".to_string()))?;
        *guard = session.clone();
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        self.save(&StoredSession::default())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub store: Arc<dyn SessionStore>,
    pub api: ApiClient,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let token = store.load()?.token;
        let api = ApiClient::new(&config.api_base_url, config.http_timeout(), token)?;
        Ok(Self { config, store, api })
    }

    /// Estado a partir de la configuración, con la sesión en archivo
    pub fn from_config(config: EnvironmentConfig) -> ClientResult<Self> {
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(config.session_file.clone()));
        Self::new(config, store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let path = std::env::temp_dir().join(format!("backoffice-session-{}.json", std::process::id()));
        let store = FileSessionStore::new(&path);

        assert_eq!(store.load().unwrap(), StoredSession::default());

        store.save(&StoredSession::authenticated("abc.def.ghi")).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"token\""));
        assert!(raw.contains("\"isAuthenticated\": \"true\""));
        assert_eq!(store.load().unwrap().token.as_deref(), Some("abc.def.ghi"));

        store.clear().unwrap();
        assert!(!path.exists());
        // borrar dos veces no es error
        store.clear().unwrap();
    }

    #[test]
    fn test_memory_store_clear_removes_both_values() {
        let store = MemorySessionStore::with_token("t.o.k");
        store.clear().unwrap();
        let session = store.load().unwrap();
        assert!(session.token.is_none());
        assert!(session.is_authenticated.is_none());
    }
}
