//! Cliente HTTP para el backend REST del back-office
//!
//! Todas las pantallas hablan con un único host fijo. Los recursos son rutas
//! relativas (`/rickshaw/rcbook`, `/spares/jobcard`, ...) sobre las que se
//! usan los verbos GET/POST/PUT/DELETE con cuerpos JSON.

use async_trait::async_trait;
use http::Method;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::utils::errors::{ClientError, ClientResult};

/// Transporte REST usado por los controladores
///
/// Permite sustituir el backend real por uno en memoria en los tests.
#[async_trait]
pub trait RestTransport: Send + Sync {
    /// Enviar una petición y devolver el cuerpo JSON (`Value::Null` si vacío)
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> ClientResult<Value>;
}

/// Cliente HTTP contra el backend real
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Crear nuevo cliente HTTP con timeout configurable
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl RestTransport for ApiClient {
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> ClientResult<Value> {
        let url = self.url(path);
        debug!("🌐 {} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!("❌ {} {} respondió {}", method, url, status);
            return Err(ClientError::Status { status, body: text });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        // create/update pueden responder texto plano; el cliente lo ignora
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}

/// Ruta `{resource}/{id}` con el id codificado
pub fn item_path(resource: &str, id: &str) -> String {
    format!(
        "{}/{}",
        resource.trim_end_matches('/'),
        urlencoding::encode(id)
    )
}

/// Extraer la lista de un cuerpo de respuesta
///
/// Acepta un array JSON o un sobre `{ "data": [...] }`.
pub fn list_body(body: Value) -> ClientResult<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ClientError::Decode(serde::de::Error::custom(
                "expected a JSON array of records",
            ))),
        },
        Value::Null => Ok(Vec::new()),
        _ => Err(ClientError::Decode(serde::de::Error::custom(
            "expected a JSON array of records",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_path_encodes_id() {
        assert_eq!(item_path("/rickshaw/rcbook", "665f1c"), "/rickshaw/rcbook/665f1c");
        assert_eq!(item_path("/spares/jobcard/", "a b/c"), "/spares/jobcard/a%20b%2Fc");
    }

    #[test]
    fn test_url_join() {
        let client = ApiClient::new("http://localhost:5000/api/", Duration::from_secs(1), None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url("/battery/sales"), "http://localhost:5000/api/battery/sales");
    }

    #[test]
    fn test_list_body_shapes() {
        assert_eq!(list_body(json!([{"a": 1}])).unwrap().len(), 1);
        assert_eq!(list_body(json!({"data": [{"a": 1}, {"a": 2}]})).unwrap().len(), 2);
        assert!(list_body(Value::Null).unwrap().is_empty());
        assert!(list_body(json!({"message": "nope"})).is_err());
        assert!(list_body(json!("text")).is_err());
    }
}
