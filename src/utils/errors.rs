//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del cliente y su
//! conversión a mensajes visibles en pantalla.

use chrono::{DateTime, Utc};
use http::StatusCode;
use thiserror::Error;

/// Errores de decodificación/validación del token de sesión
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired at {expired_at}")]
    ExpiredToken { expired_at: DateTime<Utc> },
}

/// Errores principales del cliente
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend responded {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidField { field: &'static str, value: String },

    #[error("Session error: {0}")]
    Session(#[from] AuthError),

    #[error("Session store error: {0}")]
    Store(String),

    #[error("An editor is already open")]
    EditorOpen,

    #[error("No editor is open")]
    NoEditor,
}

impl ClientError {
    /// Mensaje corto para el banner de error de la pantalla
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http(e) if e.is_timeout() => {
                "The server took too long to respond".to_string()
            }
            ClientError::Http(_) => "Could not reach the server".to_string(),
            ClientError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED => {
                "Your session is no longer valid".to_string()
            }
            ClientError::Status { status, .. } => {
                format!("The server rejected the request ({})", status.as_u16())
            }
            ClientError::Decode(_) => "The server sent an unexpected response".to_string(),
            ClientError::Validation(errors) => {
                let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
                fields.sort_unstable();
                format!("Please fill in: {}", fields.join(", "))
            }
            ClientError::InvalidField { field, .. } => format!("Invalid value in {}", field),
            ClientError::Session(_) => "Please log in again".to_string(),
            ClientError::Store(_) => "Could not access the saved session".to_string(),
            ClientError::EditorOpen => "Close the open form first".to_string(),
            ClientError::NoEditor => "No form is open".to_string(),
        }
    }
}

/// Errores de configuración del entorno
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a valid number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

/// Resultado tipado para operaciones que pueden fallar
pub type ClientResult<T> = Result<T, ClientError>;

/// Función helper para crear errores de campo inválido
pub fn invalid_field(field: &'static str, value: &str) -> ClientError {
    ClientError::InvalidField {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    #[test]
    fn test_validation_message_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("customer_name", ValidationError::new("length"));
        errors.add("chassis_no", ValidationError::new("length"));

        let message = ClientError::Validation(errors).user_message();
        assert_eq!(message, "Please fill in: chassis_no, customer_name");
    }

    #[test]
    fn test_invalid_field_message_is_neutral() {
        assert_eq!(invalid_field("job_date", "31/02").user_message(), "Invalid value in job_date");
        assert_eq!(invalid_field("id", "").user_message(), "Invalid value in id");
    }

    #[test]
    fn test_status_message() {
        let err = ClientError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        assert_eq!(err.user_message(), "The server rejected the request (500)");
    }
}
