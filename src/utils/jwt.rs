//! Utilidades JWT del lado cliente
//!
//! El cliente no emite tokens: sólo lee los claims del token que entregó el
//! login. Sin secreto configurado el payload se decodifica sin verificar la
//! firma; con secreto se verifica HS256 con `jsonwebtoken`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::collections::HashSet;

use crate::models::auth::JwtClaims;
use crate::utils::errors::AuthError;

/// Validar formato de token (básico)
pub fn validate_token_format(token: &str) -> Result<(), AuthError> {
    if token.trim().is_empty() {
        return Err(AuthError::InvalidToken("token is empty".to_string()));
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts[..2].iter().any(|part| part.is_empty()) {
        return Err(AuthError::InvalidToken(
            "token must have three dot-separated parts".to_string(),
        ));
    }

    Ok(())
}

/// Decodificar los claims del token
///
/// La expiración no se comprueba aquí: el gate la evalúa con su propio reloj.
pub fn decode_claims(token: &str, secret: Option<&str>) -> Result<JwtClaims, AuthError> {
    let token = token.trim();
    validate_token_format(token)?;

    match secret {
        Some(secret) => verify_claims(token, secret),
        None => decode_unverified(token),
    }
}

fn verify_claims(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    decode::<JwtClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(format!("signature check failed: {}", e)))
}

fn decode_unverified(token: &str) -> Result<JwtClaims, AuthError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthError::InvalidToken("missing payload".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::InvalidToken(format!("payload is not base64url: {}", e)))?;

    serde_json::from_slice::<JwtClaims>(&bytes)
        .map_err(|e| AuthError::InvalidToken(format!("payload is not a claims object: {}", e)))
}
