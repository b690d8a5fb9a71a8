//! Utilidades de formulario
//!
//! Conversión entre el texto de los inputs del formulario y los valores
//! tipados que se envían al backend.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;
use std::str::FromStr;

use crate::utils::errors::{invalid_field, ClientError};

/// Convertir texto a decimal; vacío o inválido cuenta como cero
pub fn decimal_or_zero(value: &str) -> Decimal {
    Decimal::from_str(value.trim()).unwrap_or(Decimal::ZERO)
}

/// Convertir texto a entero; vacío o inválido cuenta como cero
pub fn integer_or_zero(value: &str) -> i64 {
    let trimmed = value.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| {
            // "3.0" llega así desde inputs numéricos
            Decimal::from_str(trimmed)
                .ok()
                .filter(|d| d.fract().is_zero())
                .and_then(|d| i64::try_from(d).ok())
        })
        .unwrap_or(0)
}

/// Convertir texto a decimal; vacío es cero, texto no numérico es error
pub fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, ClientError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(trimmed).map_err(|_| invalid_field(field, value))
}

/// Convertir texto a entero; vacío es cero, texto no numérico es error
pub fn parse_integer(field: &'static str, value: &str) -> Result<i64, ClientError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<i64>().map_err(|_| invalid_field(field, value))
}

/// Fecha guardada (ISO) a valor de input date (YYYY-MM-DD)
pub fn date_input(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Valor de input date (YYYY-MM-DD) a timestamp completo a medianoche UTC
pub fn parse_date_input(
    field: &'static str,
    value: &str,
) -> Result<Option<DateTime<Utc>>, ClientError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| invalid_field(field, value))
}

/// Texto plano para un decimal en el formulario
pub fn decimal_text(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Serde para fechas opcionales del backend
///
/// Acepta RFC3339, fecha simple o `null`/`""`; serializa como ISO con
/// milisegundos y sufijo `Z`.
pub mod iso_date {
    use super::*;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => super::parse_date_input("date", text)
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Número JSON a decimal usando su representación textual (`12.5`, `1e3`)
fn number_to_decimal(number: &serde_json::Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Serde para importes del backend
///
/// Serializa como número JSON. Al leer acepta número, texto numérico,
/// `null` o `""` (cero): el backend guarda lo que se le envía.
pub mod lenient_decimal {
    use super::*;
    use serde::de::Error;

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::float::serialize(value, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Decimal::ZERO),
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    return Ok(Decimal::from(int));
                }
                if let Some(int) = number.as_u64() {
                    return Ok(Decimal::from(int));
                }
                number_to_decimal(&number)
                    .ok_or_else(|| D::Error::custom(format!("number out of range: {}", number)))
            }
            Value::String(text) if text.trim().is_empty() => Ok(Decimal::ZERO),
            Value::String(text) => Decimal::from_str(text.trim())
                .map_err(|_| D::Error::custom(format!("not a number: '{}'", text))),
            other => Err(D::Error::custom(format!("expected a number, got {}", other))),
        }
    }
}

/// Serde para cantidades enteras del backend
///
/// Acepta entero, flotante sin decimales (`2.0`), texto numérico, `null` o
/// `""` (cero).
pub mod lenient_integer {
    use super::*;
    use serde::de::Error;

    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let whole = |value: Decimal| -> Option<i64> {
            value
                .fract()
                .is_zero()
                .then(|| i64::try_from(value).ok())
                .flatten()
        };

        match Value::deserialize(deserializer)? {
            Value::Null => Ok(0),
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number_to_decimal(&number).and_then(whole))
                .ok_or_else(|| D::Error::custom(format!("not a whole number: {}", number))),
            Value::String(text) if text.trim().is_empty() => Ok(0),
            Value::String(text) => Decimal::from_str(text.trim())
                .ok()
                .and_then(whole)
                .ok_or_else(|| D::Error::custom(format!("not a whole number: '{}'", text))),
            other => Err(D::Error::custom(format!("expected a number, got {}", other))),
        }
    }
}
