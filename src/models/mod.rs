//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que intercambia el cliente con
//! el backend REST y los borradores (drafts) de cada formulario.

pub mod attendance;
pub mod auth;
pub mod battery;
pub mod job_card;
pub mod rickshaw;
pub mod spares;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use validator::Validate;

use crate::utils::errors::ClientResult;

/// Entidad de negocio expuesta como recurso REST
///
/// Cada pantalla del back-office es una instancia del controlador CRUD
/// parametrizada por una implementación de este trait.
pub trait Entity: Send + Sync + 'static {
    /// Registro tal como lo devuelve y lo recibe el backend
    type Record: Serialize + DeserializeOwned + Clone + Debug + Send + Sync;
    /// Copia editable del registro, con los valores en texto del formulario
    type Draft: Default + Clone + Debug + Validate + Send + Sync;

    /// Ruta del recurso relativa a la URL base (p.ej. `/rickshaw/rcbook`)
    const RESOURCE: &'static str;
    const LABEL: &'static str;
    const COLUMNS: &'static [&'static str];

    fn record_id(record: &Self::Record) -> Option<&str>;

    fn created_at(record: &Self::Record) -> Option<DateTime<Utc>>;

    /// Campos sobre los que aplica la búsqueda de la pantalla
    fn search_fields(record: &Self::Record) -> Vec<&str>;

    /// Celdas de la fila de la tabla, en el orden de `COLUMNS`
    fn row(record: &Self::Record) -> Vec<String>;

    /// Registro guardado → borrador del formulario de edición
    fn to_draft(record: &Self::Record) -> Self::Draft;

    /// Borrador → registro completo que se envía en POST/PUT
    fn to_record(draft: &Self::Draft) -> ClientResult<Self::Record>;
}

/// Búsqueda en memoria, sin distinguir mayúsculas
///
/// Un término vacío devuelve todos los registros. Nunca modifica la lista.
pub fn filter_records<'a, E: Entity>(records: &'a [E::Record], term: &str) -> Vec<&'a E::Record> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| {
            E::search_fields(record)
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
