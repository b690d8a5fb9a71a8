//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, decodificación
//! de JWT y conversión de campos de formulario.

pub mod errors;
pub mod forms;
pub mod jwt;
