//! Services module
//!
//! Lógica de sesión y permisos que comparten todas las pantallas.

pub mod session_gate;

pub use session_gate::*;
