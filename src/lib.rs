//! Back-office de concesionario (e-rickshaw, baterías, repuestos)
//!
//! Núcleo cliente del back-office: gate de sesión/permisos, controlador CRUD
//! genérico por entidad y cálculo de totales derivados de la job card.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use controllers::crud_controller::CrudController;
pub use services::session_gate::{GateDecision, SessionGate};
pub use utils::errors::{AuthError, ClientError, ClientResult};
