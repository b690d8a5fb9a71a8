pub mod crud_controller;

pub use crud_controller::{CrudController, Editor, EditorMode, ListTicket};
