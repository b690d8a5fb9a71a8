//! Controlador CRUD genérico
//!
//! Una instancia por pantalla: mantiene la lista obtenida del backend, el
//! término de búsqueda y, como mucho, un editor modal con su borrador.
//! La lista nunca se modifica localmente: tras cada alta, edición o borrado
//! se vuelve a pedir entera.

use http::Method;
use serde_json::Value;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::clients::api_client::{item_path, list_body, RestTransport};
use crate::models::{filter_records, Entity};
use crate::utils::errors::{invalid_field, ClientError, ClientResult};

/// Modo del editor abierto
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit { id: String },
}

/// Editor modal con el borrador en curso
pub struct Editor<E: Entity> {
    pub mode: EditorMode,
    pub draft: E::Draft,
}

/// Generación de una petición de lista
///
/// Sólo se aplica la respuesta del ticket más reciente.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTicket(u64);

pub struct CrudController<E: Entity> {
    transport: Arc<dyn RestTransport>,
    records: Vec<E::Record>,
    search_term: String,
    editor: Option<Editor<E>>,
    last_error: Option<String>,
    latest_ticket: u64,
    loading: bool,
    mounted: bool,
}

impl<E: Entity> CrudController<E> {
    pub fn new(transport: Arc<dyn RestTransport>) -> Self {
        Self {
            transport,
            records: Vec::new(),
            search_term: String::new(),
            editor: None,
            last_error: None,
            latest_ticket: 0,
            loading: false,
            mounted: true,
        }
    }

    pub fn resource(&self) -> &'static str {
        E::RESOURCE
    }

    pub fn records(&self) -> &[E::Record] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mensaje de error visible de la última operación fallida
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // -----------------------------------------------------------------------
    // Búsqueda
    // -----------------------------------------------------------------------

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Filtrar la lista actual con un término cualquiera
    pub fn search(&self, term: &str) -> Vec<&E::Record> {
        filter_records::<E>(&self.records, term)
    }

    /// Registros visibles con el término de búsqueda actual
    pub fn visible(&self) -> Vec<&E::Record> {
        self.search(&self.search_term)
    }

    /// Registros visibles, los más recientes primero
    pub fn sorted_recent(&self) -> Vec<&E::Record> {
        let mut visible = self.visible();
        // sort estable: sin fecha van al final en su orden original
        visible.sort_by_key(|record| match E::created_at(record) {
            Some(created) => (0, Reverse(created.timestamp_millis())),
            None => (1, Reverse(0)),
        });
        visible
    }

    // -----------------------------------------------------------------------
    // Lista
    // -----------------------------------------------------------------------

    /// Reservar un ticket para una nueva petición de lista
    pub fn begin_list(&mut self) -> ListTicket {
        self.latest_ticket += 1;
        self.loading = true;
        ListTicket(self.latest_ticket)
    }

    /// Aplicar la respuesta de una petición de lista
    ///
    /// Devuelve `Ok(false)` si la respuesta estaba obsoleta y se descartó.
    /// En caso de error la lista anterior se conserva.
    pub fn finish_list(&mut self, ticket: ListTicket, result: ClientResult<Value>) -> ClientResult<bool> {
        if !self.mounted || ticket.0 != self.latest_ticket {
            debug!(
                "🗑️ Respuesta obsoleta de {} descartada (ticket {}, último {})",
                E::RESOURCE,
                ticket.0,
                self.latest_ticket
            );
            return Ok(false);
        }
        self.loading = false;

        let parsed = result.and_then(|body| Self::parse_rows(list_body(body)?));

        match parsed {
            Ok(records) => {
                info!("📋 {}: {} registros", E::LABEL, records.len());
                self.records = records;
                self.last_error = None;
                Ok(true)
            }
            Err(e) => {
                error!("❌ Error cargando {}: {}", E::LABEL, e);
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Convertir cada fila por separado
    ///
    /// Una fila ilegible se descarta con un aviso; sólo falla si no se pudo
    /// leer ninguna de una lista no vacía.
    fn parse_rows(items: Vec<Value>) -> ClientResult<Vec<E::Record>> {
        let total = items.len();
        let mut records = Vec::with_capacity(total);
        let mut first_error = None;

        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<E::Record>(item) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("⚠️ {}: fila {} ignorada: {}", E::LABEL, index, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) if records.is_empty() => Err(e.into()),
            _ => Ok(records),
        }
    }

    /// GET `{resource}` y reemplazar la lista
    pub async fn list(&mut self) -> ClientResult<()> {
        let ticket = self.begin_list();
        let result = self.transport.send(Method::GET, E::RESOURCE, None).await;
        self.finish_list(ticket, result).map(|_| ())
    }

    /// La pantalla se cerró: las respuestas pendientes se descartan
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.loading = false;
    }

    // -----------------------------------------------------------------------
    // Editor
    // -----------------------------------------------------------------------

    pub fn editor(&self) -> Option<&Editor<E>> {
        self.editor.as_ref()
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor.is_some()
    }

    pub fn draft(&self) -> Option<&E::Draft> {
        self.editor.as_ref().map(|editor| &editor.draft)
    }

    pub fn draft_mut(&mut self) -> Option<&mut E::Draft> {
        self.editor.as_mut().map(|editor| &mut editor.draft)
    }

    /// Abrir el editor con un borrador vacío
    pub fn open_create(&mut self) -> ClientResult<()> {
        self.ensure_no_editor()?;
        self.editor = Some(Editor {
            mode: EditorMode::Create,
            draft: E::Draft::default(),
        });
        Ok(())
    }

    /// Abrir el editor con una copia del registro
    pub fn open_edit(&mut self, record: &E::Record) -> ClientResult<()> {
        self.ensure_no_editor()?;
        let id = E::record_id(record)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| invalid_field("id", ""))?
            .to_string();
        self.editor = Some(Editor {
            mode: EditorMode::Edit { id },
            draft: E::to_draft(record),
        });
        Ok(())
    }

    /// Cerrar el editor descartando el borrador
    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    /// Validar y enviar el borrador
    ///
    /// Edición → PUT `{resource}/{id}` con el registro completo; alta →
    /// POST `{resource}`. Si falla, el editor sigue abierto con el borrador
    /// intacto.
    pub async fn submit(&mut self) -> ClientResult<()> {
        let (method, path, body) = {
            let editor = self.editor.as_ref().ok_or(ClientError::NoEditor)?;
            match Self::prepare(editor) {
                Ok(prepared) => prepared,
                Err(e) => return Err(self.fail("validando", e)),
            }
        };

        if let Err(e) = self.transport.send(method.clone(), &path, Some(body)).await {
            return Err(self.fail("guardando", e));
        }

        info!("✅ {} guardado ({} {})", E::LABEL, method, path);
        self.editor = None;
        self.last_error = None;

        // el alta ya quedó guardada; un fallo al recargar sólo se muestra
        if let Err(e) = self.list().await {
            warn!("⚠️ {} guardado pero la lista no se pudo recargar: {}", E::LABEL, e);
        }
        Ok(())
    }

    fn prepare(editor: &Editor<E>) -> ClientResult<(Method, String, Value)> {
        editor.draft.validate()?;
        let record = E::to_record(&editor.draft)?;
        let body = serde_json::to_value(&record)?;

        Ok(match &editor.mode {
            EditorMode::Create => (Method::POST, E::RESOURCE.to_string(), body),
            EditorMode::Edit { id } => (Method::PUT, item_path(E::RESOURCE, id), body),
        })
    }

    // -----------------------------------------------------------------------
    // Borrado
    // -----------------------------------------------------------------------

    /// DELETE `{resource}/{id}` previa confirmación
    ///
    /// Devuelve `Ok(false)` si el usuario no confirma; en ese caso no se
    /// envía ninguna petición.
    pub async fn remove<F>(&mut self, id: &str, confirm: F) -> ClientResult<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        self.ensure_no_editor()?;

        let prompt = format!("Are you sure you want to delete this {}?", E::LABEL);
        if !confirm(&prompt) {
            debug!("🚫 Borrado de {} {} cancelado", E::LABEL, id);
            return Ok(false);
        }

        let path = item_path(E::RESOURCE, id);
        if let Err(e) = self.transport.send(Method::DELETE, &path, None).await {
            return Err(self.fail("eliminando", e));
        }

        info!("🗑️ {} {} eliminado", E::LABEL, id);
        self.last_error = None;
        if let Err(e) = self.list().await {
            warn!("⚠️ {} eliminado pero la lista no se pudo recargar: {}", E::LABEL, e);
        }
        Ok(true)
    }

    fn ensure_no_editor(&self) -> ClientResult<()> {
        if self.editor.is_some() {
            return Err(ClientError::EditorOpen);
        }
        Ok(())
    }

    fn fail(&mut self, action: &str, e: ClientError) -> ClientError {
        error!("❌ Error {} {}: {}", action, E::LABEL, e);
        self.last_error = Some(e.user_message());
        e
    }
}
