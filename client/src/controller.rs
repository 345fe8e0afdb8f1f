//! FILENAME: client/src/controller.rs
//! PURPOSE: Drives the engine lifecycle against a remote collection.
//! CONTEXT: Owns the engine state, the session and the transport. Every
//! operation takes `&mut self`, so fetches, saves and deletes are strictly
//! serialized per instance; a stale response can never overwrite a newer
//! one. The busy flag additionally ignores mutating calls issued while an
//! operation is in flight.

use crate::api::CollectionApi;
use crate::error::ApiError;
use crate::session::Session;
use engine::value::is_empty_value;
use engine::{EngineState, EntitySchema};
use serde_json::Value;

pub struct EntityController<A: CollectionApi> {
    pub state: EngineState,
    pub session: Session,
    /// Set when the server rejected our credentials; the host application
    /// should re-authenticate and rebuild the controller.
    pub needs_reauth: bool,
    api: A,
}

impl<A: CollectionApi> EntityController<A> {
    pub fn new(schema: EntitySchema, api: A, session: Session) -> Self {
        EntityController {
            state: EngineState::new(schema),
            session,
            needs_reauth: false,
            api,
        }
    }

    pub fn api_ref(&self) -> &A {
        &self.api
    }

    // ========================================================================
    // FETCH
    // ========================================================================

    /// Loads the collection page. On failure the page is cleared rather
    /// than left stale, and the error message is surfaced.
    pub async fn fetch_all(&mut self) {
        if self.state.loading {
            return;
        }
        self.state.loading = true;
        self.refetch().await;
        self.state.loading = false;
    }

    async fn refetch(&mut self) -> bool {
        let endpoint = self.state.schema.endpoint.clone();
        let limit = self.state.schema.page_size;
        match self.api.list(&endpoint, limit).await {
            Ok(records) => {
                log::debug!("fetched {} records from {}", records.len(), endpoint);
                self.state.set_records(records);
                true
            }
            Err(err) => {
                self.state.set_records(Vec::new());
                self.record_error(err);
                false
            }
        }
    }

    // ========================================================================
    // SAVE
    // ========================================================================

    /// Submits the form: create when no record is being edited, update
    /// otherwise. On success the page is refetched and the form closes;
    /// on failure the form stays open with the draft intact.
    pub async fn save(&mut self) {
        if self.state.loading || !self.state.form_open {
            return;
        }
        if let Some(label) = self.first_missing_required() {
            self.state.last_error = Some(format!("{} is required", label));
            return;
        }

        let payload = self.state.build_payload();
        let endpoint = self.state.schema.endpoint.clone();
        self.state.loading = true;
        self.state.last_error = None;
        self.state.last_success = None;

        let result = match self.state.editing_id() {
            Some(id) => self.api.update(&endpoint, id, &payload).await.map(|_| "Updated"),
            None => self.api.create(&endpoint, &payload).await.map(|_| "Created"),
        };

        match result {
            Ok(message) => {
                self.refetch().await;
                self.state.close_form();
                self.state.last_success = Some(message.to_string());
            }
            Err(err) => self.record_error(err),
        }
        self.state.loading = false;
    }

    /// Label of the first required, visible field left empty, if any.
    fn first_missing_required(&self) -> Option<String> {
        self.state
            .visible_fields()
            .into_iter()
            .filter(|field| field.required)
            .find(|field| {
                self.state
                    .form_values
                    .get(&field.key)
                    .map(is_empty_value)
                    .unwrap_or(true)
            })
            .map(|field| field.label.clone())
    }

    // ========================================================================
    // DELETE
    // ========================================================================

    /// Deletes the record the confirmation dialog is holding. The dialog
    /// only closes on success.
    pub async fn confirm_delete(&mut self) {
        if self.state.loading || !self.state.delete_open {
            return;
        }
        let id = match self
            .state
            .delete_target
            .as_ref()
            .and_then(|record| record.get("id"))
            .and_then(Value::as_i64)
        {
            Some(id) => id,
            None => {
                self.state.cancel_delete();
                return;
            }
        };
        let endpoint = self.state.schema.endpoint.clone();
        self.state.loading = true;
        self.state.last_error = None;
        self.state.last_success = None;

        match self.api.delete(&endpoint, id).await {
            Ok(()) => {
                self.refetch().await;
                self.state.cancel_delete();
                self.state.last_success = Some("Deleted".to_string());
            }
            Err(err) => self.record_error(err),
        }
        self.state.loading = false;
    }

    // ========================================================================
    // ERRORS
    // ========================================================================

    fn record_error(&mut self, err: ApiError) {
        if err.is_auth() {
            self.needs_reauth = true;
        }
        log::warn!("{}: {}", self.state.schema.endpoint, err);
        self.state.last_error = Some(err.to_string());
    }
}
