//! Generic entity list screen: load, search, create/edit modal, delete modal.

use tracing::{debug, info, warn};

use super::collection::{append, remove_by_id, replace_by_id};
use super::{
    filter, DeleteConfirmation, Draft, Entity, FormError, FormMode, FormModal, FormResult,
    ReferenceKind, ReferenceOption, ReferenceSet, Route,
};
use crate::api::{ApiClient, ApiError, ApiResult, Method};
use crate::context::AppContext;
use crate::messages;
use crate::models::EntityId;

/// Progress of the initial fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Navigation a screen operation asks the shell to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEffect {
    None,
    RedirectToLogin,
    Navigate(Route),
}

/// One entity's list screen. The collection is the client's copy of the
/// server table: replaced on load, patched after each successful mutation.
#[derive(Debug, Clone)]
pub struct ListScreen<E: Entity> {
    state: LoadState,
    items: Vec<E>,
    references: ReferenceSet,
    search: String,
    form: Option<FormModal<E::Draft>>,
    delete: Option<DeleteConfirmation<E>>,
    alert: Option<String>,
}

impl<E: Entity> Default for ListScreen<E> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            items: Vec::new(),
            references: ReferenceSet::new(),
            search: String::new(),
            form: None,
            delete: None,
            alert: None,
        }
    }
}

impl<E: Entity> ListScreen<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Screen-level error, if the last load failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Full collection, unfiltered.
    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn references(&self) -> &ReferenceSet {
        &self.references
    }

    pub fn options(&self, kind: ReferenceKind) -> &[ReferenceOption] {
        self.references.options(kind)
    }

    /// Fetch reference collections, then the entity collection.
    pub fn mount(&mut self, ctx: &AppContext) -> ScreenEffect {
        let Some(token) = ctx.bearer() else {
            self.state = LoadState::Failed(messages::MISSING_TOKEN.to_string());
            return ScreenEffect::RedirectToLogin;
        };

        self.state = LoadState::Loading;
        match self.load(&ctx.api, &token) {
            Ok((references, items)) => {
                debug!(kind = %E::KIND, rows = items.len(), "Screen loaded");
                self.references = references;
                self.items = items;
                self.state = LoadState::Loaded;
            }
            Err(message) => {
                warn!(kind = %E::KIND, "{}", message);
                self.state = LoadState::Failed(message);
            }
        }
        ScreenEffect::None
    }

    fn load(&self, api: &ApiClient, token: &str) -> Result<(ReferenceSet, Vec<E>), String> {
        let mut references = ReferenceSet::new();
        for kind in E::KIND.references() {
            let options = fetch_options(api, token, *kind)
                .map_err(|e| messages::reference_load_failed(kind.label(), e))?;
            references.insert(*kind, options);
        }

        let items = api
            .get_list(token, E::KIND.collection())
            .and_then(|raw| {
                raw.into_iter()
                    .map(|value| -> ApiResult<E> {
                        let wire: E::Wire = serde_json::from_value(value)?;
                        Ok(E::from_wire(wire, &references))
                    })
                    .collect::<ApiResult<Vec<E>>>()
            })
            .map_err(messages::load_failed)?;

        Ok((references, items))
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
    }

    /// Rows matching the current search, recomputed on every call.
    pub fn visible(&self) -> Vec<&E> {
        filter(&self.items, &self.search)
    }

    pub fn find(&self, id: EntityId) -> Option<&E> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn form(&self) -> Option<&FormModal<E::Draft>> {
        self.form.as_ref()
    }

    pub fn open_create(&mut self) {
        self.form = Some(FormModal::create(E::KIND));
    }

    pub fn open_edit(&mut self, id: EntityId) -> FormResult<()> {
        if !E::KIND.allows_update() {
            return Err(FormError::UpdateNotSupported(E::KIND.label()));
        }
        let row = self.find(id).ok_or(FormError::NotFound(id))?;
        self.form = Some(FormModal::edit(E::KIND, id, row.to_draft()));
        Ok(())
    }

    pub fn set_form_field(&mut self, field: &str, value: &str) -> FormResult<()> {
        let form = self.form.as_mut().ok_or(FormError::NotOpen)?;
        form.set_field(field, value)
    }

    /// Validate and send the form. Errors stay inside the open modal.
    pub fn submit_form(&mut self, ctx: &AppContext) -> ScreenEffect {
        let Some(form) = self.form.as_mut() else {
            return ScreenEffect::None;
        };
        let Some(token) = ctx.bearer() else {
            form.error = Some(messages::MISSING_TOKEN.to_string());
            return ScreenEffect::RedirectToLogin;
        };
        if let Err(e) = form.draft.validate() {
            form.error = Some(e.to_string());
            return ScreenEffect::None;
        }
        form.error = None;

        let (method, path) = form.endpoint();
        let saved = form.body().map_err(ApiError::from).and_then(|body| {
            let value = match method {
                Method::Put => ctx.api.put(&token, &path, body)?,
                _ => ctx.api.post(&token, &path, body)?,
            };
            Ok(serde_json::from_value::<E::Wire>(value)?)
        });

        match saved {
            Ok(wire) => {
                let row = E::from_saved(wire, &form.draft, &self.references);
                info!(kind = %E::KIND, id = row.id(), "Saved");
                match form.mode {
                    FormMode::Create => append(&mut self.items, row),
                    FormMode::Edit(_) => {
                        replace_by_id(&mut self.items, row);
                    }
                }
                self.form = None;
            }
            Err(e) => {
                warn!(kind = %E::KIND, "Save failed: {}", e);
                form.error = Some(messages::save_failed(E::KIND.label(), &e));
            }
        }
        ScreenEffect::None
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    pub fn delete_confirmation(&self) -> Option<&DeleteConfirmation<E>> {
        self.delete.as_ref()
    }

    pub fn request_delete(&mut self, id: EntityId) -> FormResult<()> {
        let row = self.find(id).ok_or(FormError::NotFound(id))?.clone();
        self.delete = Some(DeleteConfirmation::new(row));
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.delete = None;
    }

    /// Send the DELETE. Failure raises an alert and keeps the modal open.
    pub fn confirm_delete(&mut self, ctx: &AppContext) -> ScreenEffect {
        let Some(confirmation) = self.delete.as_ref() else {
            return ScreenEffect::None;
        };
        let Some(token) = ctx.bearer() else {
            self.state = LoadState::Failed(messages::MISSING_TOKEN.to_string());
            return ScreenEffect::RedirectToLogin;
        };

        let id = confirmation.target.id();
        match ctx.api.delete(&token, &confirmation.path()) {
            Ok(()) => {
                info!(kind = %E::KIND, id, "Deleted");
                remove_by_id(&mut self.items, id);
                self.delete = None;
            }
            Err(e) => {
                warn!(kind = %E::KIND, id, "Delete failed: {}", e);
                self.alert = Some(messages::delete_failed(E::KIND.label(), e));
            }
        }
        ScreenEffect::None
    }

    /// Pending blocking alert, cleared once taken.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }
}

fn fetch_options(
    api: &ApiClient,
    token: &str,
    kind: ReferenceKind,
) -> ApiResult<Vec<ReferenceOption>> {
    api.get_list(token, kind.collection())?
        .into_iter()
        .map(|value| -> ApiResult<ReferenceOption> { Ok(kind.option_from(value)?) })
        .collect()
}
