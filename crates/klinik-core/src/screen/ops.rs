//! Type-erased list screen, for front ends that pick the entity at runtime.

use serde::Serialize;

use super::{
    Draft, Entity, EntityKind, FieldKind, FormResult, ListScreen, LoadState,
    ReferenceOption, ScreenEffect,
};
use crate::context::AppContext;
use crate::models::{Appointment, Doctor, EntityId, MedicalRecord, Patient, Prescription};

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub id: EntityId,
    pub code: String,
    pub cells: Vec<String>,
}

/// One form field with its current value and, for references, its choices.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: String,
    pub options: Vec<ReferenceOption>,
}

/// Operations of [`ListScreen`] without the entity type parameter.
pub trait ScreenOps {
    fn kind(&self) -> EntityKind;
    fn columns(&self) -> &'static [&'static str];
    fn state(&self) -> &LoadState;
    fn mount(&mut self, ctx: &AppContext) -> ScreenEffect;

    fn set_search(&mut self, term: &str);
    fn visible_rows(&self) -> Vec<RowView>;
    fn row_count(&self) -> usize;

    /// Fields of the open form, or of a blank one when none is open.
    fn fields(&self) -> Vec<FieldView>;
    fn open_create(&mut self);
    fn open_edit(&mut self, id: EntityId) -> FormResult<()>;
    fn set_form_field(&mut self, field: &str, value: &str) -> FormResult<()>;
    fn submit_form(&mut self, ctx: &AppContext) -> ScreenEffect;
    fn is_form_open(&self) -> bool;
    fn form_error(&self) -> Option<String>;
    fn cancel_form(&mut self);

    /// Open the confirmation and return its prompt.
    fn request_delete(&mut self, id: EntityId) -> FormResult<String>;
    fn is_delete_pending(&self) -> bool;
    fn confirm_delete(&mut self, ctx: &AppContext) -> ScreenEffect;
    fn cancel_delete(&mut self);
    fn take_alert(&mut self) -> Option<String>;
}

impl<E: Entity> ScreenOps for ListScreen<E> {
    fn kind(&self) -> EntityKind {
        E::KIND
    }

    fn columns(&self) -> &'static [&'static str] {
        E::COLUMNS
    }

    fn state(&self) -> &LoadState {
        ListScreen::state(self)
    }

    fn mount(&mut self, ctx: &AppContext) -> ScreenEffect {
        ListScreen::mount(self, ctx)
    }

    fn set_search(&mut self, term: &str) {
        ListScreen::set_search(self, term)
    }

    fn visible_rows(&self) -> Vec<RowView> {
        self.visible()
            .into_iter()
            .map(|row| RowView {
                id: row.id(),
                code: row.code(),
                cells: row.cells(),
            })
            .collect()
    }

    fn row_count(&self) -> usize {
        self.items().len()
    }

    fn fields(&self) -> Vec<FieldView> {
        let blank;
        let draft = match self.form() {
            Some(form) => &form.draft,
            None => {
                blank = <E::Draft as Default>::default();
                &blank
            }
        };

        <E::Draft as Draft>::FIELDS
            .iter()
            .map(|spec| FieldView {
                name: spec.name,
                label: spec.label,
                kind: spec.kind,
                required: spec.required,
                value: draft.get(spec.name).unwrap_or_default(),
                options: match spec.kind {
                    FieldKind::Reference(kind) => self.options(kind).to_vec(),
                    _ => Vec::new(),
                },
            })
            .collect()
    }

    fn open_create(&mut self) {
        ListScreen::open_create(self)
    }

    fn open_edit(&mut self, id: EntityId) -> FormResult<()> {
        ListScreen::open_edit(self, id)
    }

    fn set_form_field(&mut self, field: &str, value: &str) -> FormResult<()> {
        ListScreen::set_form_field(self, field, value)
    }

    fn submit_form(&mut self, ctx: &AppContext) -> ScreenEffect {
        ListScreen::submit_form(self, ctx)
    }

    fn is_form_open(&self) -> bool {
        self.form().is_some()
    }

    fn form_error(&self) -> Option<String> {
        self.form().and_then(|f| f.error.clone())
    }

    fn cancel_form(&mut self) {
        ListScreen::cancel_form(self)
    }

    fn request_delete(&mut self, id: EntityId) -> FormResult<String> {
        ListScreen::request_delete(self, id)?;
        Ok(self
            .delete_confirmation()
            .map(|c| c.prompt())
            .unwrap_or_default())
    }

    fn is_delete_pending(&self) -> bool {
        self.delete_confirmation().is_some()
    }

    fn confirm_delete(&mut self, ctx: &AppContext) -> ScreenEffect {
        ListScreen::confirm_delete(self, ctx)
    }

    fn cancel_delete(&mut self) {
        ListScreen::cancel_delete(self)
    }

    fn take_alert(&mut self) -> Option<String> {
        ListScreen::take_alert(self)
    }
}

/// Fresh screen for `kind`.
pub fn screen_for(kind: EntityKind) -> Box<dyn ScreenOps + Send> {
    match kind {
        EntityKind::Patients => Box::new(ListScreen::<Patient>::new()),
        EntityKind::Doctors => Box::new(ListScreen::<Doctor>::new()),
        EntityKind::Appointments => Box::new(ListScreen::<Appointment>::new()),
        EntityKind::MedicalRecords => Box::new(ListScreen::<MedicalRecord>::new()),
        EntityKind::Prescriptions => Box::new(ListScreen::<Prescription>::new()),
    }
}
