//! Create/edit modal.

use serde_json::Value;

use super::{Draft, EntityKind, FormResult};
use crate::api::Method;
use crate::models::EntityId;

/// Whether the modal creates a record or edits one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EntityId),
}

/// Open form: the draft being edited plus the last submit error.
#[derive(Debug, Clone, PartialEq)]
pub struct FormModal<D: Draft> {
    pub kind: EntityKind,
    pub mode: FormMode,
    pub draft: D,
    pub error: Option<String>,
}

impl<D: Draft> FormModal<D> {
    pub fn create(kind: EntityKind) -> Self {
        Self {
            kind,
            mode: FormMode::Create,
            draft: D::default(),
            error: None,
        }
    }

    pub fn edit(kind: EntityKind, id: EntityId, draft: D) -> Self {
        Self {
            kind,
            mode: FormMode::Edit(id),
            draft,
            error: None,
        }
    }

    /// Heading, e.g. `Tambah Pasien` or `Edit Pasien`.
    pub fn title(&self) -> String {
        match self.mode {
            FormMode::Create => format!("Tambah {}", self.kind.title()),
            FormMode::Edit(_) => format!("Edit {}", self.kind.title()),
        }
    }

    pub fn set_field(&mut self, field: &str, value: &str) -> FormResult<()> {
        self.draft.set(field, value)
    }

    /// Method and path the submit goes to.
    pub fn endpoint(&self) -> (Method, String) {
        match self.mode {
            FormMode::Create => (Method::Post, self.kind.collection().to_string()),
            FormMode::Edit(id) => (Method::Put, self.kind.instance(id)),
        }
    }

    pub fn body(&self) -> serde_json::Result<Value> {
        serde_json::to_value(&self.draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DoctorDraft;

    #[test]
    fn test_create_posts_to_collection() {
        let form = FormModal::<DoctorDraft>::create(EntityKind::Doctors);
        assert_eq!(form.title(), "Tambah Dokter");
        assert_eq!(form.endpoint(), (Method::Post, "/doctors".to_string()));
    }

    #[test]
    fn test_edit_puts_to_instance() {
        let mut form = FormModal::edit(EntityKind::Doctors, 4, DoctorDraft::default());
        form.set_field("nama", "dr. Rina").unwrap();
        assert_eq!(form.title(), "Edit Dokter");
        assert_eq!(form.endpoint(), (Method::Put, "/doctors/4".to_string()));
        assert_eq!(form.body().unwrap()["nama"], "dr. Rina");
    }
}
