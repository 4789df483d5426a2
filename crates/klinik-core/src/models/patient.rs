//! Patient models.

use serde::{Deserialize, Serialize};

use super::{de_id, de_string, EntityId};
use crate::screen::{Draft, Entity, EntityKind, FieldKind, FieldSpec, FormResult, ReferenceSet};

/// Patient as the server sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct PatientWire {
    #[serde(deserialize_with = "de_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "de_string")]
    pub nama: String,
    #[serde(default, deserialize_with = "de_string")]
    pub tanggal_lahir: String,
    #[serde(default, deserialize_with = "de_string")]
    pub kontak: String,
}

/// A patient row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patient {
    pub id: EntityId,
    pub name: String,
    /// ISO date
    pub birth_date: String,
    pub contact: String,
}

/// Patient form, serialized with the server's field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatientDraft {
    pub nama: String,
    pub tanggal_lahir: String,
    pub kontak: String,
}

impl Draft for PatientDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("nama", "Nama", FieldKind::Text),
        FieldSpec::required("tanggal_lahir", "Tanggal Lahir", FieldKind::Date),
        FieldSpec::required("kontak", "Kontak", FieldKind::Text),
    ];

    fn get(&self, field: &str) -> Option<String> {
        match field {
            "nama" => Some(self.nama.clone()),
            "tanggal_lahir" => Some(self.tanggal_lahir.clone()),
            "kontak" => Some(self.kontak.clone()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: &str) -> FormResult<()> {
        let spec = Self::spec(field)?;
        match spec.name {
            "nama" => self.nama = value.to_string(),
            "tanggal_lahir" => self.tanggal_lahir = value.to_string(),
            _ => self.kontak = value.to_string(),
        }
        Ok(())
    }
}

impl Entity for Patient {
    type Wire = PatientWire;
    type Draft = PatientDraft;

    const KIND: EntityKind = EntityKind::Patients;
    const COLUMNS: &'static [&'static str] = &["ID", "Nama", "Tanggal Lahir", "Kontak"];

    fn from_wire(wire: PatientWire, _refs: &ReferenceSet) -> Self {
        Self {
            id: wire.id,
            name: wire.nama,
            birth_date: wire.tanggal_lahir,
            contact: wire.kontak,
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> PatientDraft {
        PatientDraft {
            nama: self.name.clone(),
            tanggal_lahir: self.birth_date.clone(),
            kontak: self.contact.clone(),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.code(),
            self.name.clone(),
            self.birth_date.clone(),
            self.contact.clone(),
        ]
    }

    fn delete_prompt(&self) -> String {
        format!("Apakah Anda yakin ingin menghapus data pasien {}?", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_wire() {
        let wire: PatientWire = serde_json::from_value(json!({
            "id": 1,
            "nama": "Budi",
            "tanggal_lahir": "1990-04-01",
            "kontak": "0812"
        }))
        .unwrap();

        let patient = Patient::from_wire(wire, &ReferenceSet::new());
        assert_eq!(patient.name, "Budi");
        assert_eq!(patient.birth_date, "1990-04-01");
        assert_eq!(patient.cells(), vec!["1", "Budi", "1990-04-01", "0812"]);
    }

    #[test]
    fn test_draft_uses_server_names() {
        let mut draft = PatientDraft::default();
        draft.set("nama", "Budi").unwrap();
        draft.set("tanggal_lahir", "1990-04-01").unwrap();
        draft.set("kontak", "0812").unwrap();

        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            body,
            json!({"nama": "Budi", "tanggal_lahir": "1990-04-01", "kontak": "0812"})
        );
    }

    #[test]
    fn test_required_fields() {
        let mut draft = PatientDraft::default();
        draft.set("nama", "Budi").unwrap();
        assert_eq!(
            draft.validate(),
            Err(crate::screen::FormError::Required("Tanggal Lahir"))
        );

        assert!(draft.set("alamat", "x").is_err());
    }

    #[test]
    fn test_round_trip_through_draft() {
        let patient = Patient {
            id: 3,
            name: "Siti".into(),
            birth_date: "2001-02-03".into(),
            contact: "0813".into(),
        };
        let draft = patient.to_draft();
        assert_eq!(draft.get("nama").as_deref(), Some("Siti"));
        assert!(draft.validate().is_ok());
    }
}
