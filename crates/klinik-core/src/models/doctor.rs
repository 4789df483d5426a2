//! Doctor models.

use serde::{Deserialize, Serialize};

use super::{de_id, de_string, EntityId};
use crate::screen::{Draft, Entity, EntityKind, FieldKind, FieldSpec, FormResult, ReferenceSet};

/// Doctor as the server sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorWire {
    #[serde(deserialize_with = "de_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "de_string")]
    pub nama: String,
    #[serde(default, deserialize_with = "de_string")]
    pub spesialisasi: String,
    #[serde(default, deserialize_with = "de_string")]
    pub kontak: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Doctor {
    pub id: EntityId,
    pub name: String,
    pub specialty: String,
    pub contact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DoctorDraft {
    pub nama: String,
    pub spesialisasi: String,
    pub kontak: String,
}

impl Draft for DoctorDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("nama", "Nama", FieldKind::Text),
        FieldSpec::required("spesialisasi", "Spesialisasi", FieldKind::Text),
        FieldSpec::required("kontak", "Kontak", FieldKind::Text),
    ];

    fn get(&self, field: &str) -> Option<String> {
        match field {
            "nama" => Some(self.nama.clone()),
            "spesialisasi" => Some(self.spesialisasi.clone()),
            "kontak" => Some(self.kontak.clone()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: &str) -> FormResult<()> {
        let spec = Self::spec(field)?;
        match spec.name {
            "nama" => self.nama = value.to_string(),
            "spesialisasi" => self.spesialisasi = value.to_string(),
            _ => self.kontak = value.to_string(),
        }
        Ok(())
    }
}

impl Entity for Doctor {
    type Wire = DoctorWire;
    type Draft = DoctorDraft;

    const KIND: EntityKind = EntityKind::Doctors;
    const COLUMNS: &'static [&'static str] = &["ID", "Nama", "Spesialisasi", "Kontak"];

    fn from_wire(wire: DoctorWire, _refs: &ReferenceSet) -> Self {
        Self {
            id: wire.id,
            name: wire.nama,
            specialty: wire.spesialisasi,
            contact: wire.kontak,
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> DoctorDraft {
        DoctorDraft {
            nama: self.name.clone(),
            spesialisasi: self.specialty.clone(),
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
            self.specialty.clone(),
            self.contact.clone(),
        ]
    }

    fn delete_prompt(&self) -> String {
        format!("Apakah Anda yakin ingin menghapus data dokter {}?", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_wire() {
        let wire: DoctorWire = serde_json::from_value(json!({
            "id": "2",
            "nama": "dr. Andi",
            "spesialisasi": "Umum",
            "kontak": null
        }))
        .unwrap();

        let doctor = Doctor::from_wire(wire, &ReferenceSet::new());
        assert_eq!(doctor.id, 2);
        assert_eq!(doctor.specialty, "Umum");
        assert_eq!(doctor.contact, "");
    }

    #[test]
    fn test_search_only_by_name() {
        let doctor = Doctor {
            id: 1,
            name: "dr. Andi".into(),
            specialty: "Anak".into(),
            contact: "0812".into(),
        };
        assert_eq!(doctor.search_fields(), vec!["dr. Andi"]);
    }
}
