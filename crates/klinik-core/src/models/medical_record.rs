//! Medical record models.

use serde::{Deserialize, Serialize};

use super::appointment::id_text;
use super::{de_id, de_opt_id, de_string, EntityId};
use crate::screen::{
    parse_reference, Draft, Entity, EntityKind, FieldKind, FieldSpec, FormResult, ReferenceKind,
    ReferenceSet,
};

#[derive(Debug, Clone, Deserialize)]
pub struct MedicalRecordWire {
    #[serde(deserialize_with = "de_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub patient_id: Option<EntityId>,
    #[serde(default, deserialize_with = "de_string")]
    pub tanggal: String,
    #[serde(default, deserialize_with = "de_string")]
    pub diagnosis: String,
    #[serde(default, deserialize_with = "de_string")]
    pub treatment: String,
}

/// A medical record row with the patient name joined in.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicalRecord {
    pub id: EntityId,
    pub patient_id: Option<EntityId>,
    pub patient_name: String,
    pub date: String,
    pub diagnosis: String,
    pub treatment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MedicalRecordDraft {
    pub patient_id: Option<EntityId>,
    pub tanggal: String,
    pub diagnosis: String,
    pub treatment: String,
}

impl Draft for MedicalRecordDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required(
            "patient_id",
            "Nama Pasien",
            FieldKind::Reference(ReferenceKind::Patients),
        ),
        FieldSpec::required("tanggal", "Tanggal", FieldKind::Date),
        FieldSpec::required("diagnosis", "Diagnosis", FieldKind::Text),
        FieldSpec::required("treatment", "Perawatan", FieldKind::Text),
    ];

    fn get(&self, field: &str) -> Option<String> {
        match field {
            "patient_id" => Some(id_text(self.patient_id)),
            "tanggal" => Some(self.tanggal.clone()),
            "diagnosis" => Some(self.diagnosis.clone()),
            "treatment" => Some(self.treatment.clone()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: &str) -> FormResult<()> {
        let spec = Self::spec(field)?;
        match spec.name {
            "patient_id" => self.patient_id = parse_reference(spec, value)?,
            "tanggal" => self.tanggal = value.to_string(),
            "diagnosis" => self.diagnosis = value.to_string(),
            _ => self.treatment = value.to_string(),
        }
        Ok(())
    }
}

impl Entity for MedicalRecord {
    type Wire = MedicalRecordWire;
    type Draft = MedicalRecordDraft;

    const KIND: EntityKind = EntityKind::MedicalRecords;
    const COLUMNS: &'static [&'static str] =
        &["ID", "Nama Pasien", "Tanggal", "Diagnosis", "Perawatan"];

    fn from_wire(wire: MedicalRecordWire, refs: &ReferenceSet) -> Self {
        Self {
            id: wire.id,
            patient_name: refs.name(ReferenceKind::Patients, wire.patient_id),
            patient_id: wire.patient_id,
            date: wire.tanggal,
            diagnosis: wire.diagnosis,
            treatment: wire.treatment,
        }
    }

    fn from_saved(wire: MedicalRecordWire, draft: &MedicalRecordDraft, refs: &ReferenceSet) -> Self {
        Self {
            patient_name: refs.name(ReferenceKind::Patients, draft.patient_id),
            ..Self::from_wire(wire, refs)
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> MedicalRecordDraft {
        MedicalRecordDraft {
            patient_id: self.patient_id,
            tanggal: self.date.clone(),
            diagnosis: self.diagnosis.clone(),
            treatment: self.treatment.clone(),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.patient_name.as_str(),
            self.date.as_str(),
            self.diagnosis.as_str(),
            self.treatment.as_str(),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.code(),
            self.patient_name.clone(),
            self.date.clone(),
            self.diagnosis.clone(),
            self.treatment.clone(),
        ]
    }

    fn delete_prompt(&self) -> String {
        format!(
            "Apakah Anda yakin ingin menghapus rekam medis untuk pasien {}?",
            self.patient_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_AVAILABLE;
    use crate::screen::ReferenceOption;
    use serde_json::json;

    #[test]
    fn test_patient_join() {
        let mut refs = ReferenceSet::new();
        refs.insert(
            ReferenceKind::Patients,
            vec![ReferenceOption { id: 4, name: "Ani".into() }],
        );

        let joined: MedicalRecordWire = serde_json::from_value(json!({
            "id": 12, "patient_id": 4, "tanggal": "2024-03-09",
            "diagnosis": "Flu", "treatment": "Istirahat"
        }))
        .unwrap();
        let dangling: MedicalRecordWire =
            serde_json::from_value(json!({"id": 13, "patient_id": 5})).unwrap();

        let a = MedicalRecord::from_wire(joined, &refs);
        let b = MedicalRecord::from_wire(dangling, &refs);
        assert_eq!(a.patient_name, "Ani");
        assert_eq!(a.cells()[0], "RM - 012");
        assert_eq!(b.patient_name, NOT_AVAILABLE);
    }

    #[test]
    fn test_search_fields_cover_clinical_text() {
        let record = MedicalRecord {
            id: 1,
            patient_id: Some(4),
            patient_name: "Ani".into(),
            date: "2024-03-09".into(),
            diagnosis: "Flu".into(),
            treatment: "Istirahat".into(),
        };
        assert_eq!(
            record.search_fields(),
            vec!["Ani", "2024-03-09", "Flu", "Istirahat"]
        );
        assert_eq!(record.to_draft().get("treatment").as_deref(), Some("Istirahat"));
    }
}
