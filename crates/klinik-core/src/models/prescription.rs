//! Prescription models. The server has no update endpoint for these.

use serde::{Deserialize, Serialize};

use super::appointment::id_text;
use super::{de_id, de_opt_id, de_string, EntityId};
use crate::screen::{
    parse_reference, Draft, Entity, EntityKind, FieldKind, FieldSpec, FormResult, ReferenceKind,
    ReferenceSet,
};

#[derive(Debug, Clone, Deserialize)]
pub struct PrescriptionWire {
    #[serde(deserialize_with = "de_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub medical_record_id: Option<EntityId>,
    #[serde(default, deserialize_with = "de_string")]
    pub obat: String,
    #[serde(default, deserialize_with = "de_string")]
    pub dosis: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prescription {
    pub id: EntityId,
    pub medical_record_id: Option<EntityId>,
    /// `Rekam Medis N`, or `N/A`
    pub record_label: String,
    pub drug: String,
    pub dosage: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrescriptionDraft {
    pub medical_record_id: Option<EntityId>,
    pub obat: String,
    pub dosis: String,
}

impl Draft for PrescriptionDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required(
            "medical_record_id",
            "Rekam Medis",
            FieldKind::Reference(ReferenceKind::MedicalRecords),
        ),
        FieldSpec::required("obat", "Obat", FieldKind::Text),
        FieldSpec::required("dosis", "Dosis", FieldKind::Text),
    ];

    fn get(&self, field: &str) -> Option<String> {
        match field {
            "medical_record_id" => Some(id_text(self.medical_record_id)),
            "obat" => Some(self.obat.clone()),
            "dosis" => Some(self.dosis.clone()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: &str) -> FormResult<()> {
        let spec = Self::spec(field)?;
        match spec.name {
            "medical_record_id" => self.medical_record_id = parse_reference(spec, value)?,
            "obat" => self.obat = value.to_string(),
            _ => self.dosis = value.to_string(),
        }
        Ok(())
    }
}

impl Entity for Prescription {
    type Wire = PrescriptionWire;
    type Draft = PrescriptionDraft;

    const KIND: EntityKind = EntityKind::Prescriptions;
    const COLUMNS: &'static [&'static str] = &["ID", "Rekam Medis", "Obat", "Dosis"];

    fn from_wire(wire: PrescriptionWire, refs: &ReferenceSet) -> Self {
        Self {
            id: wire.id,
            record_label: refs.name(ReferenceKind::MedicalRecords, wire.medical_record_id),
            medical_record_id: wire.medical_record_id,
            drug: wire.obat,
            dosage: wire.dosis,
        }
    }

    fn from_saved(wire: PrescriptionWire, draft: &PrescriptionDraft, refs: &ReferenceSet) -> Self {
        Self {
            record_label: refs.name(ReferenceKind::MedicalRecords, draft.medical_record_id),
            ..Self::from_wire(wire, refs)
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> PrescriptionDraft {
        PrescriptionDraft {
            medical_record_id: self.medical_record_id,
            obat: self.drug.clone(),
            dosis: self.dosage.clone(),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.record_label.as_str(),
            self.drug.as_str(),
            self.dosage.as_str(),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.code(),
            self.record_label.clone(),
            self.drug.clone(),
            self.dosage.clone(),
        ]
    }

    fn delete_prompt(&self) -> String {
        format!(
            "Apakah Anda yakin ingin menghapus resep obat {} untuk {}?",
            self.drug, self.record_label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ReferenceOption;
    use serde_json::json;

    #[test]
    fn test_record_label_join() {
        let mut refs = ReferenceSet::new();
        refs.insert(
            ReferenceKind::MedicalRecords,
            vec![ReferenceOption { id: 3, name: "Rekam Medis 3".into() }],
        );
        let wire: PrescriptionWire = serde_json::from_value(json!({
            "id": 1, "medical_record_id": "3", "obat": "Paracetamol", "dosis": "3x1"
        }))
        .unwrap();

        let prescription = Prescription::from_wire(wire, &refs);
        assert_eq!(prescription.record_label, "Rekam Medis 3");
        assert_eq!(
            prescription.cells(),
            vec!["R - 001", "Rekam Medis 3", "Paracetamol", "3x1"]
        );
    }

    #[test]
    fn test_draft_body() {
        let mut draft = PrescriptionDraft::default();
        draft.set("medical_record_id", "3").unwrap();
        draft.set("obat", "Amoxicillin").unwrap();
        draft.set("dosis", "2x1").unwrap();
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({"medical_record_id": 3, "obat": "Amoxicillin", "dosis": "2x1"})
        );
    }
}
