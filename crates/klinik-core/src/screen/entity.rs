//! Entity schema: what a list screen needs to know about one record type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::models::{de_id, EntityId, NOT_AVAILABLE};

/// Form errors, shown inside the modal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{0} wajib diisi.")]
    Required(&'static str),

    #[error("Field tidak dikenal: {0}")]
    UnknownField(String),

    #[error("Nilai tidak valid untuk {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Data {0} tidak dapat diubah.")]
    UpdateNotSupported(&'static str),

    #[error("Data dengan ID {0} tidak ditemukan.")]
    NotFound(EntityId),

    #[error("Formulir belum dibuka.")]
    NotOpen,
}

pub type FormResult<T> = Result<T, FormError>;

/// Server record types with a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Patients,
    Doctors,
    Appointments,
    MedicalRecords,
    Prescriptions,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Patients,
        EntityKind::Doctors,
        EntityKind::Appointments,
        EntityKind::MedicalRecords,
        EntityKind::Prescriptions,
    ];

    /// Collection endpoint.
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Patients => "/patients",
            EntityKind::Doctors => "/doctors",
            EntityKind::Appointments => "/appointments",
            EntityKind::MedicalRecords => "/medical_records",
            EntityKind::Prescriptions => "/prescriptions",
        }
    }

    /// Instance endpoint.
    pub fn instance(&self, id: EntityId) -> String {
        format!("{}/{}", self.collection(), id)
    }

    /// Lowercase noun used inside messages.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Patients => "pasien",
            EntityKind::Doctors => "dokter",
            EntityKind::Appointments => "janji temu",
            EntityKind::MedicalRecords => "rekam medis",
            EntityKind::Prescriptions => "resep obat",
        }
    }

    /// Title-case noun used in headings.
    pub fn title(&self) -> &'static str {
        match self {
            EntityKind::Patients => "Pasien",
            EntityKind::Doctors => "Dokter",
            EntityKind::Appointments => "Janji Temu",
            EntityKind::MedicalRecords => "Rekam Medis",
            EntityKind::Prescriptions => "Resep Obat",
        }
    }

    /// Prefix of the displayed row code, if ids are shown as codes.
    pub fn code_prefix(&self) -> Option<&'static str> {
        match self {
            EntityKind::Appointments => Some("J"),
            EntityKind::MedicalRecords => Some("RM"),
            EntityKind::Prescriptions => Some("R"),
            EntityKind::Patients | EntityKind::Doctors => None,
        }
    }

    /// Whether the instance endpoint accepts PUT.
    pub fn allows_update(&self) -> bool {
        !matches!(self, EntityKind::Prescriptions)
    }

    /// Collections fetched before the primary one, in fetch order.
    pub fn references(&self) -> &'static [ReferenceKind] {
        match self {
            EntityKind::Patients | EntityKind::Doctors => &[],
            EntityKind::Appointments => &[ReferenceKind::Patients, ReferenceKind::Doctors],
            EntityKind::MedicalRecords => &[ReferenceKind::Patients],
            EntityKind::Prescriptions => &[ReferenceKind::MedicalRecords],
        }
    }

    /// Parse a CLI/FFI name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "patients" | "pasien" => Some(EntityKind::Patients),
            "doctors" | "dokter" => Some(EntityKind::Doctors),
            "appointments" | "janjitemu" => Some(EntityKind::Appointments),
            "records" | "medical_records" | "rekammedis" => Some(EntityKind::MedicalRecords),
            "prescriptions" | "resepobat" => Some(EntityKind::Prescriptions),
            _ => None,
        }
    }

    /// Displayed id: `J - 007` for prefixed kinds, the bare id otherwise.
    pub fn row_code(&self, id: EntityId) -> String {
        match self.code_prefix() {
            Some(prefix) => format!("{} - {:03}", prefix, id),
            None => id.to_string(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Collections other entities join against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Patients,
    Doctors,
    MedicalRecords,
}

impl ReferenceKind {
    pub fn collection(&self) -> &'static str {
        match self {
            ReferenceKind::Patients => EntityKind::Patients.collection(),
            ReferenceKind::Doctors => EntityKind::Doctors.collection(),
            ReferenceKind::MedicalRecords => EntityKind::MedicalRecords.collection(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Patients => EntityKind::Patients.label(),
            ReferenceKind::Doctors => EntityKind::Doctors.label(),
            ReferenceKind::MedicalRecords => EntityKind::MedicalRecords.label(),
        }
    }

    /// Build the select option for one reference record.
    ///
    /// Medical records carry no display name; they get a synthesized label.
    /// Other names are kept as sent, blank included.
    pub fn option_from(&self, value: Value) -> Result<ReferenceOption, serde_json::Error> {
        let raw: RawReference = serde_json::from_value(value)?;
        let name = match self {
            ReferenceKind::MedicalRecords => medical_record_label(raw.id),
            ReferenceKind::Patients | ReferenceKind::Doctors => raw.nama.unwrap_or_default(),
        };
        Ok(ReferenceOption { id: raw.id, name })
    }
}

/// Label shown for a medical record in joins.
pub fn medical_record_label(id: EntityId) -> String {
    format!("Rekam Medis {}", id)
}

#[derive(Deserialize)]
struct RawReference {
    #[serde(deserialize_with = "de_id")]
    id: EntityId,
    #[serde(default)]
    nama: Option<String>,
}

/// One selectable reference (dropdown entry).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceOption {
    pub id: EntityId,
    pub name: String,
}

/// Reference collections held by a screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSet {
    collections: HashMap<ReferenceKind, Vec<ReferenceOption>>,
}

impl ReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ReferenceKind, options: Vec<ReferenceOption>) {
        self.collections.insert(kind, options);
    }

    pub fn options(&self, kind: ReferenceKind) -> &[ReferenceOption] {
        self.collections
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Display name for a foreign key, `N/A` when it resolves to nothing.
    pub fn name(&self, kind: ReferenceKind, id: Option<EntityId>) -> String {
        id.and_then(|id| self.options(kind).iter().find(|o| o.id == id))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

/// What a form field holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    /// ISO `YYYY-MM-DD`
    Date,
    Choice(&'static [&'static str]),
    Reference(ReferenceKind),
}

/// One form field, keyed by its server-side name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }
}

/// Form state for one entity, serialized as the request body.
pub trait Draft: Clone + Default + Serialize + fmt::Debug {
    const FIELDS: &'static [FieldSpec];

    /// Current value of a field as text; `None` for unknown names.
    fn get(&self, field: &str) -> Option<String>;

    /// Set a field from text.
    fn set(&mut self, field: &str, value: &str) -> FormResult<()>;

    /// Presence check for required fields.
    fn validate(&self) -> FormResult<()> {
        for spec in Self::FIELDS.iter().filter(|s| s.required) {
            let value = self.get(spec.name).unwrap_or_default();
            if value.trim().is_empty() {
                return Err(FormError::Required(spec.label));
            }
        }
        Ok(())
    }

    fn spec(field: &str) -> FormResult<&'static FieldSpec> {
        Self::FIELDS
            .iter()
            .find(|s| s.name == field)
            .ok_or_else(|| FormError::UnknownField(field.to_string()))
    }
}

/// Parse a reference-id form value; blank clears the selection.
pub fn parse_reference(spec: &FieldSpec, value: &str) -> FormResult<Option<EntityId>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| FormError::InvalidValue {
            field: spec.label,
            value: value.to_string(),
        })
}

/// A record type shown on a list screen.
pub trait Entity: Clone + fmt::Debug + PartialEq {
    /// Server shape of one record.
    type Wire: DeserializeOwned;
    type Draft: Draft;

    const KIND: EntityKind;
    /// Table headers, matching [`Entity::cells`].
    const COLUMNS: &'static [&'static str];

    /// Build a row from a fetched record, joining against `refs`.
    fn from_wire(wire: Self::Wire, refs: &ReferenceSet) -> Self;

    /// Build a row from a save response.
    ///
    /// The server does not echo join names, so joins use the draft's selection.
    fn from_saved(wire: Self::Wire, _draft: &Self::Draft, refs: &ReferenceSet) -> Self {
        Self::from_wire(wire, refs)
    }

    fn id(&self) -> EntityId;

    /// Pre-filled form for editing this row.
    fn to_draft(&self) -> Self::Draft;

    /// Display fields the search box matches against.
    fn search_fields(&self) -> Vec<&str>;

    /// Display cells, one per column.
    fn cells(&self) -> Vec<String>;

    /// Sentence asking to confirm deletion of this row.
    fn delete_prompt(&self) -> String;

    fn code(&self) -> String {
        Self::KIND.row_code(self.id())
    }
}
