//! Appointment models.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::{de_id, de_opt_id, de_string, EntityId};
use crate::screen::{
    parse_reference, Draft, Entity, EntityKind, FieldKind, FieldSpec, FormError, FormResult,
    ReferenceKind, ReferenceSet,
};

/// Appointment status.
///
/// The server is inconsistent about casing, so parsing ignores case.
/// Literals outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    Other(String),
}

/// Status given to new appointments.
pub const DEFAULT_APPOINTMENT_STATUS: AppointmentStatus = AppointmentStatus::Scheduled;

/// Wire literals offered by the form.
pub const APPOINTMENT_STATUS_CHOICES: &[&str] = &["terjadwal", "selesai", "batal"];

impl AppointmentStatus {
    /// Literal sent to and filtered on by the server.
    pub fn as_wire(&self) -> &str {
        match self {
            AppointmentStatus::Scheduled => "terjadwal",
            AppointmentStatus::Completed => "selesai",
            AppointmentStatus::Cancelled => "batal",
            AppointmentStatus::Other(s) => s,
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            AppointmentStatus::Scheduled => "Terjadwal",
            AppointmentStatus::Completed => "Selesai",
            AppointmentStatus::Cancelled => "Batal",
            AppointmentStatus::Other(s) => s,
        }
    }

    /// Lenient parse for server payloads.
    pub fn parse(s: &str) -> Self {
        Self::parse_known(s).unwrap_or_else(|| AppointmentStatus::Other(s.to_string()))
    }

    /// Strict parse for form input.
    pub fn parse_known(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "terjadwal" | "scheduled" => Some(AppointmentStatus::Scheduled),
            "selesai" | "completed" => Some(AppointmentStatus::Completed),
            "batal" | "dibatalkan" | "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

impl Default for AppointmentStatus {
    fn default() -> Self {
        DEFAULT_APPOINTMENT_STATUS
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for AppointmentStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = de_string(deserializer)?;
        Ok(AppointmentStatus::parse(&raw))
    }
}

/// Appointment as the server sends it.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentWire {
    #[serde(deserialize_with = "de_id")]
    pub id: EntityId,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub patient_id: Option<EntityId>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub doctor_id: Option<EntityId>,
    #[serde(default, deserialize_with = "de_string")]
    pub tanggal: String,
    /// Missing means blank, not the default for new appointments.
    #[serde(default = "missing_status")]
    pub status: AppointmentStatus,
}

fn missing_status() -> AppointmentStatus {
    AppointmentStatus::Other(String::new())
}

/// An appointment row with patient and doctor names joined in.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: EntityId,
    pub patient_id: Option<EntityId>,
    pub doctor_id: Option<EntityId>,
    pub patient_name: String,
    pub doctor_name: String,
    pub date: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppointmentDraft {
    pub patient_id: Option<EntityId>,
    pub doctor_id: Option<EntityId>,
    pub tanggal: String,
    pub status: AppointmentStatus,
}

impl Draft for AppointmentDraft {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required(
            "patient_id",
            "Nama Pasien",
            FieldKind::Reference(ReferenceKind::Patients),
        ),
        FieldSpec::required(
            "doctor_id",
            "Nama Dokter",
            FieldKind::Reference(ReferenceKind::Doctors),
        ),
        FieldSpec::required("tanggal", "Tanggal", FieldKind::Date),
        FieldSpec::required("status", "Status", FieldKind::Choice(APPOINTMENT_STATUS_CHOICES)),
    ];

    fn get(&self, field: &str) -> Option<String> {
        match field {
            "patient_id" => Some(id_text(self.patient_id)),
            "doctor_id" => Some(id_text(self.doctor_id)),
            "tanggal" => Some(self.tanggal.clone()),
            "status" => Some(self.status.as_wire().to_string()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: &str) -> FormResult<()> {
        let spec = Self::spec(field)?;
        match spec.name {
            "patient_id" => self.patient_id = parse_reference(spec, value)?,
            "doctor_id" => self.doctor_id = parse_reference(spec, value)?,
            "tanggal" => self.tanggal = value.to_string(),
            _ => {
                self.status = AppointmentStatus::parse_known(value).ok_or_else(|| {
                    FormError::InvalidValue {
                        field: spec.label,
                        value: value.to_string(),
                    }
                })?
            }
        }
        Ok(())
    }
}

pub(crate) fn id_text(id: Option<EntityId>) -> String {
    id.map(|i| i.to_string()).unwrap_or_default()
}

impl Entity for Appointment {
    type Wire = AppointmentWire;
    type Draft = AppointmentDraft;

    const KIND: EntityKind = EntityKind::Appointments;
    const COLUMNS: &'static [&'static str] =
        &["ID", "Nama Pasien", "Nama Dokter", "Tanggal", "Status"];

    fn from_wire(wire: AppointmentWire, refs: &ReferenceSet) -> Self {
        Self {
            id: wire.id,
            patient_name: refs.name(ReferenceKind::Patients, wire.patient_id),
            doctor_name: refs.name(ReferenceKind::Doctors, wire.doctor_id),
            patient_id: wire.patient_id,
            doctor_id: wire.doctor_id,
            date: wire.tanggal,
            status: wire.status,
        }
    }

    fn from_saved(wire: AppointmentWire, draft: &AppointmentDraft, refs: &ReferenceSet) -> Self {
        Self {
            patient_name: refs.name(ReferenceKind::Patients, draft.patient_id),
            doctor_name: refs.name(ReferenceKind::Doctors, draft.doctor_id),
            ..Self::from_wire(wire, refs)
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn to_draft(&self) -> AppointmentDraft {
        AppointmentDraft {
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            tanggal: self.date.clone(),
            status: self.status.clone(),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.patient_name.as_str(),
            self.doctor_name.as_str(),
            self.date.as_str(),
            self.status.label(),
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.code(),
            self.patient_name.clone(),
            self.doctor_name.clone(),
            self.date.clone(),
            self.status.label().to_string(),
        ]
    }

    fn delete_prompt(&self) -> String {
        format!(
            "Apakah Anda yakin ingin menghapus janji temu untuk pasien {} dengan dokter {}?",
            self.patient_name, self.doctor_name
        )
    }
}
