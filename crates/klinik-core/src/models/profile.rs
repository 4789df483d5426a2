//! Signed-in user profile.

use serde::{Deserialize, Serialize};

use super::de_string;

/// Profile as returned by `GET /user`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "de_string")]
    pub nama: String,
    #[serde(default, deserialize_with = "de_string")]
    pub email: String,
    #[serde(default, deserialize_with = "de_string")]
    pub telepon: String,
    #[serde(default, deserialize_with = "de_string")]
    pub alamat: String,
    /// Photo URL, if one was uploaded
    #[serde(default)]
    pub foto: Option<String>,
}

impl Profile {
    /// Editable text fields, in form order.
    pub const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("nama", "Nama"),
        ("email", "Email"),
        ("telepon", "Nomor Telepon"),
        ("alamat", "Alamat"),
    ];

    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            "nama" => Some(self.nama.as_str()),
            "email" => Some(self.email.as_str()),
            "telepon" => Some(self.telepon.as_str()),
            "alamat" => Some(self.alamat.as_str()),
            _ => None,
        }
    }

    /// Returns false for unknown field names.
    pub fn set(&mut self, field: &str, value: &str) -> bool {
        let slot = match field {
            "nama" => &mut self.nama,
            "email" => &mut self.email,
            "telepon" => &mut self.telepon,
            "alamat" => &mut self.alamat,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }

    /// Text parts of the multipart update.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        Self::FIELDS
            .iter()
            .map(|(name, _)| {
                (
                    name.to_string(),
                    self.get(name).unwrap_or_default().to_string(),
                )
            })
            .collect()
    }
}
