//! User-facing messages.

use std::fmt::Display;

use crate::api::ApiError;

pub const MISSING_TOKEN: &str =
    "Token autentikasi tidak ditemukan. Silakan login terlebih dahulu.";
pub const LOGIN_REDIRECT: &str = "Silakan login terlebih dahulu";

pub const LOGIN_FIELDS_REQUIRED: &str = "Email dan kata sandi harus diisi.";
pub const LOGIN_INVALID: &str = "Email atau kata sandi salah.";
pub const LOGIN_FAILED: &str = "Terjadi kesalahan saat login.";

pub const PROFILE_SAVED: &str = "Perubahan berhasil disimpan!";

pub fn load_failed(err: impl Display) -> String {
    format!("Gagal mengambil data: {}", err)
}

pub fn reference_load_failed(label: &str, err: impl Display) -> String {
    format!("Gagal mengambil data {}: {}", label, err)
}

/// HTTP failures quote the server's body; anything else is shown as is.
pub fn save_failed(label: &str, err: &ApiError) -> String {
    match err {
        ApiError::Http { body, .. } => format!("Gagal menyimpan {}: {}", label, body),
        other => other.to_string(),
    }
}

pub fn delete_failed(label: &str, err: impl Display) -> String {
    format!("Gagal menghapus {}: {}", label, err)
}
