//! Profile screen backed by `GET/PUT /user`.

use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

use super::{FormError, FormResult, LoadState, ScreenEffect};
use crate::api::{FilePart, Method, MultipartForm, RequestBody};
use crate::context::AppContext;
use crate::messages;
use crate::models::Profile;

pub const PROFILE_PATH: &str = "/user";
/// Multipart field carrying the photo.
pub const PHOTO_FIELD: &str = "foto";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileScreen {
    state: LoadState,
    profile: Profile,
    photo: Option<FilePart>,
    error: Option<String>,
    notice: Option<String>,
}

impl ProfileScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Photo waiting to be uploaded with the next save.
    pub fn pending_photo(&self) -> Option<&FilePart> {
        self.photo.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Success notice from the last save, cleared once taken.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn mount(&mut self, ctx: &AppContext) -> ScreenEffect {
        let Some(token) = ctx.bearer() else {
            self.state = LoadState::Failed(messages::MISSING_TOKEN.to_string());
            return ScreenEffect::RedirectToLogin;
        };

        self.state = LoadState::Loading;
        let loaded = ctx
            .api
            .get(&token, PROFILE_PATH)
            .and_then(|value| Ok(serde_json::from_value::<Profile>(unwrap_user(value))?));
        match loaded {
            Ok(profile) => {
                self.profile = profile;
                self.state = LoadState::Loaded;
            }
            Err(e) => self.state = LoadState::Failed(messages::load_failed(e)),
        }
        ScreenEffect::None
    }

    pub fn set_field(&mut self, field: &str, value: &str) -> FormResult<()> {
        if self.profile.set(field, value) {
            Ok(())
        } else {
            Err(FormError::UnknownField(field.to_string()))
        }
    }

    /// Read a photo from disk for the next save.
    pub fn attach_photo(&mut self, path: &Path) -> io::Result<()> {
        let bytes = fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| PHOTO_FIELD.to_string());
        self.photo = Some(FilePart {
            field: PHOTO_FIELD.to_string(),
            file_name,
            bytes,
        });
        Ok(())
    }

    fn validate(&self) -> FormResult<()> {
        if self.profile.nama.trim().is_empty() {
            return Err(FormError::Required("Nama"));
        }
        if self.profile.email.trim().is_empty() {
            return Err(FormError::Required("Email"));
        }
        Ok(())
    }

    /// Upload the profile as multipart.
    pub fn save(&mut self, ctx: &AppContext) -> ScreenEffect {
        let Some(token) = ctx.bearer() else {
            self.error = Some(messages::MISSING_TOKEN.to_string());
            return ScreenEffect::RedirectToLogin;
        };
        if let Err(e) = self.validate() {
            self.error = Some(e.to_string());
            return ScreenEffect::None;
        }
        self.error = None;

        let form = MultipartForm {
            fields: self.profile.form_fields(),
            file: self.photo.clone(),
        };
        let sent = ctx.api.request(
            Method::Put,
            PROFILE_PATH,
            Some(RequestBody::Multipart(form)),
            Some(&token),
        );

        match sent {
            Ok(value) => {
                // Take the server's copy when it sends one back (new photo URL)
                if let Ok(updated) = serde_json::from_value::<Profile>(unwrap_user(value)) {
                    if !updated.email.is_empty() {
                        self.profile = updated;
                    }
                }
                self.photo = None;
                self.notice = Some(messages::PROFILE_SAVED.to_string());
                info!("Profile saved");
            }
            Err(e) => {
                warn!("Profile save failed: {}", e);
                self.error = Some(messages::save_failed("profil", &e));
            }
        }
        ScreenEffect::None
    }
}

/// Accept both a bare profile and `{"user": {...}}`.
fn unwrap_user(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("user").is_some_and(Value::is_object) => {
            map.remove("user").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTransport;
    use serde_json::json;
    use std::io::Write;

    fn setup() -> (MockTransport, AppContext) {
        let mock = MockTransport::new();
        let mut ctx = AppContext::in_memory(mock.client()).unwrap();
        ctx.session.login("T1").unwrap();
        mock.on_json(
            Method::Get,
            PROFILE_PATH,
            200,
            json!({"nama": "Aloysia", "email": "aloysia@gmail.com", "telepon": "0887", "alamat": null}),
        );
        (mock, ctx)
    }

    #[test]
    fn test_mount_loads_profile() {
        let (_mock, ctx) = setup();
        let mut screen = ProfileScreen::new();
        screen.mount(&ctx);

        assert_eq!(screen.state(), &LoadState::Loaded);
        assert_eq!(screen.profile().nama, "Aloysia");
        assert_eq!(screen.profile().alamat, "");
    }

    #[test]
    fn test_save_sends_multipart_with_photo() {
        let (mock, ctx) = setup();
        mock.on_json(Method::Put, PROFILE_PATH, 200, json!({"message": "ok"}));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x89PNG").unwrap();

        let mut screen = ProfileScreen::new();
        screen.mount(&ctx);
        screen.set_field("alamat", "Jl. Jalan No.10").unwrap();
        screen.attach_photo(file.path()).unwrap();
        screen.save(&ctx);

        assert_eq!(screen.take_notice().as_deref(), Some(messages::PROFILE_SAVED));
        assert!(screen.pending_photo().is_none());

        let request = &mock.requests_to(Method::Put, PROFILE_PATH)[0];
        match &request.body {
            Some(RequestBody::Multipart(form)) => {
                assert_eq!(form.field("alamat"), Some("Jl. Jalan No.10"));
                assert_eq!(form.field("nama"), Some("Aloysia"));
                let photo = form.file.as_ref().unwrap();
                assert_eq!(photo.field, PHOTO_FIELD);
                assert_eq!(photo.bytes, b"\x89PNG".to_vec());
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[test]
    fn test_save_requires_name_and_email() {
        let (mock, ctx) = setup();
        let mut screen = ProfileScreen::new();
        screen.mount(&ctx);
        screen.set_field("email", " ").unwrap();
        screen.save(&ctx);

        assert_eq!(screen.error(), Some("Email wajib diisi."));
        assert!(mock.requests_to(Method::Put, PROFILE_PATH).is_empty());
    }

    #[test]
    fn test_save_failure_is_inline() {
        let (mock, ctx) = setup();
        mock.on(Method::Put, PROFILE_PATH, 413, "too large");

        let mut screen = ProfileScreen::new();
        screen.mount(&ctx);
        screen.save(&ctx);

        assert_eq!(screen.error(), Some("Gagal menyimpan profil: too large"));
        assert_eq!(screen.take_notice(), None);
    }

    #[test]
    fn test_unwrap_user() {
        let nested = unwrap_user(json!({"user": {"nama": "A"}}));
        assert_eq!(nested, json!({"nama": "A"}));
        let bare = unwrap_user(json!({"nama": "B"}));
        assert_eq!(bare, json!({"nama": "B"}));
    }

    #[test]
    fn test_unknown_field() {
        let mut screen = ProfileScreen::new();
        assert_eq!(
            screen.set_field("foto", "x"),
            Err(FormError::UnknownField("foto".into()))
        );
    }
}
