//! Klinik Core Library
//!
//! Headless client for the clinic-management REST API. Every screen of the
//! app is a plain state machine; a terminal front end and a native mobile
//! shell (through UniFFI) drive the same screens.
//!
//! # Architecture
//!
//! ```text
//!   CLI / mobile shell
//!          │  method calls
//!          ▼
//!   ┌──────────────────────────────────────────────┐
//!   │ Screens: Login, Dashboard, ListScreen<E>,    │
//!   │          FormModal, DeleteConfirmation,      │
//!   │          Profile, NavigationShell            │
//!   └──────────────────────┬───────────────────────┘
//!                          │ &AppContext
//!              ┌───────────┴───────────┐
//!              ▼                       ▼
//!        SessionStore              ApiClient
//!              │                       │
//!              ▼                       ▼
//!        LocalStorage             Transport
//!         (SQLite)          (reqwest / mock)
//! ```
//!
//! # Core Principle
//!
//! **The server is the source of truth.** Each list screen holds a cached
//! copy of one table: replaced on load, patched after every successful
//! mutation, never merged.
//!
//! # Modules
//!
//! - [`storage`]: SQLite-backed key/value store holding the session
//! - [`session`]: Bearer token and cross-process change detection
//! - [`api`]: REST client behind a swappable transport
//! - [`models`]: Patients, doctors, appointments, medical records, prescriptions
//! - [`screen`]: List/form/delete screens, login, dashboard, profile, navigation
//! - [`config`]: Layered client configuration

pub mod api;
pub mod config;
pub mod context;
pub mod messages;
pub mod models;
pub mod screen;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, HttpTransport, MockTransport, Transport};
pub use config::ClientConfig;
pub use context::{AppContext, InitError};
pub use models::{
    Appointment, AppointmentStatus, Doctor, EntityId, MedicalRecord, Patient, Prescription,
    Profile, DEFAULT_APPOINTMENT_STATUS,
};
pub use screen::{
    ChartPoint, ChartRenderer, Dashboard, EntityKind, ListScreen, LoadState, LoginScreen,
    NavigationShell, ProfileScreen, Route, ScreenEffect, ScreenOps,
};
pub use session::{SessionChange, SessionStore};
pub use storage::LocalStorage;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use screen::{DoctorSlot, FieldKind, FieldView, FormError, RowView};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum KlinikError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<config::ConfigError> for KlinikError {
    fn from(e: config::ConfigError) -> Self {
        KlinikError::ConfigError(e.to_string())
    }
}

impl From<storage::StorageError> for KlinikError {
    fn from(e: storage::StorageError) -> Self {
        KlinikError::StorageError(e.to_string())
    }
}

impl From<ApiError> for KlinikError {
    fn from(e: ApiError) -> Self {
        KlinikError::ApiError(e.to_string())
    }
}

impl From<InitError> for KlinikError {
    fn from(e: InitError) -> Self {
        match e {
            InitError::Storage(e) => e.into(),
            InitError::Api(e) => e.into(),
        }
    }
}

impl From<FormError> for KlinikError {
    fn from(e: FormError) -> Self {
        KlinikError::InvalidInput(e.to_string())
    }
}

impl From<std::io::Error> for KlinikError {
    fn from(e: std::io::Error) -> Self {
        KlinikError::IoError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for KlinikError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        KlinikError::StorageError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open the app from a config file (or defaults, `klinik.toml`, `KLINIK_*`).
#[uniffi::export]
pub fn open_app(config_path: Option<String>) -> Result<Arc<KlinikCore>, KlinikError> {
    let config = ClientConfig::load(config_path.as_deref().map(Path::new))?;
    let ctx = AppContext::init(&config)?;
    Ok(Arc::new(KlinikCore::new(ctx)))
}

/// Open the app against an explicit API and storage file.
#[uniffi::export]
pub fn open_app_with_base_url(
    base_url: String,
    storage_path: String,
) -> Result<Arc<KlinikCore>, KlinikError> {
    let config = ClientConfig {
        base_url,
        storage_path: storage_path.into(),
        ..ClientConfig::default()
    };
    let ctx = AppContext::init(&config)?;
    Ok(Arc::new(KlinikCore::new(ctx)))
}

// =========================================================================
// Main API Object
// =========================================================================

struct AppState {
    ctx: AppContext,
    shell: NavigationShell,
    screens: HashMap<EntityKind, Box<dyn ScreenOps + Send>>,
    dashboard: Dashboard,
    profile: ProfileScreen,
}

fn screen_mut(
    screens: &mut HashMap<EntityKind, Box<dyn ScreenOps + Send>>,
    kind: EntityKind,
) -> &mut Box<dyn ScreenOps + Send> {
    screens
        .entry(kind)
        .or_insert_with(|| screen::screen_for(kind))
}

/// Thread-safe app wrapper for FFI.
#[derive(uniffi::Object)]
pub struct KlinikCore {
    state: Mutex<AppState>,
}

impl KlinikCore {
    /// Wrap an existing context (tests build one over a mock transport).
    pub fn new(ctx: AppContext) -> Self {
        Self {
            state: Mutex::new(AppState {
                ctx,
                shell: NavigationShell::new(),
                screens: HashMap::new(),
                dashboard: Dashboard::new(),
                profile: ProfileScreen::new(),
            }),
        }
    }
}

fn outcome(shell: &mut NavigationShell, effect: ScreenEffect, error: Option<String>) -> FfiOutcome {
    FfiOutcome {
        route: shell.apply(effect).map(|r| r.path().to_string()),
        error,
        notice: None,
    }
}

#[uniffi::export]
impl KlinikCore {
    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Log in. On success `route` is the dashboard.
    pub fn login(&self, email: String, password: String) -> Result<FfiOutcome, KlinikError> {
        let mut state = self.state.lock()?;
        let AppState { ctx, shell, .. } = &mut *state;

        let mut screen = LoginScreen::new();
        screen.email = email;
        screen.password = password;
        let effect = screen.submit(ctx)?;
        Ok(outcome(shell, effect, screen.error().map(str::to_string)))
    }

    /// Log out (server call is best effort) and drop cached screens.
    pub fn logout(&self) -> Result<(), KlinikError> {
        let mut state = self.state.lock()?;
        let AppState { ctx, shell, .. } = &mut *state;
        shell.confirm_logout(ctx)?;
        state.screens.clear();
        state.dashboard = Dashboard::new();
        state.profile = ProfileScreen::new();
        Ok(())
    }

    pub fn is_authenticated(&self) -> Result<bool, KlinikError> {
        let state = self.state.lock()?;
        Ok(state.ctx.session.is_authenticated())
    }

    /// New authentication state if another process changed the session.
    pub fn poll_session_change(&self) -> Result<Option<bool>, KlinikError> {
        let mut state = self.state.lock()?;
        let change = state.ctx.session.poll_storage_event()?;
        Ok(change.map(|c| c.authenticated))
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn current_route(&self) -> Result<String, KlinikError> {
        let state = self.state.lock()?;
        Ok(state.shell.route().path().to_string())
    }

    /// Navigate by path; returns the resolved route.
    pub fn navigate(&self, path: String) -> Result<String, KlinikError> {
        let mut state = self.state.lock()?;
        let route = state
            .shell
            .navigate_path(&path)
            .ok_or_else(|| KlinikError::InvalidInput(format!("Unknown route: {}", path)))?;
        Ok(route.path().to_string())
    }

    pub fn services(&self) -> Vec<FfiService> {
        screen::services()
            .into_iter()
            .map(|s| FfiService {
                label: s.label.to_string(),
                path: s.route.path().to_string(),
            })
            .collect()
    }

    // =========================================================================
    // Entity Screens
    // =========================================================================

    /// Fetch the screen's data.
    pub fn mount_screen(&self, kind: FfiEntityKind) -> Result<FfiOutcome, KlinikError> {
        let mut state = self.state.lock()?;
        let AppState {
            ctx,
            shell,
            screens,
            ..
        } = &mut *state;
        let screen = screen_mut(screens, kind.into());
        let effect = screen.mount(ctx);
        let error = match screen.state() {
            LoadState::Failed(message) => Some(message.clone()),
            _ => None,
        };
        Ok(outcome(shell, effect, error))
    }

    pub fn set_search(&self, kind: FfiEntityKind, term: String) -> Result<(), KlinikError> {
        let mut state = self.state.lock()?;
        screen_mut(&mut state.screens, kind.into()).set_search(&term);
        Ok(())
    }

    /// Rows matching the current search.
    pub fn visible_rows(&self, kind: FfiEntityKind) -> Result<Vec<FfiRow>, KlinikError> {
        let mut state = self.state.lock()?;
        let rows = screen_mut(&mut state.screens, kind.into()).visible_rows();
        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub fn columns(&self, kind: FfiEntityKind) -> Vec<String> {
        screen::screen_for(kind.into())
            .columns()
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    /// Fields of the open form, or a blank form.
    pub fn form_fields(&self, kind: FfiEntityKind) -> Result<Vec<FfiField>, KlinikError> {
        let mut state = self.state.lock()?;
        let fields = screen_mut(&mut state.screens, kind.into()).fields();
        Ok(fields.into_iter().map(|f| f.into()).collect())
    }

    pub fn open_create(&self, kind: FfiEntityKind) -> Result<(), KlinikError> {
        let mut state = self.state.lock()?;
        screen_mut(&mut state.screens, kind.into()).open_create();
        Ok(())
    }

    pub fn open_edit(&self, kind: FfiEntityKind, id: i64) -> Result<(), KlinikError> {
        let mut state = self.state.lock()?;
        screen_mut(&mut state.screens, kind.into()).open_edit(id)?;
        Ok(())
    }

    pub fn set_form_field(
        &self,
        kind: FfiEntityKind,
        field: String,
        value: String,
    ) -> Result<(), KlinikError> {
        let mut state = self.state.lock()?;
        screen_mut(&mut state.screens, kind.into()).set_form_field(&field, &value)?;
        Ok(())
    }

    /// Submit the open form. `error` is set while the form stays open.
    pub fn submit_form(&self, kind: FfiEntityKind) -> Result<FfiOutcome, KlinikError> {
        let mut state = self.state.lock()?;
        let AppState {
            ctx,
            shell,
            screens,
            ..
        } = &mut *state;
        let screen = screen_mut(screens, kind.into());
        let effect = screen.submit_form(ctx);
        let error = screen.form_error();
        Ok(outcome(shell, effect, error))
    }

    pub fn cancel_form(&self, kind: FfiEntityKind) -> Result<(), KlinikError> {
        let mut state = self.state.lock()?;
        screen_mut(&mut state.screens, kind.into()).cancel_form();
        Ok(())
    }

    /// Open the delete confirmation; returns its prompt.
    pub fn request_delete(&self, kind: FfiEntityKind, id: i64) -> Result<String, KlinikError> {
        let mut state = self.state.lock()?;
        Ok(screen_mut(&mut state.screens, kind.into()).request_delete(id)?)
    }

    /// Confirm the pending delete. Failures arrive through `take_alert`.
    pub fn confirm_delete(&self, kind: FfiEntityKind) -> Result<FfiOutcome, KlinikError> {
        let mut state = self.state.lock()?;
        let AppState {
            ctx,
            shell,
            screens,
            ..
        } = &mut *state;
        let effect = screen_mut(screens, kind.into()).confirm_delete(ctx);
        Ok(outcome(shell, effect, None))
    }

    pub fn cancel_delete(&self, kind: FfiEntityKind) -> Result<(), KlinikError> {
        let mut state = self.state.lock()?;
        screen_mut(&mut state.screens, kind.into()).cancel_delete();
        Ok(())
    }

    pub fn take_alert(&self, kind: FfiEntityKind) -> Result<Option<String>, KlinikError> {
        let mut state = self.state.lock()?;
        Ok(screen_mut(&mut state.screens, kind.into()).take_alert())
    }

    pub fn screen_status(&self, kind: FfiEntityKind) -> Result<FfiScreenStatus, KlinikError> {
        let mut state = self.state.lock()?;
        let screen = screen_mut(&mut state.screens, kind.into());
        let (load_state, error) = match screen.state() {
            LoadState::Idle => (FfiLoadState::Idle, None),
            LoadState::Loading => (FfiLoadState::Loading, None),
            LoadState::Loaded => (FfiLoadState::Loaded, None),
            LoadState::Failed(message) => (FfiLoadState::Failed, Some(message.clone())),
        };
        Ok(FfiScreenStatus {
            load_state,
            error,
            row_count: screen.row_count() as u64,
            form_open: screen.is_form_open(),
            form_error: screen.form_error(),
            delete_pending: screen.is_delete_pending(),
        })
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    pub fn mount_dashboard(&self) -> Result<FfiOutcome, KlinikError> {
        let mut state = self.state.lock()?;
        let AppState {
            ctx,
            shell,
            dashboard,
            ..
        } = &mut *state;
        let effect = dashboard.mount(ctx);
        Ok(outcome(shell, effect, None))
    }

    /// Completed visits per month.
    pub fn dashboard_chart(&self) -> Result<Vec<FfiChartPoint>, KlinikError> {
        let state = self.state.lock()?;
        Ok(state
            .dashboard
            .chart()
            .iter()
            .cloned()
            .map(|p| p.into())
            .collect())
    }

    pub fn doctor_schedule(&self) -> Result<Vec<FfiDoctorSlot>, KlinikError> {
        let state = self.state.lock()?;
        Ok(state
            .dashboard
            .doctors()
            .iter()
            .cloned()
            .map(|d| d.into())
            .collect())
    }

    pub fn toggle_doctor(&self, id: i64) -> Result<bool, KlinikError> {
        let mut state = self.state.lock()?;
        Ok(state.dashboard.toggle_doctor(id))
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub fn mount_profile(&self) -> Result<FfiOutcome, KlinikError> {
        let mut state = self.state.lock()?;
        let AppState {
            ctx,
            shell,
            profile,
            ..
        } = &mut *state;
        let effect = profile.mount(ctx);
        let error = match profile.state() {
            LoadState::Failed(message) => Some(message.clone()),
            _ => None,
        };
        Ok(outcome(shell, effect, error))
    }

    pub fn profile(&self) -> Result<FfiProfile, KlinikError> {
        let state = self.state.lock()?;
        Ok(state.profile.profile().clone().into())
    }

    pub fn set_profile_field(&self, field: String, value: String) -> Result<(), KlinikError> {
        let mut state = self.state.lock()?;
        state.profile.set_field(&field, &value)?;
        Ok(())
    }

    pub fn attach_profile_photo(&self, path: String) -> Result<(), KlinikError> {
        let mut state = self.state.lock()?;
        state.profile.attach_photo(Path::new(&path))?;
        Ok(())
    }

    pub fn save_profile(&self) -> Result<FfiOutcome, KlinikError> {
        let mut state = self.state.lock()?;
        let AppState {
            ctx,
            shell,
            profile,
            ..
        } = &mut *state;
        let effect = profile.save(ctx);
        let mut result = outcome(shell, effect, profile.error().map(str::to_string));
        result.notice = profile.take_notice();
        Ok(result)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiEntityKind {
    Patients,
    Doctors,
    Appointments,
    MedicalRecords,
    Prescriptions,
}

impl From<FfiEntityKind> for EntityKind {
    fn from(kind: FfiEntityKind) -> Self {
        match kind {
            FfiEntityKind::Patients => EntityKind::Patients,
            FfiEntityKind::Doctors => EntityKind::Doctors,
            FfiEntityKind::Appointments => EntityKind::Appointments,
            FfiEntityKind::MedicalRecords => EntityKind::MedicalRecords,
            FfiEntityKind::Prescriptions => EntityKind::Prescriptions,
        }
    }
}

impl From<EntityKind> for FfiEntityKind {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Patients => FfiEntityKind::Patients,
            EntityKind::Doctors => FfiEntityKind::Doctors,
            EntityKind::Appointments => FfiEntityKind::Appointments,
            EntityKind::MedicalRecords => FfiEntityKind::MedicalRecords,
            EntityKind::Prescriptions => FfiEntityKind::Prescriptions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiLoadState {
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Result of a screen operation: where to go, what to show.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiOutcome {
    /// Route path to navigate to, if any
    pub route: Option<String>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiScreenStatus {
    pub load_state: FfiLoadState,
    pub error: Option<String>,
    pub row_count: u64,
    pub form_open: bool,
    pub form_error: Option<String>,
    pub delete_pending: bool,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiRow {
    pub id: i64,
    pub code: String,
    pub cells: Vec<String>,
}

impl From<RowView> for FfiRow {
    fn from(row: RowView) -> Self {
        Self {
            id: row.id,
            code: row.code,
            cells: row.cells,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiOption {
    pub id: i64,
    pub name: String,
}

/// FFI-safe form field.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiField {
    pub name: String,
    pub label: String,
    /// `text`, `date`, `choice` or `reference`
    pub kind: String,
    pub required: bool,
    pub value: String,
    pub choices: Vec<String>,
    pub options: Vec<FfiOption>,
}

impl From<FieldView> for FfiField {
    fn from(field: FieldView) -> Self {
        let (kind, choices) = match field.kind {
            FieldKind::Text => ("text", Vec::new()),
            FieldKind::Date => ("date", Vec::new()),
            FieldKind::Choice(values) => ("choice", values.iter().map(|v| v.to_string()).collect()),
            FieldKind::Reference(_) => ("reference", Vec::new()),
        };
        Self {
            name: field.name.to_string(),
            label: field.label.to_string(),
            kind: kind.to_string(),
            required: field.required,
            value: field.value,
            choices,
            options: field
                .options
                .into_iter()
                .map(|o| FfiOption {
                    id: o.id,
                    name: o.name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiService {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiChartPoint {
    pub category: String,
    pub value: u32,
}

impl From<ChartPoint> for FfiChartPoint {
    fn from(point: ChartPoint) -> Self {
        Self {
            category: point.category,
            value: point.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiDoctorSlot {
    pub id: i64,
    pub name: String,
    pub scheduled: bool,
}

impl From<DoctorSlot> for FfiDoctorSlot {
    fn from(slot: DoctorSlot) -> Self {
        Self {
            id: slot.id,
            name: slot.name,
            scheduled: slot.scheduled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiProfile {
    pub nama: String,
    pub email: String,
    pub telepon: String,
    pub alamat: String,
    pub foto: Option<String>,
}

impl From<Profile> for FfiProfile {
    fn from(profile: Profile) -> Self {
        Self {
            nama: profile.nama,
            email: profile.email,
            telepon: profile.telepon,
            alamat: profile.alamat,
            foto: profile.foto,
        }
    }
}
