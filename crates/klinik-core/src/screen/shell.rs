//! Navigation shell: route table, menu and logout confirmation.

use tracing::{info, warn};

use super::{EntityKind, ScreenEffect};
use crate::api::Method;
use crate::context::AppContext;
use crate::storage::StorageResult;

/// Application routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    Services,
    Patients,
    Doctors,
    Appointments,
    MedicalRecords,
    Prescriptions,
    Profile,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::Login,
        Route::Dashboard,
        Route::Services,
        Route::Patients,
        Route::Doctors,
        Route::Appointments,
        Route::MedicalRecords,
        Route::Prescriptions,
        Route::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::Services => "/layanan",
            Route::Patients => "/pasien",
            Route::Doctors => "/dokter",
            Route::Appointments => "/janjitemu",
            Route::MedicalRecords => "/rekammedis",
            Route::Prescriptions => "/resepobat",
            Route::Profile => "/profil",
        }
    }

    /// Resolve a path. `/` redirects to the login page.
    pub fn from_path(path: &str) -> Option<Route> {
        let path = match path.trim_end_matches('/') {
            "" => return Some(Route::Login),
            p => p,
        };
        Route::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Entity whose list screen lives at this route.
    pub fn entity(&self) -> Option<EntityKind> {
        match self {
            Route::Patients => Some(EntityKind::Patients),
            Route::Doctors => Some(EntityKind::Doctors),
            Route::Appointments => Some(EntityKind::Appointments),
            Route::MedicalRecords => Some(EntityKind::MedicalRecords),
            Route::Prescriptions => Some(EntityKind::Prescriptions),
            _ => None,
        }
    }

    pub fn for_entity(kind: EntityKind) -> Route {
        match kind {
            EntityKind::Patients => Route::Patients,
            EntityKind::Doctors => Route::Doctors,
            EntityKind::Appointments => Route::Appointments,
            EntityKind::MedicalRecords => Route::MedicalRecords,
            EntityKind::Prescriptions => Route::Prescriptions,
        }
    }
}

/// One tile of the services menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceEntry {
    pub label: &'static str,
    pub route: Route,
}

/// The services menu (`/layanan`): one tile per entity screen.
pub fn services() -> Vec<ServiceEntry> {
    EntityKind::ALL
        .into_iter()
        .map(|kind| ServiceEntry {
            label: service_label(kind),
            route: Route::for_entity(kind),
        })
        .collect()
}

fn service_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Patients => "PASIEN",
        EntityKind::Doctors => "DOKTER",
        EntityKind::Appointments => "JANJI TEMU",
        EntityKind::MedicalRecords => "REKAM MEDIS",
        EntityKind::Prescriptions => "RESEP OBAT",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationShell {
    route: Route,
    menu_open: bool,
    logout_prompt: bool,
}

impl Default for NavigationShell {
    fn default() -> Self {
        Self {
            route: Route::Login,
            menu_open: false,
            logout_prompt: false,
        }
    }
}

impl NavigationShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn is_logout_prompt_open(&self) -> bool {
        self.logout_prompt
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub fn navigate(&mut self, route: Route) {
        self.route = route;
        self.menu_open = false;
    }

    /// Navigate by path; unknown paths leave the shell where it is.
    pub fn navigate_path(&mut self, path: &str) -> Option<Route> {
        let route = Route::from_path(path)?;
        self.navigate(route);
        Some(route)
    }

    /// Follow a screen's navigation request.
    pub fn apply(&mut self, effect: ScreenEffect) -> Option<Route> {
        let route = match effect {
            ScreenEffect::None => return None,
            ScreenEffect::RedirectToLogin => Route::Login,
            ScreenEffect::Navigate(route) => route,
        };
        self.navigate(route);
        Some(route)
    }

    pub fn request_logout(&mut self) {
        self.menu_open = false;
        self.logout_prompt = true;
    }

    /// Outside click on the prompt.
    pub fn dismiss_logout(&mut self) {
        self.logout_prompt = false;
    }

    /// Tell the server (best effort), clear the session, go to login.
    pub fn confirm_logout(&mut self, ctx: &mut AppContext) -> StorageResult<()> {
        if let Some(token) = ctx.bearer() {
            if let Err(e) = ctx.api.send(Method::Post, "/logout", None, Some(&token)) {
                warn!("Server logout failed: {}", e);
            }
        }
        ctx.session.logout()?;
        self.logout_prompt = false;
        self.navigate(Route::Login);
        info!("Logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTransport;

    #[test]
    fn test_route_table() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/"), Some(Route::Login));
        assert_eq!(Route::from_path("/pasien/"), Some(Route::Patients));
        assert_eq!(Route::from_path("/kasir"), None);
    }

    #[test]
    fn test_services_cover_every_entity() {
        let entries = services();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].label, "PASIEN");
        assert_eq!(entries[4].route.path(), "/resepobat");
        assert!(entries.iter().all(|e| e.route.entity().is_some()));
    }

    #[test]
    fn test_menu_closes_on_navigate() {
        let mut shell = NavigationShell::new();
        shell.toggle_menu();
        assert!(shell.is_menu_open());
        shell.navigate(Route::Doctors);
        assert!(!shell.is_menu_open());
        assert_eq!(shell.route(), Route::Doctors);
        assert_eq!(shell.navigate_path("/nowhere"), None);
        assert_eq!(shell.route(), Route::Doctors);
    }

    #[test]
    fn test_apply_effects() {
        let mut shell = NavigationShell::new();
        assert_eq!(shell.apply(ScreenEffect::Navigate(Route::Dashboard)), Some(Route::Dashboard));
        assert_eq!(shell.apply(ScreenEffect::None), None);
        assert_eq!(shell.route(), Route::Dashboard);
        assert_eq!(shell.apply(ScreenEffect::RedirectToLogin), Some(Route::Login));
    }

    #[test]
    fn test_logout_survives_server_failure() {
        let mock = MockTransport::new();
        mock.fail(Method::Post, "/logout", "connection reset");
        let mut ctx = AppContext::in_memory(mock.client()).unwrap();
        ctx.session.login("T1").unwrap();

        let mut shell = NavigationShell::new();
        shell.navigate(Route::Dashboard);
        shell.request_logout();
        shell.confirm_logout(&mut ctx).unwrap();

        assert_eq!(ctx.bearer(), None);
        assert!(!ctx.session.is_authenticated());
        assert_eq!(shell.route(), Route::Login);
        assert!(!shell.is_logout_prompt_open());
        assert_eq!(mock.requests_to(Method::Post, "/logout").len(), 1);
    }

    #[test]
    fn test_dismiss_keeps_session() {
        let mock = MockTransport::new();
        let mut ctx = AppContext::in_memory(mock.client()).unwrap();
        ctx.session.login("T1").unwrap();

        let mut shell = NavigationShell::new();
        shell.request_logout();
        shell.dismiss_logout();
        assert!(!shell.is_logout_prompt_open());
        assert_eq!(ctx.bearer(), Some("T1".into()));
        assert_eq!(mock.request_count(), 0);
    }
}
