//! Superficie de rutas del back-office
//!
//! Cada área (`/admin`, `/user`) repite la misma estructura: dashboard,
//! una ruta base por sección con sus pantallas, y asistencia.

pub mod navigation;

use crate::models::auth::Section;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const ATTENDANCE_PATH: &str = "/attendance";

/// Pantalla de listado de una sección
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRoute {
    pub section: Section,
    /// Ruta sin prefijo de área
    pub path: &'static str,
    pub label: &'static str,
    /// Recurso REST que lista la pantalla
    pub resource: &'static str,
}

pub const SCREENS: &[ScreenRoute] = &[
    ScreenRoute {
        section: Section::ERickshaw,
        path: "/e-rickshaw/rc-book",
        label: "RC Book",
        resource: "/rickshaw/rcbook",
    },
    ScreenRoute {
        section: Section::ERickshaw,
        path: "/e-rickshaw/sales-invoice",
        label: "Sales Invoice",
        resource: "/rickshaw/salesinv",
    },
    ScreenRoute {
        section: Section::ERickshaw,
        path: "/e-rickshaw/sales-order",
        label: "Sales Order",
        resource: "/rickshaw/salesorder",
    },
    ScreenRoute {
        section: Section::ERickshaw,
        path: "/e-rickshaw/loan",
        label: "Loan",
        resource: "/rickshaw/loan",
    },
    ScreenRoute {
        section: Section::Battery,
        path: "/battery/sales",
        label: "Battery Sales",
        resource: "/battery/sales",
    },
    ScreenRoute {
        section: Section::Battery,
        path: "/battery/service",
        label: "Battery Service",
        resource: "/battery/service",
    },
    ScreenRoute {
        section: Section::SparesServices,
        path: "/spares-services/inventory",
        label: "Spares Inventory",
        resource: "/spares/inventory",
    },
    ScreenRoute {
        section: Section::SparesServices,
        path: "/spares-services/job-card",
        label: "Job Card",
        resource: "/spares/jobcard",
    },
];

/// Pantallas de una sección, en el orden del submenú
pub fn screens_for(section: Section) -> Vec<&'static ScreenRoute> {
    SCREENS.iter().filter(|screen| screen.section == section).collect()
}

/// Pantalla correspondiente a una ruta relativa al área
pub fn find_screen(relative_path: &str) -> Option<&'static ScreenRoute> {
    let path = normalize(relative_path);
    SCREENS.iter().find(|screen| screen.path == path)
}

/// Quitar query, fragmento y barra final
pub fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default().trim();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// `path` es `prefix` o cuelga de `prefix/`
pub fn is_under(path: &str, prefix: &str) -> bool {
    let path = normalize(path);
    let prefix = normalize(prefix);
    path == prefix
        || path
            .strip_prefix(prefix)
            .map_or(false, |rest| rest.starts_with('/'))
}
