//! Menú lateral filtrado por permisos
//!
//! Acordeón de una sola sección abierta: abrir una cierra la anterior.

use crate::models::auth::{PermissionSet, Section, UserRole};
use crate::routes::{screens_for, ScreenRoute, ATTENDANCE_PATH, DASHBOARD_PATH};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavMenu {
    area: &'static str,
    show_dashboard: bool,
    show_attendance: bool,
    sections: Vec<Section>,
    open: Option<Section>,
}

/// Entrada del menú ya resuelta con el prefijo de área
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: String,
}

impl NavMenu {
    pub fn new(role: &UserRole, permissions: &PermissionSet) -> Self {
        Self {
            area: role.area_prefix(),
            show_dashboard: permissions.dashboard,
            show_attendance: permissions.attendance,
            sections: permissions.granted_sections(),
            open: None,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn open_section(&self) -> Option<Section> {
        self.open
    }

    pub fn is_open(&self, section: Section) -> bool {
        self.open == Some(section)
    }

    /// Abrir/cerrar una sección; las secciones no concedidas se ignoran
    pub fn toggle(&mut self, section: Section) {
        if !self.sections.contains(&section) {
            return;
        }
        self.open = if self.open == Some(section) {
            None
        } else {
            Some(section)
        };
    }

    pub fn dashboard_link(&self) -> Option<NavLink> {
        self.show_dashboard.then(|| NavLink {
            label: "Dashboard",
            path: format!("{}{}", self.area, DASHBOARD_PATH),
        })
    }

    pub fn attendance_link(&self) -> Option<NavLink> {
        self.show_attendance.then(|| NavLink {
            label: "Attendance",
            path: format!("{}{}", self.area, ATTENDANCE_PATH),
        })
    }

    /// Enlaces de una sección concedida
    pub fn section_links(&self, section: Section) -> Vec<NavLink> {
        if !self.sections.contains(&section) {
            return Vec::new();
        }
        screens_for(section)
            .into_iter()
            .map(|screen: &ScreenRoute| NavLink {
                label: screen.label,
                path: format!("{}{}", self.area, screen.path),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(permissions: PermissionSet) -> NavMenu {
        NavMenu::new(&UserRole::User, &permissions)
    }

    #[test]
    fn test_only_granted_sections_are_shown() {
        let nav = menu(PermissionSet {
            battery: true,
            attendance: true,
            ..PermissionSet::default()
        });
        assert_eq!(nav.sections(), &[Section::Battery]);
        assert!(nav.dashboard_link().is_none());
        assert_eq!(nav.attendance_link().unwrap().path, "/user/attendance");
        assert!(nav.section_links(Section::ERickshaw).is_empty());
        assert_eq!(nav.section_links(Section::Battery)[0].path, "/user/battery/sales");
    }

    #[test]
    fn test_single_open_accordion() {
        let mut nav = menu(PermissionSet {
            e_rickshaw: true,
            battery: true,
            spares_services: true,
            ..PermissionSet::default()
        });

        nav.toggle(Section::Battery);
        assert!(nav.is_open(Section::Battery));

        nav.toggle(Section::SparesServices);
        assert!(nav.is_open(Section::SparesServices));
        assert!(!nav.is_open(Section::Battery));

        nav.toggle(Section::SparesServices);
        assert_eq!(nav.open_section(), None);
    }

    #[test]
    fn test_toggle_ignores_hidden_section() {
        let mut nav = menu(PermissionSet {
            battery: true,
            ..PermissionSet::default()
        });
        nav.toggle(Section::ERickshaw);
        assert_eq!(nav.open_section(), None);
    }
}
