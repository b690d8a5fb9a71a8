use serde::{Deserialize, Serialize};

/// Roles del sistema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    /// Cualquier rol distinto de "admin" entra al área de usuario
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("admin") {
            UserRole::Admin
        } else {
            UserRole::User
        }
    }

    /// Prefijo de rutas del área del rol
    pub fn area_prefix(&self) -> &'static str {
        match self {
            UserRole::Admin => "/admin",
            UserRole::User => "/user",
        }
    }
}

/// Secciones de negocio con submenú propio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    ERickshaw,
    Battery,
    SparesServices,
}

impl Section {
    /// Orden fijo del menú lateral
    pub const ALL: [Section; 3] = [Section::ERickshaw, Section::Battery, Section::SparesServices];

    pub fn label(&self) -> &'static str {
        match self {
            Section::ERickshaw => "E-Rickshaw",
            Section::Battery => "Battery",
            Section::SparesServices => "Spares & Services",
        }
    }

    /// Ruta base de la sección, sin prefijo de área
    pub fn base_path(&self) -> &'static str {
        match self {
            Section::ERickshaw => "/e-rickshaw",
            Section::Battery => "/battery",
            Section::SparesServices => "/spares-services",
        }
    }
}

/// Permisos embebidos en el token: un booleano por sección de negocio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionSet {
    pub dashboard: bool,
    #[serde(alias = "erickshaw", alias = "eRikshaw")]
    pub e_rickshaw: bool,
    pub battery: bool,
    #[serde(alias = "spares", alias = "sparesAndServices")]
    pub spares_services: bool,
    pub attendance: bool,
}

impl PermissionSet {
    pub fn allows_section(&self, section: Section) -> bool {
        match section {
            Section::ERickshaw => self.e_rickshaw,
            Section::Battery => self.battery,
            Section::SparesServices => self.spares_services,
        }
    }

    /// Secciones concedidas, en el orden del menú
    pub fn granted_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|section| self.allows_section(*section))
            .collect()
    }
}

/// Claims del JWT que emite el backend al hacer login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(default, alias = "id", alias = "userId")]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Option<PermissionSet>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Información del usuario autenticado
#[derive(Debug, Clone, PartialEq)]
pub struct UserInfo {
    pub user_id: Option<String>,
    pub role_label: String,
    pub role: UserRole,
    pub permissions: PermissionSet,
}
