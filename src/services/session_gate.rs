//! Gate de sesión y permisos
//!
//! En cada navegación decodifica el token guardado, comprueba la expiración
//! y decide si la ruta pedida está permitida. Cualquier fallo se trata igual:
//! se borra la sesión guardada y se redirige al login.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::auth::{PermissionSet, Section, UserInfo, UserRole};
use crate::routes::navigation::NavMenu;
use crate::routes::{is_under, normalize, ATTENDANCE_PATH, DASHBOARD_PATH, LOGIN_PATH};
use crate::state::{SessionStore, StoredSession};
use crate::utils::errors::{AuthError, ClientResult};
use crate::utils::jwt::decode_claims;

/// Motivo de una redirección
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectReason {
    /// Token ausente, inválido o expirado
    Unauthenticated(AuthError),
    /// Token válido pero sin permiso para la ruta
    Forbidden,
    /// Sesión válida visitando el login
    AlreadyAuthenticated,
}

/// Resultado de evaluar una ruta
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Allow(UserInfo),
    Redirect { to: String, reason: RedirectReason },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow(_))
    }
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct SessionGate {
    store: Arc<dyn SessionStore>,
    secret: Option<String>,
    clock: Clock,
}

impl SessionGate {
    pub fn new(store: Arc<dyn SessionStore>, secret: Option<String>) -> Self {
        Self {
            store,
            secret,
            clock: Arc::new(Utc::now),
        }
    }

    /// Reloj inyectable para evaluar la expiración
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Decodificar la sesión guardada sin efectos secundarios
    pub fn authenticate(&self) -> Result<UserInfo, AuthError> {
        let stored = self
            .store
            .load()
            .map_err(|e| AuthError::InvalidToken(format!("session store unavailable: {}", e)))?;
        let token = stored
            .token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| AuthError::InvalidToken("no token stored".to_string()))?;

        let claims = decode_claims(&token, self.secret.as_deref())?;
        let permissions = claims
            .permissions
            .ok_or_else(|| AuthError::InvalidToken("token carries no permissions".to_string()))?;

        if let Some(exp) = claims.exp {
            let expired_at = Utc
                .timestamp_opt(exp, 0)
                .single()
                .ok_or_else(|| AuthError::InvalidToken(format!("invalid exp {}", exp)))?;
            if expired_at < (self.clock)() {
                return Err(AuthError::ExpiredToken { expired_at });
            }
        }

        let role_label = claims.role.unwrap_or_default();
        Ok(UserInfo {
            user_id: claims.sub,
            role: UserRole::from_label(&role_label),
            role_label,
            permissions,
        })
    }

    /// Evaluar la ruta actual
    ///
    /// Si la sesión no es válida o la ruta no está permitida se borra la
    /// sesión guardada y se redirige al login.
    pub fn check(&self, path: &str) -> GateDecision {
        let user = match self.authenticate() {
            Ok(user) => user,
            Err(e) => {
                warn!("🔒 Sesión inválida en {}: {}", path, e);
                self.invalidate();
                return GateDecision::Redirect {
                    to: LOGIN_PATH.to_string(),
                    reason: RedirectReason::Unauthenticated(e),
                };
            }
        };

        if is_under(path, LOGIN_PATH) {
            return GateDecision::Redirect {
                to: landing_path(&user),
                reason: RedirectReason::AlreadyAuthenticated,
            };
        }

        if is_path_allowed(&user, path) {
            debug!("✅ Acceso permitido a {} ({})", path, user.role_label);
            GateDecision::Allow(user)
        } else {
            warn!("⛔ Ruta {} no permitida para el rol '{}'", path, user.role_label);
            self.invalidate();
            GateDecision::Redirect {
                to: LOGIN_PATH.to_string(),
                reason: RedirectReason::Forbidden,
            }
        }
    }

    /// Ruta de entrada tras autenticarse (`/login` si la sesión no es válida)
    pub fn default_landing(&self) -> String {
        match self.authenticate() {
            Ok(user) => landing_path(&user),
            Err(_) => LOGIN_PATH.to_string(),
        }
    }

    /// Menú lateral de la sesión actual
    pub fn navigation(&self) -> Option<NavMenu> {
        self.authenticate()
            .ok()
            .map(|user| NavMenu::new(&user.role, &user.permissions))
    }

    /// Guardar el token recibido del login externo
    pub fn store_token(&self, token: &str) -> ClientResult<()> {
        self.store.save(&StoredSession::authenticated(token.trim()))?;
        info!("🔑 Sesión guardada");
        Ok(())
    }

    /// Cerrar sesión: borra token y flag
    pub fn logout(&self) -> ClientResult<()> {
        self.store.clear()?;
        info!("👋 Sesión cerrada");
        Ok(())
    }

    fn invalidate(&self) {
        if let Err(e) = self.store.clear() {
            warn!("⚠️ No se pudo borrar la sesión guardada: {}", e);
        }
    }
}

/// Decidir si una ruta está permitida para el usuario
///
/// Se aceptan rutas con el prefijo del área del rol o sin prefijo; las del
/// otro área se deniegan.
pub fn is_path_allowed(user: &UserInfo, path: &str) -> bool {
    let Some(relative) = relative_path(&user.role, path) else {
        return false;
    };
    let permissions: &PermissionSet = &user.permissions;

    if is_under(relative, DASHBOARD_PATH) {
        return permissions.dashboard;
    }
    if is_under(relative, ATTENDANCE_PATH) {
        return permissions.attendance;
    }
    Section::ALL
        .into_iter()
        .find(|section| is_under(relative, section.base_path()))
        .map_or(false, |section| permissions.allows_section(section))
}

/// Ruta de entrada por prioridad: dashboard, primera sección, asistencia, login
pub fn landing_path(user: &UserInfo) -> String {
    let area = user.role.area_prefix();
    let permissions = &user.permissions;

    if permissions.dashboard {
        return format!("{}{}", area, DASHBOARD_PATH);
    }
    if let Some(section) = permissions.granted_sections().first() {
        return format!("{}{}", area, section.base_path());
    }
    if permissions.attendance {
        return format!("{}{}", area, ATTENDANCE_PATH);
    }
    LOGIN_PATH.to_string()
}

/// Ruta sin el prefijo del área del rol; `None` si pertenece al otro área
pub fn relative_path<'a>(role: &UserRole, path: &'a str) -> Option<&'a str> {
    let path = normalize(path);
    let own = role.area_prefix();
    let other = match role {
        UserRole::Admin => UserRole::User.area_prefix(),
        UserRole::User => UserRole::Admin.area_prefix(),
    };

    if is_under(path, other) {
        return None;
    }
    if is_under(path, own) {
        let rest = &path[own.len()..];
        return Some(if rest.is_empty() { "/" } else { rest });
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemorySessionStore;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use serde_json::{json, Value};

    const NOW: i64 = 1_700_000_000;

    fn token(payload: Value) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload.to_string())
        )
    }

    fn gate_with(payload: Value) -> (SessionGate, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::with_token(token(payload)));
        let gate = SessionGate::new(store.clone(), None)
            .with_clock(|| Utc.timestamp_opt(NOW, 0).unwrap());
        (gate, store)
    }

    fn assert_logged_out(store: &MemorySessionStore) {
        let session = store.load().unwrap();
        assert!(session.token.is_none());
        assert!(session.is_authenticated.is_none());
    }

    #[test]
    fn test_missing_permissions_redirects_and_clears_for_any_path() {
        for path in ["/user/dashboard", "/admin/battery/sales", "/anything", "/login"] {
            let (gate, store) = gate_with(json!({"role": "user", "exp": NOW + 60}));
            let decision = gate.check(path);
            assert!(matches!(
                decision,
                GateDecision::Redirect { ref to, reason: RedirectReason::Unauthenticated(AuthError::InvalidToken(_)) }
                    if to == LOGIN_PATH
            ));
            assert_logged_out(&store);
        }
    }

    #[test]
    fn test_expired_token_redirects_and_clears() {
        for path in ["/user/dashboard", "/user/attendance", "/"] {
            let (gate, store) = gate_with(json!({
                "role": "user",
                "permissions": {"dashboard": true, "attendance": true},
                "exp": NOW - 1
            }));
            let decision = gate.check(path);
            assert!(matches!(
                decision,
                GateDecision::Redirect { reason: RedirectReason::Unauthenticated(AuthError::ExpiredToken { .. }), .. }
            ));
            assert_logged_out(&store);
        }
    }

    #[test]
    fn test_absent_and_malformed_tokens() {
        let store = Arc::new(MemorySessionStore::default());
        let gate = SessionGate::new(store.clone(), None);
        assert!(matches!(gate.authenticate(), Err(AuthError::InvalidToken(_))));
        assert_eq!(gate.default_landing(), LOGIN_PATH);

        store.save(&StoredSession::authenticated("not-a-jwt")).unwrap();
        assert!(!gate.check("/user/dashboard").is_allowed());
        assert_logged_out(&store);
    }

    #[test]
    fn test_token_without_exp_is_accepted() {
        let (gate, _) = gate_with(json!({"role": "user", "permissions": {"dashboard": true}}));
        assert!(gate.check("/user/dashboard").is_allowed());
    }

    #[test]
    fn test_section_access_decisions() {
        let (gate, store) = gate_with(json!({
            "role": "user",
            "permissions": {"battery": true, "attendance": true},
            "exp": NOW + 3600
        }));

        assert!(gate.check("/user/battery/sales").is_allowed());
        assert!(gate.check("/battery/service").is_allowed());
        assert!(gate.check("/user/attendance").is_allowed());
        assert!(store.load().unwrap().token.is_some());

        let decision = gate.check("/user/e-rickshaw/rc-book");
        assert_eq!(
            decision,
            GateDecision::Redirect {
                to: LOGIN_PATH.to_string(),
                reason: RedirectReason::Forbidden
            }
        );
        assert_logged_out(&store);
    }

    #[test]
    fn test_other_area_is_denied() {
        let (gate, _) = gate_with(json!({
            "role": "user",
            "permissions": {"dashboard": true},
        }));
        assert!(!gate.check("/admin/dashboard").is_allowed());

        let (gate, _) = gate_with(json!({
            "role": "admin",
            "permissions": {"dashboard": true},
        }));
        assert!(gate.check("/admin/dashboard").is_allowed());
        assert!(!gate.check("/user/dashboard").is_allowed());
    }

    #[test]
    fn test_single_section_lands_on_its_base_path() {
        let (gate, _) = gate_with(json!({
            "role": "user",
            "permissions": {"sparesServices": true, "attendance": true},
            "exp": NOW + 60
        }));
        assert_eq!(gate.default_landing(), "/user/spares-services");
    }

    #[test]
    fn test_landing_priority() {
        let user = |permissions: PermissionSet| UserInfo {
            user_id: None,
            role_label: "admin".to_string(),
            role: UserRole::Admin,
            permissions,
        };

        let all = PermissionSet {
            dashboard: true,
            e_rickshaw: true,
            battery: true,
            spares_services: true,
            attendance: true,
        };
        assert_eq!(landing_path(&user(all)), "/admin/dashboard");

        let sections = PermissionSet {
            dashboard: false,
            ..all
        };
        assert_eq!(landing_path(&user(sections)), "/admin/e-rickshaw");

        let attendance_only = PermissionSet {
            attendance: true,
            ..PermissionSet::default()
        };
        assert_eq!(landing_path(&user(attendance_only)), "/admin/attendance");
        assert_eq!(landing_path(&user(PermissionSet::default())), LOGIN_PATH);
    }

    #[test]
    fn test_login_path_with_valid_session_goes_to_landing() {
        let (gate, store) = gate_with(json!({"role": "user", "permissions": {"battery": true}}));
        assert_eq!(
            gate.check("/login"),
            GateDecision::Redirect {
                to: "/user/battery".to_string(),
                reason: RedirectReason::AlreadyAuthenticated
            }
        );
        assert!(store.load().unwrap().token.is_some());
    }

    #[test]
    fn test_store_token_and_logout() {
        let store = Arc::new(MemorySessionStore::default());
        let gate = SessionGate::new(store.clone(), None);

        gate.store_token(&token(json!({"role": "user", "permissions": {"dashboard": true}})))
            .unwrap();
        assert_eq!(store.load().unwrap().is_authenticated.as_deref(), Some("true"));
        assert!(gate.navigation().unwrap().dashboard_link().is_some());

        gate.logout().unwrap();
        assert_logged_out(&store);
        assert!(gate.navigation().is_none());
    }
}
