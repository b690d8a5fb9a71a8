use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

use dealer_backoffice::config::EnvironmentConfig;
use dealer_backoffice::services::session_gate::RedirectReason;
use dealer_backoffice::state::{AppState, FileSessionStore, SessionStore};
use dealer_backoffice::{AuthError, GateDecision, SessionGate};

const SECRET: &str = "dealer-secret";

fn signed(claims: Value, secret: &str) -> String {
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

fn session_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("backoffice-{}-{}.json", name, std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

fn gate_for(path: &PathBuf) -> (SessionGate, Arc<FileSessionStore>) {
    let store = Arc::new(FileSessionStore::new(path.clone()));
    (SessionGate::new(store.clone(), Some(SECRET.to_string())), store)
}

#[test]
fn test_login_then_navigate_with_file_session() {
    let path = session_file("navigate");
    let (gate, store) = gate_for(&path);

    let token = signed(
        json!({
            "id": "u-7",
            "role": "staff",
            "permissions": {"eRickshaw": true, "attendance": true},
            "exp": (Utc::now() + Duration::hours(1)).timestamp()
        }),
        SECRET,
    );
    gate.store_token(&token).unwrap();
    assert!(path.exists());

    assert_eq!(gate.default_landing(), "/user/e-rickshaw");
    match gate.check("/user/e-rickshaw/rc-book") {
        GateDecision::Allow(user) => {
            assert_eq!(user.user_id.as_deref(), Some("u-7"));
            assert_eq!(user.role_label, "staff");
        }
        other => panic!("expected access, got {:?}", other),
    }

    let nav = gate.navigation().unwrap();
    assert!(nav.dashboard_link().is_none());
    assert_eq!(nav.section_links(nav.sections()[0]).len(), 4);

    // sección sin permiso: redirige y borra la sesión
    let decision = gate.check("/user/battery/sales");
    assert!(matches!(
        decision,
        GateDecision::Redirect { reason: RedirectReason::Forbidden, .. }
    ));
    assert!(store.load().unwrap().token.is_none());
    assert!(!path.exists());
}

#[test]
fn test_foreign_signature_is_rejected() {
    let path = session_file("signature");
    let (gate, store) = gate_for(&path);

    let token = signed(json!({"role": "admin", "permissions": {"dashboard": true}}), "someone-else");
    gate.store_token(&token).unwrap();

    let decision = gate.check("/admin/dashboard");
    assert!(matches!(
        decision,
        GateDecision::Redirect {
            reason: RedirectReason::Unauthenticated(AuthError::InvalidToken(_)),
            ..
        }
    ));
    assert!(store.load().unwrap().token.is_none());
}

#[test]
fn test_expired_session_is_cleared() {
    let path = session_file("expired");
    let (gate, store) = gate_for(&path);

    let token = signed(
        json!({
            "role": "admin",
            "permissions": {"dashboard": true},
            "exp": (Utc::now() - Duration::minutes(5)).timestamp()
        }),
        SECRET,
    );
    gate.store_token(&token).unwrap();

    assert!(matches!(
        gate.authenticate(),
        Err(AuthError::ExpiredToken { .. })
    ));
    assert!(!gate.check("/admin/dashboard").is_allowed());
    assert!(store.load().unwrap().is_authenticated.is_none());
}

#[test]
fn test_app_state_reads_saved_token() {
    let path = session_file("state");
    let store = FileSessionStore::new(path.clone());
    store
        .save(&dealer_backoffice::state::StoredSession::authenticated("abc.def.ghi"))
        .unwrap();

    let config = EnvironmentConfig {
        session_file: path.clone(),
        api_base_url: "http://127.0.0.1:9/api/".to_string(),
        ..EnvironmentConfig::default()
    };
    let state = AppState::from_config(config).unwrap();
    assert_eq!(state.store.load().unwrap().token.as_deref(), Some("abc.def.ghi"));
    assert_eq!(state.api.base_url(), "http://127.0.0.1:9/api");

    state.store.clear().unwrap();
    assert!(!path.exists());
}
