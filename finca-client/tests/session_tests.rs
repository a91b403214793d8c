//! Session lifecycle: login, logout, auth events, and the role-scoped
//! auto-fetch reacting to session changes.

use finca_client::{AuthEvent, Finca, Method};
use finca_core::{ClienteId, EstadoSolicitud, Rol};
use finca_test_utils::{
    alquiler, error_json, init_tracing, login_respuesta, usuario, usuario_cliente, MockSender,
};
use std::time::Duration;

async fn wait_until<F: Fn() -> bool>(cond: F) {
    for _ in 0..100 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn login_populates_principal_and_token() {
    init_tracing();
    let mock = MockSender::new();
    mock.on(
        Method::Post,
        "/auth/login",
        login_respuesta("tok-1", &usuario_cliente(9, 7)),
    );
    let finca = Finca::with_sender(mock.clone());

    let principal = finca.session.login("a@x.com", "secret").await.unwrap();
    assert_eq!(principal.rol, Rol::Cliente);
    assert_eq!(principal.id_cliente, Some(ClienteId::new(7)));

    let sesion = finca.session.current();
    assert!(sesion.is_authenticated());
    assert_eq!(sesion.token.as_deref(), Some("tok-1"));

    // The login call itself went out without a credential.
    let login_requests = mock.requests_for(Method::Post, "/auth/login");
    assert_eq!(login_requests.len(), 1);
    assert!(login_requests[0].bearer.is_none());
}

#[tokio::test]
async fn rejected_credentials_surface_auth_error() {
    init_tracing();
    let mock = MockSender::new();
    mock.on(
        Method::Post,
        "/auth/login",
        error_json(401, "credenciales invalidas"),
    );
    let finca = Finca::with_sender(mock.clone());
    let mut events = finca.session.handle().events();

    let result = finca.session.login("a@x.com", "wrong").await;
    assert!(matches!(
        result,
        Err(finca_client::ApiError::Authentication { .. })
    ));
    assert!(!finca.session.current().is_authenticated());
    // No session existed, so nothing expired: the viewer is already on the
    // login form and must not be bounced there again.
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn logout_clears_synchronously_and_emits_events() {
    init_tracing();
    let mock = MockSender::new();
    mock.on(
        Method::Post,
        "/auth/login",
        login_respuesta("tok-1", &usuario(1, Rol::Admin)),
    );
    let finca = Finca::with_sender(mock.clone());
    let mut events = finca.session.handle().events();

    finca.session.login("admin@x.com", "secret").await.unwrap();
    finca.session.logout();

    // Cleared before any further await: the very next call sees no token.
    assert!(!finca.session.current().is_authenticated());
    assert_eq!(finca.session.current().token, None);

    assert_eq!(events.try_recv().unwrap(), AuthEvent::SesionIniciada);
    assert_eq!(events.try_recv().unwrap(), AuthEvent::SesionCerrada);
}

#[tokio::test]
async fn register_establishes_session() {
    init_tracing();
    let mock = MockSender::new();
    mock.on(
        Method::Post,
        "/auth/register",
        login_respuesta("tok-r", &usuario_cliente(12, 3)),
    );
    let finca = Finca::with_sender(mock.clone());

    let registro = finca_client::Registro {
        nombre: "Nuevo".to_string(),
        email: "nuevo@x.com".to_string(),
        password: "secret".to_string(),
        telefono: None,
    };
    let principal = finca.session.register(&registro).await.unwrap();
    assert_eq!(principal.id_cliente, Some(ClienteId::new(3)));
    assert!(finca.session.current().is_authenticated());
}

#[tokio::test]
async fn auto_fetch_follows_session_scope() {
    init_tracing();
    let mock = MockSender::new();
    mock.on(
        Method::Post,
        "/auth/login",
        login_respuesta("tok-1", &usuario_cliente(9, 7)),
    );
    mock.on(
        Method::Get,
        "/alquileres/cliente/7",
        finca_test_utils::ok_json(&vec![alquiler(1, 7, EstadoSolicitud::Pendiente)]),
    );
    let finca = Finca::with_sender(mock.clone());
    let _tasks = finca.start_auto_fetch();

    // No session yet: nothing fetched.
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(mock.request_count(Method::Get, "/alquileres/cliente/7"), 0);

    finca.session.login("a@x.com", "secret").await.unwrap();
    let alquileres = finca.alquileres.clone();
    wait_until(|| alquileres.solicitudes().len() == 1).await;

    // Logout suppresses further fetches and drops the cached rows.
    finca.session.logout();
    wait_until(|| alquileres.solicitudes().is_empty()).await;
    let fetches = mock.request_count(Method::Get, "/alquileres/cliente/7");
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(
        mock.request_count(Method::Get, "/alquileres/cliente/7"),
        fetches
    );
}
