//! Gateway contract: credential injection, the 401/403 asymmetry, envelope
//! unwrapping, and verbatim validation messages.

use finca_client::{ApiError, AuthEvent, Finca, Method};
use finca_core::{NuevaPropiedad, Rol};
use finca_test_utils::{
    cliente, error_json, init_tracing, login_respuesta, no_content, ok_bytes, ok_enveloped,
    ok_json, propiedad, usuario, MockSender,
};

async fn engine_admin(mock: &std::sync::Arc<MockSender>) -> Finca {
    mock.on(
        Method::Post,
        "/auth/login",
        login_respuesta("tok-adm", &usuario(1, Rol::Admin)),
    );
    let finca = Finca::with_sender(mock.clone());
    finca.session.login("admin@x.com", "secret").await.unwrap();
    finca
}

fn nueva_propiedad() -> NuevaPropiedad {
    NuevaPropiedad {
        titulo: "Atico".to_string(),
        direccion: "Calle Sol 4".to_string(),
        descripcion: None,
        precio: 1200.0,
        id_agente: None,
    }
}

#[tokio::test]
async fn bearer_token_attached_to_authenticated_calls() {
    init_tracing();
    let mock = MockSender::new();
    let finca = engine_admin(&mock).await;
    mock.on(Method::Get, "/propiedades", ok_json(&vec![propiedad(1)]));

    finca.propiedades.fetch_all().await;

    let requests = mock.requests_for(Method::Get, "/propiedades");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].bearer.as_deref(), Some("tok-adm"));
}

#[tokio::test]
async fn unauthenticated_calls_carry_no_bearer() {
    init_tracing();
    let mock = MockSender::new();
    mock.on(Method::Get, "/propiedades", ok_json(&vec![propiedad(1)]));
    let finca = Finca::with_sender(mock.clone());

    finca.propiedades.fetch_all().await;
    assert!(mock.requests_for(Method::Get, "/propiedades")[0]
        .bearer
        .is_none());
}

#[tokio::test]
async fn unauthorized_clears_session_and_broadcasts_expiry() {
    init_tracing();
    let mock = MockSender::new();
    let finca = engine_admin(&mock).await;
    let mut events = finca.session.handle().events();

    // Seed a collection, then have the next fetch come back 401.
    mock.on(Method::Get, "/propiedades", ok_json(&vec![propiedad(1)]));
    mock.on(Method::Get, "/propiedades", error_json(401, "token vencido"));
    finca.propiedades.fetch_all().await;
    finca.propiedades.fetch_all().await;

    // Session is gone before the caller even sees the result.
    assert!(!finca.session.current().is_authenticated());
    assert_eq!(events.try_recv().unwrap(), AuthEvent::SesionExpirada);

    // Stale data stays visible; the error is recorded, not a crash.
    assert_eq!(finca.propiedades.propiedades().len(), 1);
    assert!(finca.propiedades.last_error().is_some());
}

#[tokio::test]
async fn forbidden_passes_through_without_global_action() {
    init_tracing();
    let mock = MockSender::new();
    let finca = engine_admin(&mock).await;
    let mut events = finca.session.handle().events();
    mock.on(
        Method::Post,
        "/propiedades",
        error_json(403, "no es su propiedad"),
    );

    let result = finca.propiedades.create(&nueva_propiedad()).await;
    assert!(matches!(result, Err(ApiError::Authorization { .. })));

    // 403 is caller business: session untouched, no expiry event.
    assert!(finca.session.current().is_authenticated());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn both_envelope_shapes_unwrap() {
    init_tracing();
    let mock = MockSender::new();
    let finca = engine_admin(&mock).await;
    mock.on(
        Method::Get,
        "/clientes",
        ok_enveloped(&vec![cliente(1), cliente(2)]),
    );
    mock.on(Method::Get, "/propiedades", ok_json(&vec![propiedad(1)]));

    assert_eq!(finca.clientes.fetch_all().await.len(), 2);
    assert_eq!(finca.propiedades.fetch_all().await.len(), 1);
}

#[tokio::test]
async fn validation_message_forwarded_verbatim() {
    init_tracing();
    let mock = MockSender::new();
    let finca = engine_admin(&mock).await;
    mock.on(
        Method::Post,
        "/propiedades",
        error_json(422, "el precio debe ser positivo"),
    );

    let err = finca
        .propiedades
        .create(&nueva_propiedad())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "el precio debe ser positivo");
}

#[tokio::test]
async fn server_errors_do_not_destroy_state() {
    init_tracing();
    let mock = MockSender::new();
    let finca = engine_admin(&mock).await;
    mock.on(Method::Get, "/propiedades", ok_json(&vec![propiedad(1)]));
    mock.on(Method::Get, "/propiedades", error_json(500, "boom"));

    finca.propiedades.fetch_all().await;
    finca.propiedades.fetch_all().await;
    assert_eq!(finca.propiedades.propiedades().len(), 1);
}

#[tokio::test]
async fn contract_document_arrives_as_opaque_bytes() {
    init_tracing();
    let mock = MockSender::new();
    let finca = engine_admin(&mock).await;
    mock.on(
        Method::Get,
        "/alquileres/5/contrato",
        ok_bytes(b"%PDF-1.7 contrato".to_vec()),
    );

    let bytes = finca.alquileres.contrato(5).await.unwrap();
    assert_eq!(bytes, b"%PDF-1.7 contrato");
}

#[tokio::test]
async fn delete_tolerates_no_content() {
    init_tracing();
    let mock = MockSender::new();
    let finca = engine_admin(&mock).await;
    mock.on(Method::Get, "/propiedades", ok_json(&vec![propiedad(3)]));
    mock.on(Method::Delete, "/propiedades/3", no_content());

    finca.propiedades.fetch_all().await;
    finca
        .propiedades
        .remove(finca_core::PropiedadId::new(3))
        .await
        .unwrap();
    assert!(finca.propiedades.propiedades().is_empty());
}
