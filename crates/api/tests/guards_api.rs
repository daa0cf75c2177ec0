//! Authentication, role-guard and input-validation behaviour.
//!
//! Every request here is rejected before any query runs, so the app is
//! built over a pool that never connects.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_offline_app, get, get_auth, json_request, patch_auth, post_json, post_json_auth, token_for};
use serde_json::json;

#[tokio::test]
async fn missing_token_is_401() {
    let response = get(build_offline_app(), "/api/projets").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_is_401() {
    let response = get_auth(build_offline_app(), "/api/user", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_with_unknown_role_is_401() {
    let token = token_for(7, "superviseur");
    let response = get_auth(build_offline_app(), "/api/notifications", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn donor_cannot_create_village() {
    let token = token_for(4, "donateur");
    let body = json!({ "nom": "Siby", "region": "Koulikoro", "population": 12000 });

    let response = post_json_auth(build_offline_app(), "/api/villages", &token, body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");
}

#[tokio::test]
async fn donor_cannot_create_projet() {
    let token = token_for(4, "donateur");
    let body = json!({
        "titre": "Forage",
        "description": "Un forage pour le village",
        "budget": 1500000.0,
        "village_id": 1
    });

    let response = post_json_auth(build_offline_app(), "/api/projets", &token, body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn prestataire_cannot_validate_projet() {
    let token = token_for(2, "prestataire");
    let response = patch_auth(build_offline_app(), "/api/projets/1/valider", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn donor_cannot_change_projet_statut() {
    let token = token_for(4, "donateur");
    let response = json_request(
        build_offline_app(),
        Method::PATCH,
        "/api/projets/1/statut",
        Some(&token),
        json!({ "statut": "en_cours" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_routes_reject_prestataire() {
    let token = token_for(2, "prestataire");
    for uri in ["/api/admin/users", "/api/admin/stats", "/api/admin/contact-messages"] {
        let response = get_auth(build_offline_app(), uri, &token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[tokio::test]
async fn invalid_registration_returns_field_errors() {
    let body = json!({
        "name": "A",
        "email": "not-an-email",
        "password": "short",
        "role": "administrateur"
    });

    let response = post_json(build_offline_app(), "/api/register", body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    for field in ["name", "email", "password", "role"] {
        assert!(json["errors"][field].is_array(), "missing error for {field}");
    }
}

#[tokio::test]
async fn registration_with_missing_field_is_422() {
    let body = json!({ "email": "awa@example.ml", "password": "motdepasse" });

    let response = post_json(build_offline_app(), "/api/register", body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn contact_form_validates_email() {
    let body = json!({ "nom": "Awa", "email": "awa", "message": "Bonjour" });

    let response = post_json(build_offline_app(), "/api/public/contact", body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(response).await["errors"]["email"].is_array());
}

#[tokio::test]
async fn offer_amount_must_be_positive() {
    let token = token_for(4, "donateur");
    let response = post_json_auth(
        build_offline_app(),
        "/api/projets/1/offres",
        &token,
        json!({ "montant": 0.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn offer_amount_beyond_numeric_precision_is_422() {
    let token = token_for(4, "donateur");
    let response = post_json_auth(
        build_offline_app(),
        "/api/projets/1/offres",
        &token,
        json!({ "montant": 1e13 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(response).await["errors"]["montant"].is_array());
}

#[tokio::test]
async fn projet_budget_beyond_numeric_precision_is_422() {
    let token = token_for(2, "prestataire");
    let body = json!({
        "titre": "Forage",
        "description": "Un forage pour le village",
        "budget": 1e13,
        "village_id": 1
    });

    let response = post_json_auth(build_offline_app(), "/api/projets", &token, body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(response).await["errors"]["budget"].is_array());

    let response = json_request(
        build_offline_app(),
        Method::PUT,
        "/api/projets/1",
        Some(&token),
        json!({ "budget": 1e13 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn requests_get_a_request_id() {
    let response = get(build_offline_app(), "/api/projets").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let response = get(build_offline_app(), "/this-route-does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
