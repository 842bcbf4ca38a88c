//! # Integration Tests for prontuario-api
//!
//! Drives the assembled router with `oneshot` requests: health probes,
//! catalog browsing through the query string, record CRUD status codes,
//! draft validation, the category endpoints and the OpenAPI document.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use prontuario_api::state::AppState;
use prontuario_api::AppConfig;
use prontuario_store::{AnyStore, InMemoryStore, LiveCatalog};

/// Helper: app over the two example records.
async fn test_app() -> axum::Router {
    let state = AppState::in_memory(InMemoryStore::with_examples())
        .await
        .unwrap();
    prontuario_api::app(state)
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::http::Response<Body>) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn draft(articolo: &str, comma: &str, categoria: &str) -> Value {
    json!({
        "articolo": articolo,
        "comma": comma,
        "categoria": categoria,
        "descrizione": "Occupazione abusiva di suolo pubblico",
        "pmr": "200,00",
        "sanzioniAccessorie": "",
        "altro": ""
    })
}

fn articoli(list: &Value) -> Vec<String> {
    list["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| {
            format!(
                "{}/{}",
                item["articolo"].as_str().unwrap(),
                item["comma"].as_str().unwrap_or("-")
            )
        })
        .collect()
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let app = test_app().await;
    let response = app.oneshot(get("/health/liveness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_probe() {
    let app = test_app().await;
    let response = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

#[tokio::test]
async fn test_readiness_before_first_load_is_503() {
    let catalog = LiveCatalog::new(AnyStore::from(InMemoryStore::with_examples()));
    let app = prontuario_api::app(AppState::new(catalog, AppConfig::default()));
    let response = app.oneshot(get("/health/readiness")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(body_string(response).await.contains("not loaded"));
}

// -- Catalog Browsing ---------------------------------------------------------

#[tokio::test]
async fn test_list_returns_sorted_records_with_colors() {
    let app = test_app().await;
    let response = app.oneshot(get("/v1/sanzioni")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(articoli(&body), ["Art. 7/1", "Art. 12/3"]);
    assert_eq!(body["items"][0]["color"], "emerald");
    assert_eq!(body["items"][1]["color"], "teal");
    assert_eq!(body["items"][1]["pmr"], "150.00");
    assert_eq!(body["stats"]["total"], 2);
    assert_eq!(body["stats"]["visible"], 2);
    assert!(body["stats"]["search"].is_null());
    assert!(body["stats"]["categoryBadge"].is_null());
}

#[tokio::test]
async fn test_list_filters_by_exact_category() {
    let app = test_app().await;
    let response = app
        .oneshot(get("/v1/sanzioni?categoria=CONVIVENZA%20CIVILE"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(articoli(&body), ["Art. 7/1"]);
    assert_eq!(body["stats"]["visible"], 1);
    assert_eq!(body["stats"]["category"], "CONVIVENZA CIVILE");
    assert_eq!(body["stats"]["categoryBadge"]["color"], "emerald");

    let app = test_app().await;
    let response = app
        .oneshot(get("/v1/sanzioni?categoria=CONVIVENZA%20CIVILE%20"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(body["stats"]["total"], 2);
}

#[tokio::test]
async fn test_list_search_is_case_insensitive() {
    let app = test_app().await;
    let response = app
        .oneshot(get("/v1/sanzioni?search=recidiva"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(articoli(&body), ["Art. 12/3"]);
    assert_eq!(body["stats"]["search"], "recidiva");
}

#[tokio::test]
async fn test_list_blank_search_shows_everything() {
    let app = test_app().await;
    let response = app.oneshot(get("/v1/sanzioni?search=%20%20")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["stats"]["visible"], 2);
    assert!(body["stats"]["search"].is_null());
}

// -- Record CRUD ----------------------------------------------------------------

#[tokio::test]
async fn test_create_then_get() {
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/v1/sanzioni",
            &draft("Art. 9", "2", "OCCUPAZIONE DI SUOLO PUBBLICO"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["pmr"], "200.00");
    assert_eq!(created["pmrLabel"], "200,00");
    assert!(created["sanzioniAccessorie"].is_null());
    let id = created["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/sanzioni/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["articolo"], "Art. 9");

    let response = app.oneshot(get("/v1/sanzioni")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(articoli(&body), ["Art. 7/1", "Art. 9/2", "Art. 12/3"]);
}

#[tokio::test]
async fn test_update_replaces_fields() {
    let app = test_app().await;
    let list = body_json(app.clone().oneshot(get("/v1/sanzioni")).await.unwrap()).await;
    let id = list["items"][0]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/v1/sanzioni/{id}"),
            &draft("Art. 20", "", "COMMERCIO"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["id"], id.as_str());
    assert!(updated["comma"].is_null());

    let list = body_json(app.oneshot(get("/v1/sanzioni")).await.unwrap()).await;
    assert_eq!(articoli(&list), ["Art. 12/3", "Art. 20/-"]);
}

#[tokio::test]
async fn test_delete_then_404() {
    let app = test_app().await;
    let list = body_json(app.clone().oneshot(get("/v1/sanzioni")).await.unwrap()).await;
    let id = list["items"][1]["id"].as_str().unwrap().to_string();
    let uri = format!("/v1/sanzioni/{id}");

    let delete = || Request::builder().method("DELETE").uri(&uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(delete()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_update_unknown_id_is_404() {
    let app = test_app().await;
    let response = app
        .oneshot(send_json(
            "PUT",
            "/v1/sanzioni/00000000-0000-0000-0000-000000000000",
            &draft("Art. 1", "", "COMMERCIO"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_is_rejected() {
    let app = test_app().await;
    let response = app.oneshot(get("/v1/sanzioni/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// -- Draft Validation ---------------------------------------------------------

#[tokio::test]
async fn test_missing_category_is_422_with_field() {
    let app = test_app().await;
    let response = app
        .oneshot(send_json("POST", "/v1/sanzioni", &draft("Art. 3", "", "  ")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"]["field"], "categoria");
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let app = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/sanzioni")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_unparseable_amount_is_rejected() {
    let app = test_app().await;
    let mut body = draft("Art. 3", "", "COMMERCIO");
    body["pmr"] = json!("cinquanta");
    let response = app
        .clone()
        .oneshot(send_json("POST", "/v1/sanzioni", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = body_json(response).await;
    assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(error["error"]["details"]["field"], "pmr");

    let list = body_json(app.oneshot(get("/v1/sanzioni")).await.unwrap()).await;
    assert_eq!(list["stats"]["total"], 2);
}

#[tokio::test]
async fn test_amount_with_currency_sign_is_accepted() {
    let app = test_app().await;
    let mut body = draft("Art. 4", "", "COMMERCIO");
    body["pmr"] = json!("€ 80");
    let response = app
        .oneshot(send_json("POST", "/v1/sanzioni", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["pmr"], "80.00");
    assert_eq!(created["pmrLabel"], "80,00");
}

// -- Refresh --------------------------------------------------------------------

#[tokio::test]
async fn test_refresh_reports_count_and_revision() {
    let app = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/sanzioni/refresh")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 2);
    assert!(body["revision"].as_u64().unwrap() >= 2);
}

// -- Categories -----------------------------------------------------------------

#[tokio::test]
async fn test_categories_menu() {
    let app = test_app().await;
    let response = app.oneshot(get("/v1/categorie")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 12);
    assert_eq!(items[0]["value"], "");
    assert_eq!(items[0]["label"], "Tutte le categorie");
    assert!(items[0]["color"].is_null());
    assert!(items[1..].iter().all(|item| item["color"].is_string()));
}

#[tokio::test]
async fn test_classify_known_and_unknown_labels() {
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(get("/v1/categorie/classify?label=PASCOLO%20E%20CONDUZIONE%20DI%20BESTIAME"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["color"], "green");

    let response = app
        .clone()
        .oneshot(get("/v1/categorie/classify?label=qualcosa"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["color"], "slate");

    let response = app.oneshot(get("/v1/categorie/classify")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["color"], "slate");
    assert!(body["label"].is_null());
}

// -- OpenAPI --------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_document() {
    let app = test_app().await;
    let response = app.oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["info"]["title"], "Prontuario Sanzioni API");
    assert!(body["paths"]["/v1/sanzioni/{id}"].is_object());
}
