//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1 spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Prontuario Sanzioni API",
        version = "0.1.0",
        description = "Catalog of municipal administrative violations: browse by category, search, edit records, classify category labels."
    ),
    paths(
        // Sanzioni
        crate::routes::sanzioni::list_sanzioni,
        crate::routes::sanzioni::get_sanzione,
        crate::routes::sanzioni::create_sanzione,
        crate::routes::sanzioni::update_sanzione,
        crate::routes::sanzioni::delete_sanzione,
        crate::routes::sanzioni::refresh_catalog,
        // Categorie
        crate::routes::categorie::list_categories,
        crate::routes::categorie::classify_label,
    ),
    components(schemas(
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Sanzioni DTOs
        crate::routes::sanzioni::DraftRequest,
        crate::routes::sanzioni::SanzioneResponse,
        crate::routes::sanzioni::ListResponse,
        crate::routes::sanzioni::StatsResponse,
        crate::routes::sanzioni::BadgeResponse,
        crate::routes::sanzioni::RefreshResponse,
        // Categorie DTOs
        crate::routes::categorie::CategoryOption,
        crate::routes::categorie::CategoriesResponse,
        crate::routes::categorie::ClassifyResponse,
    )),
    tags(
        (name = "sanzioni", description = "Violation catalog"),
        (name = "categorie", description = "Category table and color classifier"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&str> = spec.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/v1/sanzioni",
            "/v1/sanzioni/{id}",
            "/v1/sanzioni/refresh",
            "/v1/categorie",
            "/v1/categorie/classify",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn spec_has_error_schema() {
        let spec = ApiDoc::openapi();
        let components = spec.components.expect("components");
        assert!(components.schemas.contains_key("ErrorBody"));
        assert!(components.schemas.contains_key("DraftRequest"));
    }
}
