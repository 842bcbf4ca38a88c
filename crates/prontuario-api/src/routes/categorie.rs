//! # Category API
//!
//! Serves the category table for the search menu and classifies arbitrary
//! labels, so that clients color records exactly as the catalog does.

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use prontuario_core::{classify, ColorTag, Style, ALL_CATEGORIES, CATEGORIES};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// One entry of the category menu.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOption {
    /// Label as stored on records; empty for the "all categories" entry.
    pub value: String,
    pub label: String,
    pub short_label: String,
    /// Absent for the "all categories" entry.
    #[schema(value_type = Option<String>, example = "emerald")]
    pub color: Option<ColorTag>,
    /// Badge classes.
    pub badge: String,
    /// Text classes.
    pub text: String,
}

impl CategoryOption {
    fn all() -> Self {
        Self::styled("", ALL_CATEGORIES, ALL_CATEGORIES, None, Style::NEUTRAL)
    }

    fn styled(
        value: &str,
        label: &str,
        short_label: &str,
        color: Option<ColorTag>,
        style: Style,
    ) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            short_label: short_label.to_string(),
            color,
            badge: style.badge.to_string(),
            text: style.text.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoriesResponse {
    /// The "all categories" entry followed by the canonical categories.
    pub items: Vec<CategoryOption>,
}

/// Classifier result for one label.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassifyResponse {
    pub label: Option<String>,
    #[schema(value_type = String, example = "slate")]
    pub color: ColorTag,
    pub badge: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyParams {
    pub label: Option<String>,
}

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/categorie", get(list_categories))
        .route("/v1/categorie/classify", get(classify_label))
}

/// GET /v1/categorie — Category menu with colors.
#[utoipa::path(
    get,
    path = "/v1/categorie",
    responses(
        (status = 200, description = "Category table", body = CategoriesResponse),
    ),
    tag = "categorie"
)]
pub(crate) async fn list_categories() -> Json<CategoriesResponse> {
    let items = std::iter::once(CategoryOption::all())
        .chain(CATEGORIES.iter().map(|c| {
            CategoryOption::styled(c.value, c.label, c.short_label, Some(c.color), c.color.style())
        }))
        .collect();
    Json(CategoriesResponse { items })
}

/// GET /v1/categorie/classify — Color tag for any label.
#[utoipa::path(
    get,
    path = "/v1/categorie/classify",
    params(("label" = Option<String>, Query, description = "Category label to classify")),
    responses(
        (status = 200, description = "Classification", body = ClassifyResponse),
    ),
    tag = "categorie"
)]
pub(crate) async fn classify_label(Query(params): Query<ClassifyParams>) -> Json<ClassifyResponse> {
    let color = classify(params.label.as_deref());
    let style = color.style();
    Json(ClassifyResponse {
        label: params.label,
        color,
        badge: style.badge.to_string(),
        text: style.text.to_string(),
    })
}
