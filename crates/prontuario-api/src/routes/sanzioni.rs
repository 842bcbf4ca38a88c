//! # Violation Catalog API
//!
//! Browsing runs the filter/sort pipeline over the live snapshot: exact
//! category match, case-insensitive search across the six text fields,
//! order by article then paragraph number. Writes go through the store
//! and patch the snapshot on success.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use prontuario_core::{
    classify, CatalogStats, CategoryBadge, ColorTag, Pmr, PmrError, ValidationError,
    ViolationDraft, ViolationId, ViolationRecord, VisibleQuery,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Create/edit payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftRequest {
    #[schema(example = "Art. 7")]
    pub articolo: String,
    #[serde(default)]
    #[schema(example = "1")]
    pub comma: Option<String>,
    #[serde(default)]
    #[schema(example = "CONVIVENZA CIVILE")]
    pub categoria: String,
    pub descrizione: String,
    /// Euro amount: `"150.00"`, `"150,00"`, `"€ 80"` or a number.
    ///
    /// Kept raw so that an unreadable amount is reported as a `pmr`
    /// validation error rather than a malformed body.
    #[serde(default)]
    #[schema(value_type = String, example = "150.00")]
    pub pmr: serde_json::Value,
    #[serde(default)]
    pub sanzioni_accessorie: Option<String>,
    #[serde(default)]
    pub altro: Option<String>,
}

impl DraftRequest {
    fn to_draft(&self) -> Result<ViolationDraft, ValidationError> {
        Ok(ViolationDraft {
            articolo: self.articolo.clone(),
            comma: self.comma.clone(),
            categoria: self.categoria.clone(),
            descrizione: self.descrizione.clone(),
            pmr: parse_amount(&self.pmr)?,
            sanzioni_accessorie: self.sanzioni_accessorie.clone(),
            altro: self.altro.clone(),
        }
        .normalized())
    }
}

impl Validate for DraftRequest {
    fn validate(&self) -> Result<(), AppError> {
        self.to_draft()?.validate()?;
        Ok(())
    }
}

fn parse_amount(value: &serde_json::Value) -> Result<Pmr, ValidationError> {
    use serde_json::Value;

    let pmr = match value {
        Value::Null => return Err(ValidationError::MissingField { field: "pmr" }),
        Value::String(text) => Pmr::parse_decimal(text)?,
        Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(euros), _) => Pmr::from_euros(euros)?,
            (None, Some(euros)) => Pmr::from_euro_f64(euros)?,
            (None, None) => return Err(PmrError::OutOfRange(n.to_string()).into()),
        },
        other => return Err(PmrError::NoDigits(other.to_string()).into()),
    };
    Ok(pmr)
}

/// A record as served, with its category color.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SanzioneResponse {
    pub id: Uuid,
    pub articolo: String,
    pub comma: Option<String>,
    pub categoria: String,
    pub descrizione: String,
    /// Dot-decimal euro amount.
    #[schema(example = "150.00")]
    pub pmr: String,
    /// Amount as the catalog prints it.
    #[schema(example = "150,00")]
    pub pmr_label: String,
    pub sanzioni_accessorie: Option<String>,
    pub altro: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[schema(value_type = String, example = "teal")]
    pub color: ColorTag,
    /// Badge classes for the category.
    pub badge: String,
}

impl From<&ViolationRecord> for SanzioneResponse {
    fn from(record: &ViolationRecord) -> Self {
        let color = classify(Some(&record.categoria));
        Self {
            id: *record.id.as_uuid(),
            articolo: record.articolo.clone(),
            comma: record.comma.clone(),
            categoria: record.categoria.clone(),
            descrizione: record.descrizione.clone(),
            pmr: record.pmr.to_decimal_string(),
            pmr_label: record.pmr.to_string(),
            sanzioni_accessorie: record.sanzioni_accessorie.clone(),
            altro: record.altro.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
            color,
            badge: color.style().badge.to_string(),
        }
    }
}

/// Badge for the selected category.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BadgeResponse {
    /// Label cut to 40 characters.
    pub label: String,
    /// Full label.
    pub title: String,
    #[schema(value_type = String)]
    pub color: ColorTag,
    pub badge: String,
}

impl From<CategoryBadge> for BadgeResponse {
    fn from(b: CategoryBadge) -> Self {
        Self {
            label: b.label,
            title: b.title,
            color: b.color,
            badge: b.style.badge.to_string(),
        }
    }
}

/// Stats bar.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total: usize,
    pub visible: usize,
    pub search: Option<String>,
    pub category: Option<String>,
    pub category_badge: Option<BadgeResponse>,
    /// Snapshot revision the list was computed from.
    pub revision: u64,
}

impl StatsResponse {
    fn new(stats: CatalogStats, revision: u64) -> Self {
        Self {
            total: stats.total,
            visible: stats.visible,
            search: stats.search,
            category: stats.category,
            category_badge: stats.category_badge.map(BadgeResponse::from),
            revision,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListResponse {
    pub stats: StatsResponse,
    pub items: Vec<SanzioneResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub count: usize,
    pub revision: u64,
}

/// Query string of the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub categoria: Option<String>,
    pub search: Option<String>,
}

/// Build the violations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/sanzioni", get(list_sanzioni).post(create_sanzione))
        .route("/v1/sanzioni/refresh", post(refresh_catalog))
        .route(
            "/v1/sanzioni/{id}",
            get(get_sanzione).put(update_sanzione).delete(delete_sanzione),
        )
}

/// GET /v1/sanzioni — Visible records in canonical order.
#[utoipa::path(
    get,
    path = "/v1/sanzioni",
    params(
        ("categoria" = Option<String>, Query, description = "Exact category label"),
        ("search" = Option<String>, Query, description = "Case-insensitive text search"),
    ),
    responses(
        (status = 200, description = "Filtered and sorted records", body = ListResponse),
    ),
    tag = "sanzioni"
)]
pub(crate) async fn list_sanzioni(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ListResponse> {
    let query = VisibleQuery::new(
        params.categoria.unwrap_or_default(),
        params.search.unwrap_or_default(),
    );
    let view = state.catalog.view(&query);
    Json(ListResponse {
        stats: StatsResponse::new(view.stats, view.revision),
        items: view.items.iter().map(SanzioneResponse::from).collect(),
    })
}

/// GET /v1/sanzioni/{id} — One record.
#[utoipa::path(
    get,
    path = "/v1/sanzioni/{id}",
    params(("id" = Uuid, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record found", body = SanzioneResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "sanzioni"
)]
pub(crate) async fn get_sanzione(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SanzioneResponse>, AppError> {
    let id = ViolationId(id);
    state
        .catalog
        .get(id)
        .map(|record| Json(SanzioneResponse::from(&record)))
        .ok_or_else(|| AppError::NotFound(id.to_string()))
}

/// POST /v1/sanzioni — Create a record.
#[utoipa::path(
    post,
    path = "/v1/sanzioni",
    request_body = DraftRequest,
    responses(
        (status = 201, description = "Record created", body = SanzioneResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid draft", body = crate::error::ErrorBody),
    ),
    tag = "sanzioni"
)]
pub(crate) async fn create_sanzione(
    State(state): State<AppState>,
    body: Result<Json<DraftRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SanzioneResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let record = state.catalog.create(req.to_draft()?).await?;
    Ok((StatusCode::CREATED, Json(SanzioneResponse::from(&record))))
}

/// PUT /v1/sanzioni/{id} — Replace every editable field.
#[utoipa::path(
    put,
    path = "/v1/sanzioni/{id}",
    params(("id" = Uuid, Path, description = "Record ID")),
    request_body = DraftRequest,
    responses(
        (status = 200, description = "Record updated", body = SanzioneResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid draft", body = crate::error::ErrorBody),
    ),
    tag = "sanzioni"
)]
pub(crate) async fn update_sanzione(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<DraftRequest>, JsonRejection>,
) -> Result<Json<SanzioneResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let record = state
        .catalog
        .update(ViolationId(id), req.to_draft()?)
        .await?;
    Ok(Json(SanzioneResponse::from(&record)))
}

/// DELETE /v1/sanzioni/{id} — Remove a record.
#[utoipa::path(
    delete,
    path = "/v1/sanzioni/{id}",
    params(("id" = Uuid, Path, description = "Record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "sanzioni"
)]
pub(crate) async fn delete_sanzione(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete(ViolationId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/sanzioni/refresh — Reload from the store.
#[utoipa::path(
    post,
    path = "/v1/sanzioni/refresh",
    responses(
        (status = 200, description = "Catalog reloaded", body = RefreshResponse),
        (status = 503, description = "Store unavailable, previous snapshot kept", body = crate::error::ErrorBody),
    ),
    tag = "sanzioni"
)]
pub(crate) async fn refresh_catalog(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, AppError> {
    let count = state
        .catalog
        .refresh()
        .await
        .map_err(|e| AppError::ServiceUnavailable(format!("catalog reload failed: {e}")))?;
    Ok(Json(RefreshResponse {
        count,
        revision: state.catalog.revision(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DraftRequest {
        serde_json::from_value(serde_json::json!({
            "articolo": "Art. 12",
            "comma": "",
            "categoria": "IGIENE E PUBBLICO DECORO",
            "descrizione": "Abbandono di rifiuti su suolo pubblico",
            "pmr": "150,00",
            "altro": "Recidiva: sanzione raddoppiata"
        }))
        .unwrap()
    }

    #[test]
    fn draft_request_normalizes_blank_optionals() {
        let draft = request().to_draft().unwrap();
        assert_eq!(draft.comma, None);
        assert_eq!(draft.pmr.cents(), 15_000);
        assert!(draft.altro.is_some());
    }

    #[test]
    fn draft_request_validation() {
        assert!(request().validate().is_ok());
        let mut req = request();
        req.categoria = String::new();
        assert!(matches!(req.validate(), Err(AppError::Draft(_))));
    }

    #[test]
    fn draft_request_amount_forms() {
        let cents = |pmr: serde_json::Value| {
            let mut req = request();
            req.pmr = pmr;
            req.to_draft().map(|d| d.pmr.cents())
        };
        assert_eq!(cents(serde_json::json!("€ 80")), Ok(8_000));
        assert_eq!(cents(serde_json::json!("150.50")), Ok(15_050));
        assert_eq!(cents(serde_json::json!(25)), Ok(2_500));
        assert_eq!(cents(serde_json::json!(12.5)), Ok(1_250));

        for bad in [
            serde_json::json!("cinquanta"),
            serde_json::json!(-3),
            serde_json::json!(true),
            serde_json::Value::Null,
        ] {
            let err = cents(bad).unwrap_err();
            assert_eq!(err.field(), Some("pmr"));
        }
    }

    #[test]
    fn response_carries_color_and_amounts() {
        let record =
            ViolationRecord::from_draft(ViolationId::new(), request().to_draft().unwrap(), Utc::now());
        let response = SanzioneResponse::from(&record);
        assert_eq!(response.color, ColorTag::Teal);
        assert!(response.badge.starts_with("bg-teal-100"));
        assert_eq!(response.pmr, "150.00");
        assert_eq!(response.pmr_label, "150,00");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["color"], "teal");
        assert!(json.get("sanzioniAccessorie").is_some());
    }
}
