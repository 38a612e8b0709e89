use crate::{
    auth::{AuthUser, Role, RouterAuthExt},
    entities::seller::SellerStatus,
    errors::ApiError,
    handlers::common::{
        created_response, map_service_error, success_response, PaginatedResponse, PaginationParams,
    },
    services::customers::{Credentials, RegisterInput},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, patch, post},
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;

/// Admin account, dashboard and seller moderation endpoints.
pub fn routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", get(logout))
        .route("/me", get(me))
        .route("/dashboard", get(dashboard))
        .route("/customers", get(customer_overview))
        .route("/sellers", get(list_sellers))
        .route("/sellers/{seller_id}", get(seller_detail))
        .route("/sellers/{seller_id}/status", patch(update_seller_status))
        .require_role(Role::Admin);

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let authenticated = state
        .services
        .admins
        .register(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(authenticated))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let authenticated = state
        .services
        .admins
        .login(payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(authenticated))
}

async fn logout() -> impl axum::response::IntoResponse {
    success_response(serde_json::json!({ "status": "Logged out" }))
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let admin = state
        .services
        .admins
        .get(user.id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(admin))
}

async fn dashboard(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let dashboard = state
        .services
        .admins
        .dashboard()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(dashboard))
}

async fn customer_overview(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let overview = state
        .services
        .customers
        .overview()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(overview))
}

#[derive(Debug, Deserialize)]
struct SellerListQuery {
    /// "pending", "active", "deactive" or "all"
    status: Option<String>,
    search: Option<String>,
    #[serde(default = "PaginationParams::default_page")]
    page: u64,
    #[serde(default = "PaginationParams::default_per_page")]
    per_page: u64,
}

fn parse_seller_status(value: &str) -> Result<Option<SellerStatus>, ApiError> {
    if value == "all" {
        return Ok(None);
    }
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map(Some)
        .map_err(|_| ApiError::ValidationError(format!("Unknown seller status '{value}'")))
}

async fn list_sellers(
    State(state): State<AppState>,
    Query(query): Query<SellerListQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let status = match query.status.as_deref() {
        Some(value) => parse_seller_status(value)?,
        None => None,
    };

    let (sellers, total) = state
        .services
        .sellers
        .list_by_status(status, query.page, query.per_page, query.search)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        sellers,
        query.page,
        query.per_page,
        total,
    )))
}

async fn seller_detail(
    State(state): State<AppState>,
    Path(seller_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let seller = state
        .services
        .sellers
        .get(seller_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(seller))
}

#[derive(Debug, Deserialize)]
struct UpdateSellerStatusRequest {
    status: SellerStatus,
}

async fn update_seller_status(
    State(state): State<AppState>,
    Path(seller_id): Path<Uuid>,
    Json(payload): Json<UpdateSellerStatusRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let seller = state
        .services
        .sellers
        .update_status(seller_id, payload.status)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(seller))
}
