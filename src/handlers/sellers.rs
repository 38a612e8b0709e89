use crate::{
    auth::{AuthUser, Role, RouterAuthExt},
    errors::ApiError,
    handlers::common::{created_response, map_service_error, read_multipart, success_response},
    services::customers::{Credentials, RegisterInput},
    AppState,
};
use axum::{
    extract::{Json, Multipart, Path, State},
    routing::{get, patch, post},
    Extension, Router,
};
use uuid::Uuid;

/// Seller account, profile and dashboard endpoints.
pub fn routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", get(logout))
        .route("/me", get(me))
        .route("/profile-image", patch(update_profile_image))
        .route("/dashboard", get(dashboard))
        .require_role(Role::Seller);

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/{seller_id}", get(seller_detail))
        .merge(protected)
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let authenticated = state
        .services
        .sellers
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
        .sellers
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
    let seller = state
        .services
        .sellers
        .get(user.id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(seller))
}

/// Public seller profile shown on the storefront.
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

async fn update_profile_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let form = read_multipart(multipart).await?;
    let image = form.file("image")?;

    let url = state
        .services
        .assets
        .upload(image.bytes.clone(), "profile", &image.filename)
        .await
        .map_err(|e| map_service_error(e.into()))?;

    let seller = state
        .services
        .sellers
        .update_profile_image(user.id, url)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(seller))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let dashboard = state
        .services
        .sellers
        .dashboard(user.id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(dashboard))
}
