use crate::{
    auth::{AuthUser, Role, RouterAuthExt},
    errors::ApiError,
    handlers::common::{created_response, map_service_error, success_response},
    services::carts::AddToCartInput,
    services::customers::{Credentials, RegisterInput},
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    routing::{delete, get, patch, post},
    Extension, Router,
};
use uuid::Uuid;

/// Customer account, cart, wishlist and dashboard endpoints.
pub fn routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/logout", get(logout))
        .route("/me", get(me))
        .route("/dashboard", get(dashboard))
        .route("/cart", get(get_cart).post(add_to_cart))
        .route("/cart/{product_id}", delete(remove_from_cart))
        .route("/cart/{product_id}/increment", patch(increment_cart_item))
        .route("/cart/{product_id}/decrement", patch(decrement_cart_item))
        .route("/wishlist", get(get_wishlist))
        .route("/wishlist/toggle", post(toggle_wishlist))
        .require_role(Role::User);

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
        .customers
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
        .customers
        .login(payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(authenticated))
}

/// Bearer tokens are stateless; logout is a client-side discard.
async fn logout() -> impl axum::response::IntoResponse {
    success_response(serde_json::json!({ "status": "Logged out" }))
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let customer = state
        .services
        .customers
        .get(user.id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(customer))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let dashboard = state
        .services
        .orders
        .customer_dashboard(user.id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(dashboard))
}

/// Seller-partitioned checkout summary for the current cart.
async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let summary = state
        .services
        .carts
        .checkout_summary(user.id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(summary))
}

async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AddToCartInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let line = state
        .services
        .carts
        .add_item(user.id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(line))
}

async fn remove_from_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(product_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let line = state
        .services
        .carts
        .remove_item(user.id, product_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(line))
}

async fn increment_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(product_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let line = state
        .services
        .carts
        .increment_quantity(user.id, product_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(line))
}

async fn decrement_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(product_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let line = state
        .services
        .carts
        .decrement_quantity(user.id, product_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(line))
}

async fn get_wishlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = state
        .services
        .wishlists
        .list(user.id)
        .await
        .map_err(map_service_error)?;
    let count = products.len();
    Ok(success_response(serde_json::json!({
        "products": products,
        "count": count,
    })))
}

#[derive(Debug, serde::Deserialize)]
struct ToggleWishlistRequest {
    product_id: Uuid,
}

async fn toggle_wishlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ToggleWishlistRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let outcome = state
        .services
        .wishlists
        .toggle(user.id, payload.product_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(outcome))
}
