use crate::{
    auth::{AuthUser, Role, RouterAuthExt},
    entities::customer_order::DeliveryStatus,
    errors::ApiError,
    handlers::common::{
        created_response, map_service_error, success_response, PaginatedResponse, PaginationParams,
    },
    services::orders::ShippingAddress,
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, patch, post},
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;

/// Order endpoints for customers, sellers and admins.
pub fn routes() -> Router<AppState> {
    let customer = Router::new()
        .route("/", post(place_order))
        .route("/mine/{status}", get(my_orders))
        .route("/{order_id}", get(order_detail))
        .require_role(Role::User);

    let seller = Router::new()
        .route("/seller", get(seller_orders))
        .route("/seller/{seller_order_id}", get(seller_order_detail))
        .route(
            "/seller/{seller_order_id}/status",
            patch(update_seller_order_status),
        )
        .require_role(Role::Seller);

    let admin = Router::new()
        .route("/admin", get(admin_orders))
        .route("/admin/{order_id}", get(admin_order_detail))
        .route("/admin/{order_id}/status", patch(update_order_status))
        .require_role(Role::Admin);

    Router::new().merge(customer).merge(seller).merge(admin)
}

fn parse_delivery_status(value: &str) -> Result<DeliveryStatus, ApiError> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| ApiError::ValidationError(format!("Unknown delivery status '{value}'")))
}

#[derive(Debug, Deserialize)]
struct PlaceOrderRequest {
    shipping_address: ShippingAddress,
}

/// Places an order from the current cart: builds the checkout summary
/// server-side, then fans it out into the parent and per-seller orders.
async fn place_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<PlaceOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let summary = state
        .services
        .carts
        .checkout_summary(user.id)
        .await
        .map_err(map_service_error)?;

    let order = state
        .services
        .orders
        .place_order(
            user.id,
            summary.seller_groups,
            summary.shipping_fee,
            payload.shipping_address,
        )
        .await
        .map_err(map_service_error)?;

    Ok(created_response(serde_json::json!({
        "status": "Order placed",
        "order_id": order.id,
    })))
}

/// Customer's orders filtered by delivery status, or "all".
async fn my_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(status): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let status = match status.as_str() {
        "all" => None,
        other => Some(parse_delivery_status(other)?),
    };

    let orders = state
        .services
        .orders
        .list_for_customer(user.id, status)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(orders))
}

async fn order_detail(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(order_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .get_for_customer(user.id, order_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

#[derive(Debug, Deserialize)]
struct OrderPageQuery {
    #[serde(default = "PaginationParams::default_page")]
    page: u64,
    #[serde(default = "PaginationParams::default_per_page")]
    per_page: u64,
}

async fn seller_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<OrderPageQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (orders, total) = state
        .services
        .orders
        .list_for_seller(user.id, query.page, query.per_page)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        orders,
        query.page,
        query.per_page,
        total,
    )))
}

async fn seller_order_detail(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(seller_order_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .get_seller_order(seller_order_id)
        .await
        .map_err(map_service_error)?;
    if order.seller_id != user.id {
        return Err(ApiError::ServiceError(crate::errors::ServiceError::Forbidden(
            "Order belongs to another seller".to_string(),
        )));
    }
    Ok(success_response(order))
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: String,
}

async fn update_seller_order_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(seller_order_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let status = parse_delivery_status(&payload.status)?;
    let order = state
        .services
        .orders
        .update_seller_delivery_status(user.id, seller_order_id, status)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

async fn admin_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderPageQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (orders, total) = state
        .services
        .orders
        .list_for_admin(query.page, query.per_page)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        orders,
        query.page,
        query.per_page,
        total,
    )))
}

async fn admin_order_detail(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .get_with_children(order_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}

async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let status = parse_delivery_status(&payload.status)?;
    let order = state
        .services
        .orders
        .update_delivery_status(order_id, status)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(order))
}
