use crate::{
    auth::{AuthUser, Role, RouterAuthExt},
    errors::ApiError,
    handlers::common::{created_response, map_service_error, success_response},
    services::payments::ConfirmationOutcome,
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    routing::{get, patch, post},
    Extension, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

/// Payment endpoints: intents and confirmation for customers, payout
/// onboarding and withdrawals for sellers, payout processing for admins.
pub fn routes() -> Router<AppState> {
    let customer = Router::new()
        .route("/intent", post(create_intent))
        .route("/orders/{order_id}/confirm", patch(confirm_order))
        .require_role(Role::User);

    let seller = Router::new()
        .route("/account", post(create_payment_account))
        .route("/account/activate/{code}", patch(activate_payment_account))
        .route("/wallet", get(wallet_summary))
        .route("/withdrawals", post(request_withdrawal))
        .require_role(Role::Seller);

    let admin = Router::new()
        .route("/withdrawals/pending", get(pending_withdrawals))
        .route("/withdrawals/{request_id}/confirm", patch(confirm_withdrawal))
        .require_role(Role::Admin);

    Router::new().merge(customer).merge(seller).merge(admin)
}

#[derive(Debug, Deserialize)]
struct CreateIntentRequest {
    amount: Decimal,
}

async fn create_intent(
    State(state): State<AppState>,
    Json(payload): Json<CreateIntentRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let client_secret = state
        .services
        .payments
        .create_intent(payload.amount)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(serde_json::json!({
        "client_secret": client_secret,
    })))
}

/// Marks an order paid after the processor reports success. Replays are
/// no-ops; wallets are settled exactly once.
async fn confirm_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(order_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    // The order must belong to the caller.
    state
        .services
        .orders
        .get_for_customer(user.id, order_id)
        .await
        .map_err(map_service_error)?;

    let outcome = state
        .services
        .payments
        .confirm_payment(order_id)
        .await
        .map_err(map_service_error)?;

    let status = match outcome {
        ConfirmationOutcome::Confirmed => "confirmed",
        ConfirmationOutcome::AlreadyPaid => "already_paid",
    };
    Ok(success_response(serde_json::json!({ "status": status })))
}

async fn create_payment_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let url = state
        .services
        .wallets
        .create_onboarding_link(user.id)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(serde_json::json!({ "url": url })))
}

async fn activate_payment_account(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(code): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let seller = state
        .services
        .wallets
        .activate_account(user.id, &code)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "status": "Payment activated",
        "seller": seller,
    })))
}

async fn wallet_summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let summary = state
        .services
        .wallets
        .seller_summary(user.id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(summary))
}

#[derive(Debug, Deserialize)]
struct WithdrawalRequestBody {
    amount: Decimal,
}

async fn request_withdrawal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<WithdrawalRequestBody>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let request = state
        .services
        .wallets
        .request_withdrawal(user.id, payload.amount)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(request))
}

async fn pending_withdrawals(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let requests = state
        .services
        .wallets
        .pending_requests()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(requests))
}

async fn confirm_withdrawal(
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let request = state
        .services
        .wallets
        .confirm_withdrawal(request_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "status": "Payment confirmed",
        "withdrawal": request,
    })))
}
