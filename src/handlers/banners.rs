use crate::{
    auth::{Role, RouterAuthExt},
    errors::ApiError,
    handlers::common::{created_response, map_service_error, read_multipart, success_response},
    AppState,
};
use axum::{
    extract::{Multipart, Path, State},
    routing::{get, patch, post},
    Router,
};
use uuid::Uuid;

/// Banner endpoints: public listing plus admin management.
pub fn routes() -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create_banner))
        .route("/{banner_id}", patch(update_banner))
        .require_role(Role::Admin);

    Router::new()
        .route("/", get(list_banners))
        .route("/product/{product_id}", get(banner_for_product))
        .merge(admin)
}

async fn list_banners(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let banners = state
        .services
        .banners
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(banners))
}

async fn banner_for_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let banner = state
        .services
        .banners
        .get_by_product(product_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(banner))
}

/// Creates a banner from a multipart form (`product_id` field + `banner`
/// image file).
async fn create_banner(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let form = read_multipart(multipart).await?;
    let product_id: Uuid = form
        .field("product_id")?
        .parse()
        .map_err(|_| ApiError::ValidationError("Invalid product_id".to_string()))?;
    let image = form.file("banner")?;

    let image_url = state
        .services
        .assets
        .upload(image.bytes.clone(), "banners", &image.filename)
        .await
        .map_err(|e| map_service_error(e.into()))?;

    let banner = state
        .services
        .banners
        .create(product_id, image_url)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(banner))
}

/// Replaces the banner image (`banner` image file).
async fn update_banner(
    State(state): State<AppState>,
    Path(banner_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let form = read_multipart(multipart).await?;
    let image = form.file("banner")?;

    let image_url = state
        .services
        .assets
        .upload(image.bytes.clone(), "banners", &image.filename)
        .await
        .map_err(|e| map_service_error(e.into()))?;

    let banner = state
        .services
        .banners
        .update_image(banner_id, image_url)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(banner))
}
