use crate::{
    auth::{Role, RouterAuthExt},
    errors::ApiError,
    handlers::common::{
        created_response, map_service_error, read_multipart, success_response,
    },
    services::categories::UpdateCategoryInput,
    AppState,
};
use axum::{
    extract::{Json, Multipart, Path, Query, State},
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

/// Category endpoints: public listing plus admin management.
pub fn routes() -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create_category))
        .route("/{category_id}", patch(update_category).delete(delete_category))
        .require_role(Role::Admin);

    Router::new()
        .route("/", get(list_categories))
        .route("/{category_id}", get(get_category))
        .merge(admin)
}

#[derive(Debug, Deserialize)]
struct CategoryListQuery {
    search: Option<String>,
    page: Option<u64>,
    per_page: Option<u64>,
}

async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (categories, total) = state
        .services
        .categories
        .list(query.search, query.page, query.per_page)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "categories": categories,
        "total": total,
    })))
}

async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let category = state
        .services
        .categories
        .get(category_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(category))
}

/// Creates a category from a multipart form (`name` field + `image` file).
async fn create_category(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let form = read_multipart(multipart).await?;
    let name = form.field("name")?.to_string();
    let image = form.file("image")?;

    let image_url = state
        .services
        .assets
        .upload(image.bytes.clone(), "categories", &image.filename)
        .await
        .map_err(|e| map_service_error(e.into()))?;

    let category = state
        .services
        .categories
        .create(name, image_url)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(category))
}

async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let category = state
        .services
        .categories
        .update(category_id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(category))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let deleted_id = state
        .services
        .categories
        .delete(category_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "category_id": deleted_id,
    })))
}
