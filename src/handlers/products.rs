use crate::{
    auth::{AuthUser, Role, RouterAuthExt},
    errors::ApiError,
    handlers::common::{
        created_response, map_service_error, no_content_response, read_multipart, success_response,
        validate_input, PaginatedResponse, PaginationParams,
    },
    services::catalog_query::BrowseQuery,
    services::products::{CreateProductInput, UpdateProductInput},
    services::reviews::AddReviewInput,
    AppState,
};
use axum::{
    extract::{Json, Multipart, Path, Query, State},
    routing::{get, patch, post},
    Extension, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

/// Catalog endpoints: public browse plus seller/admin management.
pub fn routes() -> Router<AppState> {
    let seller = Router::new()
        .route("/", post(create_product))
        .route("/mine", get(my_products))
        .route("/{product_id}/edit", get(product_to_edit))
        .route("/{product_id}", patch(update_product).delete(delete_product))
        .route("/{product_id}/image", patch(update_product_image))
        .require_role(Role::Seller);

    let admin = Router::new()
        .route("/all", get(all_products))
        .require_role(Role::Admin);

    Router::new()
        .route("/", get(browse_products))
        .route("/home", get(home_feed))
        .route("/showcase", get(showcase))
        .route("/shelf/{shelf}", get(shelf))
        .route("/detail/{slug}", get(product_detail))
        .route("/{product_id}/reviews", get(list_reviews).post(add_review))
        .merge(seller)
        .merge(admin)
}

#[derive(Debug, Deserialize)]
struct BrowseParams {
    category: Option<String>,
    rating: Option<i32>,
    search: Option<String>,
    low_price: Option<Decimal>,
    high_price: Option<Decimal>,
    sort: Option<String>,
    #[serde(default = "PaginationParams::default_page")]
    page: u64,
}

async fn browse_products(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let sort = match params.sort.as_deref() {
        None | Some("") => None,
        Some(value) => Some(
            serde_json::from_value(serde_json::Value::String(value.to_string()))
                .map_err(|_| ApiError::ValidationError(format!("Unknown sort order '{value}'")))?,
        ),
    };

    let query = BrowseQuery {
        category: params.category,
        rating: params.rating,
        search: params.search,
        low_price: params.low_price,
        high_price: params.high_price,
        sort,
        page: params.page,
    };

    let page = state
        .services
        .products
        .browse(query)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(page))
}

async fn home_feed(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let feed = state
        .services
        .products
        .home_feed()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(feed))
}

async fn showcase(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let showcase = state
        .services
        .products
        .showcase()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(showcase))
}

async fn shelf(
    State(state): State<AppState>,
    Path(shelf): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = state
        .services
        .products
        .list_by_shelf(&shelf)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(products))
}

async fn product_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let detail = state
        .services
        .products
        .detail_by_slug(&slug)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(detail))
}

/// Creates a product from a multipart form: text fields plus one or more
/// `images` files uploaded to the asset provider.
async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let form = read_multipart(multipart).await?;

    let mut image_urls = Vec::new();
    for file in form.files.iter().filter(|f| f.field == "images") {
        let url = state
            .services
            .assets
            .upload(file.bytes.clone(), "products", &file.filename)
            .await
            .map_err(|e| map_service_error(e.into()))?;
        image_urls.push(url);
    }

    let input = CreateProductInput {
        name: form.field("name")?.to_string(),
        category: form.field("category")?.to_string(),
        description: form.field("description")?.to_string(),
        brand: form.field("brand")?.to_string(),
        shop_name: form.field("shop_name")?.to_string(),
        price: parse_field(&form.field("price")?, "price")?,
        discount: parse_field(&form.field("discount")?, "discount")?,
        stock: parse_field(&form.field("stock")?, "stock")?,
        image_urls,
    };
    validate_input(&input)?;

    let product = state
        .services
        .products
        .create(user.id, input)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(product))
}

fn parse_field<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::ValidationError(format!("Invalid value for '{name}'")))
}

async fn my_products(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SellerProductsQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (products, total) = state
        .services
        .products
        .list_for_seller(user.id, query.page, query.per_page, query.search)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(PaginatedResponse::new(
        products,
        query.page,
        query.per_page,
        total,
    )))
}

#[derive(Debug, Deserialize)]
struct SellerProductsQuery {
    search: Option<String>,
    #[serde(default = "PaginationParams::default_page")]
    page: u64,
    #[serde(default = "PaginationParams::default_per_page")]
    per_page: u64,
}

async fn product_to_edit(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .get(product_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(product))
}

async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateProductInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = state
        .services
        .products
        .update(user.id, product_id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(product))
}

/// Replaces one product image: multipart with an `old_image` field naming
/// the URL to replace and a `new_image` file.
async fn update_product_image(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(product_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let form = read_multipart(multipart).await?;
    let old_url = form.field("old_image")?.to_string();
    let file = form.file("new_image")?;

    let new_url = state
        .services
        .assets
        .upload(file.bytes.clone(), "products", &file.filename)
        .await
        .map_err(|e| map_service_error(e.into()))?;

    let product = state
        .services
        .products
        .replace_image(user.id, product_id, &old_url, new_url)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(product))
}

async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(product_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .products
        .delete(user.id, product_id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

async fn all_products(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (products, count) = state
        .services
        .products
        .list_all()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "products": products,
        "count": count,
    })))
}

#[derive(Debug, Deserialize)]
struct ReviewListQuery {
    #[serde(default = "PaginationParams::default_page")]
    page: u64,
}

async fn list_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Query(query): Query<ReviewListQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let page = state
        .services
        .reviews
        .list(product_id, query.page)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(page))
}

#[derive(Debug, Deserialize)]
struct AddReviewRequest {
    reviewer_name: String,
    rating: i32,
    review: String,
}

async fn add_review(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<AddReviewRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let input = AddReviewInput {
        product_id,
        reviewer_name: payload.reviewer_name,
        rating: payload.rating,
        review: payload.review,
    };

    let review = state
        .services
        .reviews
        .add_review(input)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(review))
}
