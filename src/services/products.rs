use crate::{
    entities::{product, Products},
    errors::ServiceError,
    events::{Event, EventSender},
    services::catalog_query::{browse, BrowseQuery},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Products shown per storefront browse page.
pub const BROWSE_PER_PAGE: u64 = 16;
const HOME_FEED_LIMIT: u64 = 16;
const CATEGORY_RELATED_LIMIT: u64 = 20;
const SELLER_RELATED_LIMIT: u64 = 5;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub category: String,
    pub description: String,
    pub brand: String,
    #[validate(length(min = 1))]
    pub shop_name: String,
    pub price: Decimal,
    #[validate(range(min = 0, max = 100))]
    pub discount: i32,
    #[validate(range(min = 0))]
    pub stock: i32,
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProductInput {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    pub brand: String,
    pub price: Decimal,
    #[validate(range(min = 0, max = 100))]
    pub discount: i32,
    #[validate(range(min = 0))]
    pub stock: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub product: product::Model,
    pub category_related: Vec<product::Model>,
    pub seller_related: Vec<product::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeFeed {
    pub top_rated: Vec<product::Model>,
    pub new_arrivals: Vec<product::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceRange {
    pub low: Decimal,
    pub high: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct StorefrontShowcase {
    /// Newest products chunked into display rows of three
    pub latest: Vec<Vec<product::Model>>,
    pub price_range: PriceRange,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrowsePage {
    pub products: Vec<product::Model>,
    pub total_products: usize,
    pub per_page: u64,
}

/// Catalog management and the public browse surface.
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl ProductService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        seller_id: Uuid,
        input: CreateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let name = input.name.trim().to_string();
        let now = Utc::now();
        let product = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            seller_id: Set(seller_id),
            slug: Set(slugify(&name)),
            name: Set(name),
            shop_name: Set(input.shop_name),
            category: Set(input.category.trim().to_string()),
            description: Set(input.description.trim().to_string()),
            brand: Set(input.brand.trim().to_string()),
            price: Set(input.price),
            discount: Set(input.discount),
            stock: Set(input.stock),
            rating: Set(Decimal::ZERO),
            images: Set(serde_json::json!(input.image_urls)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let product = product.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ProductCreated(product.id))
            .await;

        info!(product_id = %product.id, %seller_id, "Product added");
        Ok(product)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        seller_id: Uuid,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let product = self.owned_by(seller_id, product_id).await?;
        let name = input.name.trim().to_string();

        let mut product: product::ActiveModel = product.into();
        product.slug = Set(slugify(&name));
        product.name = Set(name);
        product.description = Set(input.description);
        product.brand = Set(input.brand);
        product.price = Set(input.price);
        product.discount = Set(input.discount);
        product.stock = Set(input.stock);
        product.updated_at = Set(Utc::now());
        let product = product.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ProductUpdated(product_id))
            .await;

        Ok(product)
    }

    /// Swaps one image URL for another in the product's image list.
    #[instrument(skip(self))]
    pub async fn replace_image(
        &self,
        seller_id: Uuid,
        product_id: Uuid,
        old_url: &str,
        new_url: String,
    ) -> Result<product::Model, ServiceError> {
        let product = self.owned_by(seller_id, product_id).await?;

        let mut urls: Vec<String> =
            serde_json::from_value(product.images.clone()).unwrap_or_default();
        match urls.iter_mut().find(|url| url.as_str() == old_url) {
            Some(slot) => *slot = new_url,
            None => urls.push(new_url),
        }

        let mut product: product::ActiveModel = product.into();
        product.images = Set(serde_json::json!(urls));
        product.updated_at = Set(Utc::now());
        let product = product.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ProductUpdated(product_id))
            .await;

        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, seller_id: Uuid, product_id: Uuid) -> Result<(), ServiceError> {
        let product = self.owned_by(seller_id, product_id).await?;
        product.delete(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ProductDeleted(product_id))
            .await;

        Ok(())
    }

    pub async fn get(&self, product_id: Uuid) -> Result<product::Model, ServiceError> {
        Products::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))
    }

    async fn owned_by(
        &self,
        seller_id: Uuid,
        product_id: Uuid,
    ) -> Result<product::Model, ServiceError> {
        let product = self.get(product_id).await?;
        if product.seller_id != seller_id {
            return Err(ServiceError::Forbidden(
                "Product belongs to another seller".to_string(),
            ));
        }
        Ok(product)
    }

    /// Seller's own products, paginated and optionally name-searched.
    #[instrument(skip(self))]
    pub async fn list_for_seller(
        &self,
        seller_id: Uuid,
        page: u64,
        per_page: u64,
        search: Option<String>,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let mut query = Products::find()
            .filter(product::Column::SellerId.eq(seller_id))
            .order_by_desc(product::Column::CreatedAt);
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query = query.filter(product::Column::Name.contains(&search));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let products = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((products, total))
    }

    /// Full catalog with count, for the admin dashboard.
    pub async fn list_all(&self) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let products = Products::find()
            .order_by_desc(product::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        let count = products.len() as u64;
        Ok((products, count))
    }

    /// Storefront browse: the in-process filter/sort/paginate pipeline.
    #[instrument(skip(self))]
    pub async fn browse(&self, query: BrowseQuery) -> Result<BrowsePage, ServiceError> {
        let products = Products::find()
            .order_by_desc(product::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let (page, total) = browse(products, &query, BROWSE_PER_PAGE);
        Ok(BrowsePage {
            products: page,
            total_products: total,
            per_page: BROWSE_PER_PAGE,
        })
    }

    /// Product page payload: the product plus related lists.
    #[instrument(skip(self))]
    pub async fn detail_by_slug(&self, slug: &str) -> Result<ProductDetail, ServiceError> {
        let product = Products::find()
            .filter(product::Column::Slug.eq(slug))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product '{}' not found", slug)))?;

        let category_related = Products::find()
            .filter(product::Column::Id.ne(product.id))
            .filter(product::Column::Category.eq(product.category.clone()))
            .limit(CATEGORY_RELATED_LIMIT)
            .all(&*self.db)
            .await?;

        let seller_related = Products::find()
            .filter(product::Column::Id.ne(product.id))
            .filter(product::Column::SellerId.eq(product.seller_id))
            .limit(SELLER_RELATED_LIMIT)
            .all(&*self.db)
            .await?;

        Ok(ProductDetail {
            product,
            category_related,
            seller_related,
        })
    }

    pub async fn home_feed(&self) -> Result<HomeFeed, ServiceError> {
        let top_rated = Products::find()
            .order_by_desc(product::Column::Rating)
            .limit(HOME_FEED_LIMIT)
            .all(&*self.db)
            .await?;
        let new_arrivals = Products::find()
            .order_by_desc(product::Column::CreatedAt)
            .limit(HOME_FEED_LIMIT)
            .all(&*self.db)
            .await?;

        Ok(HomeFeed {
            top_rated,
            new_arrivals,
        })
    }

    /// Latest products (in rows of three) plus the catalog price bounds.
    pub async fn showcase(&self) -> Result<StorefrontShowcase, ServiceError> {
        let latest = Products::find()
            .order_by_desc(product::Column::CreatedAt)
            .limit(20)
            .all(&*self.db)
            .await?;

        let by_price = Products::find()
            .order_by_asc(product::Column::Price)
            .all(&*self.db)
            .await?;
        let price_range = match (by_price.first(), by_price.last()) {
            (Some(cheapest), Some(dearest)) => PriceRange {
                low: cheapest.price,
                high: dearest.price,
            },
            _ => PriceRange {
                low: Decimal::ZERO,
                high: Decimal::ZERO,
            },
        };

        Ok(StorefrontShowcase {
            latest: chunk_rows(latest, 3),
            price_range,
        })
    }

    /// Flat feed for a named product shelf.
    pub async fn list_by_shelf(&self, shelf: &str) -> Result<Vec<product::Model>, ServiceError> {
        let query = match shelf {
            "top-rated" => Products::find().order_by_desc(product::Column::Rating),
            "new-arrivals" => Products::find().order_by_desc(product::Column::CreatedAt),
            other => {
                return Err(ServiceError::ValidationError(format!(
                    "Unknown product shelf '{}'",
                    other
                )))
            }
        };
        Ok(query.all(&*self.db).await?)
    }
}

fn slugify(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-")
}

fn chunk_rows(products: Vec<product::Model>, row: usize) -> Vec<Vec<product::Model>> {
    products
        .chunks(row)
        .map(|chunk| chunk.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_joins_words_with_dashes() {
        assert_eq!(slugify("Blue  Ceramic Kettle "), "Blue-Ceramic-Kettle");
    }
}
