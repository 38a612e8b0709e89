use crate::{
    entities::{product, wishlist_item, Products, WishlistItems},
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Result of a wishlist toggle.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum WishlistToggle {
    Added { item: wishlist_item::Model },
    Removed { item: wishlist_item::Model },
}

#[derive(Clone)]
pub struct WishlistService {
    db: Arc<DatabaseConnection>,
}

impl WishlistService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Adds the product if absent, removes it if present.
    #[instrument(skip(self))]
    pub async fn toggle(
        &self,
        customer_id: Uuid,
        product_id: Uuid,
    ) -> Result<WishlistToggle, ServiceError> {
        Products::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let existing = WishlistItems::find()
            .filter(wishlist_item::Column::CustomerId.eq(customer_id))
            .filter(wishlist_item::Column::ProductId.eq(product_id))
            .one(&*self.db)
            .await?;

        match existing {
            Some(item) => {
                item.clone().delete(&*self.db).await?;
                Ok(WishlistToggle::Removed { item })
            }
            None => {
                let item = wishlist_item::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    customer_id: Set(customer_id),
                    product_id: Set(product_id),
                    created_at: Set(Utc::now()),
                };
                let item = item.insert(&*self.db).await?;
                Ok(WishlistToggle::Added { item })
            }
        }
    }

    /// Wishlisted products, newest first. Items whose product has since
    /// been removed are skipped.
    #[instrument(skip(self))]
    pub async fn list(&self, customer_id: Uuid) -> Result<Vec<product::Model>, ServiceError> {
        let items = WishlistItems::find()
            .filter(wishlist_item::Column::CustomerId.eq(customer_id))
            .order_by_desc(wishlist_item::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let product_ids: Vec<Uuid> = items.iter().map(|item| item.product_id).collect();
        let mut products = Products::find()
            .filter(product::Column::Id.is_in(product_ids.clone()))
            .all(&*self.db)
            .await?;

        // Preserve wishlist ordering.
        products.sort_by_key(|p| {
            product_ids
                .iter()
                .position(|id| *id == p.id)
                .unwrap_or(usize::MAX)
        });
        Ok(products)
    }
}
