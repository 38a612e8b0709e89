use crate::{
    entities::{banner, Banners, Products},
    errors::ServiceError,
    events::{Event, EventSender},
    providers::AssetStorage,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct BannerService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    assets: Arc<dyn AssetStorage>,
}

impl BannerService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        assets: Arc<dyn AssetStorage>,
    ) -> Self {
        Self {
            db,
            event_sender,
            assets,
        }
    }

    /// Creates a banner for a product; the banner links to the product's
    /// current slug.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        product_id: Uuid,
        image_url: String,
    ) -> Result<banner::Model, ServiceError> {
        let product = Products::find_by_id(product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", product_id)))?;

        let now = Utc::now();
        let banner = banner::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            image: Set(image_url),
            link: Set(product.slug),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let banner = banner.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::BannerCreated(banner.id))
            .await;

        Ok(banner)
    }

    pub async fn list(&self) -> Result<Vec<banner::Model>, ServiceError> {
        Ok(Banners::find()
            .order_by_desc(banner::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    pub async fn get_by_product(
        &self,
        product_id: Uuid,
    ) -> Result<Option<banner::Model>, ServiceError> {
        Ok(Banners::find()
            .filter(banner::Column::ProductId.eq(product_id))
            .one(&*self.db)
            .await?)
    }

    /// Replaces the banner image; the previous asset is deleted best
    /// effort.
    #[instrument(skip(self))]
    pub async fn update_image(
        &self,
        banner_id: Uuid,
        image_url: String,
    ) -> Result<banner::Model, ServiceError> {
        let banner = Banners::find_by_id(banner_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Banner {} not found", banner_id)))?;

        if let Err(e) = self.assets.delete(&banner.image).await {
            warn!(%banner_id, "Failed to delete previous banner asset: {}", e);
        }

        let mut banner: banner::ActiveModel = banner.into();
        banner.image = Set(image_url);
        banner.updated_at = Set(Utc::now());
        Ok(banner.update(&*self.db).await?)
    }
}
