use crate::{
    entities::{category, Categories},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCategoryInput {
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Clone)]
pub struct CategoryService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl CategoryService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        name: String,
        image_url: String,
    ) -> Result<category::Model, ServiceError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Category name is required".to_string(),
            ));
        }

        let now = Utc::now();
        let category = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            slug: Set(slugify(&name)),
            name: Set(name),
            image: Set(image_url),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let category = category.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::CategoryCreated(category.id))
            .await;

        Ok(category)
    }

    /// Categories, newest first; optional name search and pagination.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        search: Option<String>,
        page: Option<u64>,
        per_page: Option<u64>,
    ) -> Result<(Vec<category::Model>, u64), ServiceError> {
        let mut query = Categories::find().order_by_desc(category::Column::CreatedAt);
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query = query.filter(category::Column::Name.contains(&search));
        }

        match (page, per_page) {
            (Some(page), Some(per_page)) => {
                let paginator = query.paginate(&*self.db, per_page.max(1));
                let total = paginator.num_items().await?;
                let categories = paginator.fetch_page(page.saturating_sub(1)).await?;
                Ok((categories, total))
            }
            _ => {
                let categories = query.all(&*self.db).await?;
                let total = categories.len() as u64;
                Ok((categories, total))
            }
        }
    }

    pub async fn get(&self, category_id: Uuid) -> Result<category::Model, ServiceError> {
        Categories::find_by_id(category_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Category {} not found", category_id))
            })
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        category_id: Uuid,
        input: UpdateCategoryInput,
    ) -> Result<category::Model, ServiceError> {
        let category = self.get(category_id).await?;
        let mut category: category::ActiveModel = category.into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            category.slug = Set(slugify(&name));
            category.name = Set(name);
        }
        if let Some(image) = input.image {
            category.image = Set(image);
        }
        category.updated_at = Set(Utc::now());

        Ok(category.update(&*self.db).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, category_id: Uuid) -> Result<Uuid, ServiceError> {
        let category = self.get(category_id).await?;
        category.delete(&*self.db).await?;
        Ok(category_id)
    }
}

fn slugify(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-")
}
