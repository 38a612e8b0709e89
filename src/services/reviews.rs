use crate::{
    entities::{product, review, Products, Reviews},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

const REVIEWS_PER_PAGE: u64 = 5;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddReviewInput {
    pub product_id: Uuid,
    #[validate(length(min = 1))]
    pub reviewer_name: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    pub review: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingBucket {
    pub rating: i32,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewPage {
    pub reviews: Vec<review::Model>,
    pub total_reviews: u64,
    /// Count per star value, five stars first
    pub histogram: Vec<RatingBucket>,
}

/// Product reviews and the derived product rating.
#[derive(Clone)]
pub struct ReviewService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
}

impl ReviewService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Records a review and recomputes the product's mean rating
    /// (one decimal place).
    #[instrument(skip(self, input))]
    pub async fn add_review(&self, input: AddReviewInput) -> Result<review::Model, ServiceError> {
        input.validate()?;

        let product = Products::find_by_id(input.product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", input.product_id))
            })?;

        let entry = review::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_id: Set(input.product_id),
            reviewer_name: Set(input.reviewer_name),
            rating: Set(input.rating),
            review: Set(input.review),
            created_at: Set(Utc::now()),
        };
        let entry = entry.insert(&*self.db).await?;

        let ratings: Vec<i32> = Reviews::find()
            .filter(review::Column::ProductId.eq(input.product_id))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|r| r.rating)
            .collect();

        let mean = if ratings.is_empty() {
            Decimal::ZERO
        } else {
            let sum: i32 = ratings.iter().sum();
            (Decimal::from(sum) / Decimal::from(ratings.len() as u64)).round_dp(1)
        };

        let mut product: product::ActiveModel = product.into();
        product.rating = Set(mean);
        product.updated_at = Set(Utc::now());
        product.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::ReviewAdded {
                product_id: input.product_id,
                rating: entry.rating,
            })
            .await;

        Ok(entry)
    }

    /// Paginated reviews with a per-star histogram.
    #[instrument(skip(self))]
    pub async fn list(&self, product_id: Uuid, page: u64) -> Result<ReviewPage, ServiceError> {
        let paginator = Reviews::find()
            .filter(review::Column::ProductId.eq(product_id))
            .order_by_desc(review::Column::CreatedAt)
            .paginate(&*self.db, REVIEWS_PER_PAGE);

        let total_reviews = paginator.num_items().await?;
        let reviews = paginator.fetch_page(page.saturating_sub(1)).await?;

        let mut histogram: Vec<RatingBucket> = (1..=5)
            .rev()
            .map(|rating| RatingBucket { rating, count: 0 })
            .collect();
        for entry in Reviews::find()
            .filter(review::Column::ProductId.eq(product_id))
            .all(&*self.db)
            .await?
        {
            if let Some(bucket) = histogram.iter_mut().find(|b| b.rating == entry.rating) {
                bucket.count += 1;
            }
        }

        Ok(ReviewPage {
            reviews,
            total_reviews,
            histogram,
        })
    }
}
