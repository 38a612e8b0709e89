use crate::{
    auth::{hash_password, verify_password, AuthService, Role, TokenPair},
    entities::{
        product, seller, seller_order, seller_wallet_entry,
        customer_order::DeliveryStatus,
        seller::{PaymentOnboarding, SellerStatus},
        Products, SellerOrders, SellerWalletEntries, Sellers,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::customers::{Credentials, RegisterInput};

#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedSeller {
    pub seller: seller::Model,
    pub token: TokenPair,
}

#[derive(Debug, Clone, Serialize)]
pub struct SellerDashboard {
    pub total_sales: Decimal,
    pub total_products: u64,
    pub total_orders: u64,
    pub pending_orders: u64,
    pub recent_orders: Vec<seller_order::Model>,
}

#[derive(Clone)]
pub struct SellerService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    auth: Arc<AuthService>,
}

impl SellerService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self {
            db,
            event_sender,
            auth,
        }
    }

    /// Registers a seller; accounts start in `pending` moderation state
    /// with payout onboarding not yet done.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthenticatedSeller, ServiceError> {
        input.validate()?;

        let existing = Sellers::find()
            .filter(seller::Column::Email.eq(input.email.clone()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "A seller with this email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let seller = seller::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            password_hash: Set(hash_password(&input.password)
                .map_err(|e| ServiceError::InternalError(e.to_string()))?),
            role: Set(Role::Seller.as_str().to_string()),
            status: Set(SellerStatus::Pending),
            payment: Set(PaymentOnboarding::Inactive),
            method: Set("manual".to_string()),
            image: Set(None),
            shop_info: Set(Some(serde_json::json!({}))),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let seller = seller.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::SellerRegistered(seller.id))
            .await;

        let token = self
            .auth
            .generate_token(seller.id, Role::Seller)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        Ok(AuthenticatedSeller { seller, token })
    }

    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: Credentials) -> Result<AuthenticatedSeller, ServiceError> {
        credentials.validate()?;

        let seller = Sellers::find()
            .filter(seller::Column::Email.eq(credentials.email.clone()))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::AuthError("Incorrect email or password".to_string()))?;

        let valid = verify_password(&credentials.password, &seller.password_hash)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        if !valid {
            return Err(ServiceError::AuthError(
                "Incorrect email or password".to_string(),
            ));
        }

        let token = self
            .auth
            .generate_token(seller.id, Role::Seller)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        Ok(AuthenticatedSeller { seller, token })
    }

    pub async fn get(&self, seller_id: Uuid) -> Result<seller::Model, ServiceError> {
        Sellers::find_by_id(seller_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Seller {} not found", seller_id)))
    }

    #[instrument(skip(self))]
    pub async fn update_profile_image(
        &self,
        seller_id: Uuid,
        image_url: String,
    ) -> Result<seller::Model, ServiceError> {
        let seller = self.get(seller_id).await?;
        let mut seller: seller::ActiveModel = seller.into();
        seller.image = Set(Some(image_url));
        seller.updated_at = Set(Utc::now());
        Ok(seller.update(&*self.db).await?)
    }

    /// Sales and fulfillment headline numbers for the seller dashboard.
    #[instrument(skip(self))]
    pub async fn dashboard(&self, seller_id: Uuid) -> Result<SellerDashboard, ServiceError> {
        let amounts: Vec<Decimal> = SellerWalletEntries::find()
            .select_only()
            .column(seller_wallet_entry::Column::Amount)
            .filter(seller_wallet_entry::Column::SellerId.eq(seller_id))
            .into_tuple()
            .all(&*self.db)
            .await?;
        let total_sales: Decimal = amounts.into_iter().sum();

        let total_products = Products::find()
            .filter(product::Column::SellerId.eq(seller_id))
            .count(&*self.db)
            .await?;

        let orders = SellerOrders::find().filter(seller_order::Column::SellerId.eq(seller_id));
        let total_orders = orders.clone().count(&*self.db).await?;
        let pending_orders = orders
            .clone()
            .filter(seller_order::Column::DeliveryStatus.eq(DeliveryStatus::Pending))
            .count(&*self.db)
            .await?;
        let recent_orders = orders
            .order_by_desc(seller_order::Column::PlacedAt)
            .limit(3)
            .all(&*self.db)
            .await?;

        Ok(SellerDashboard {
            total_sales,
            total_products,
            total_orders,
            pending_orders,
            recent_orders,
        })
    }

    /// Admin moderation list, filtered by status with optional email
    /// search.
    #[instrument(skip(self))]
    pub async fn list_by_status(
        &self,
        status: Option<SellerStatus>,
        page: u64,
        per_page: u64,
        search: Option<String>,
    ) -> Result<(Vec<seller::Model>, u64), ServiceError> {
        let mut query = Sellers::find().order_by_desc(seller::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(seller::Column::Status.eq(status));
        }
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query = query.filter(seller::Column::Email.contains(&search));
        }

        let paginator = query.paginate(&*self.db, per_page.max(1));
        let total = paginator.num_items().await?;
        let sellers = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((sellers, total))
    }

    /// Admin flips a seller between pending/active/deactive.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        seller_id: Uuid,
        status: SellerStatus,
    ) -> Result<seller::Model, ServiceError> {
        let seller = self.get(seller_id).await?;
        let mut seller: seller::ActiveModel = seller.into();
        seller.status = Set(status);
        seller.updated_at = Set(Utc::now());
        let seller = seller.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::SellerStatusChanged {
                seller_id,
                new_status: format!("{:?}", status).to_lowercase(),
            })
            .await;

        Ok(seller)
    }
}
