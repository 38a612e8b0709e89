use crate::{
    auth::{hash_password, verify_password, AuthService, Role, TokenPair},
    entities::{admin, platform_wallet_entry, Admins, CustomerOrders, PlatformWalletEntries},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::customers::{Credentials, RegisterInput};

#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedAdmin {
    pub admin: admin::Model,
    pub token: TokenPair,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    /// Lifetime platform earnings (Σ platform wallet entries)
    pub total_sales: Decimal,
    pub total_orders: u64,
}

#[derive(Clone)]
pub struct AdminService {
    db: Arc<DatabaseConnection>,
    auth: Arc<AuthService>,
}

impl AdminService {
    pub fn new(db: Arc<DatabaseConnection>, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }

    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthenticatedAdmin, ServiceError> {
        input.validate()?;

        let existing = Admins::find()
            .filter(admin::Column::Email.eq(input.email.clone()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "An admin with this email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let admin = admin::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            password_hash: Set(hash_password(&input.password)
                .map_err(|e| ServiceError::InternalError(e.to_string()))?),
            role: Set(Role::Admin.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let admin = admin.insert(&*self.db).await?;

        let token = self
            .auth
            .generate_token(admin.id, Role::Admin)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        Ok(AuthenticatedAdmin { admin, token })
    }

    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: Credentials) -> Result<AuthenticatedAdmin, ServiceError> {
        credentials.validate()?;

        let admin = Admins::find()
            .filter(admin::Column::Email.eq(credentials.email.clone()))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::AuthError("Incorrect email or password".to_string()))?;

        let valid = verify_password(&credentials.password, &admin.password_hash)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        if !valid {
            return Err(ServiceError::AuthError(
                "Incorrect email or password".to_string(),
            ));
        }

        let token = self
            .auth
            .generate_token(admin.id, Role::Admin)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        Ok(AuthenticatedAdmin { admin, token })
    }

    pub async fn get(&self, admin_id: Uuid) -> Result<admin::Model, ServiceError> {
        Admins::find_by_id(admin_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Admin {} not found", admin_id)))
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<AdminDashboard, ServiceError> {
        let amounts: Vec<Decimal> = PlatformWalletEntries::find()
            .select_only()
            .column(platform_wallet_entry::Column::Amount)
            .into_tuple()
            .all(&*self.db)
            .await?;
        let total_sales: Decimal = amounts.into_iter().sum();
        let total_orders = CustomerOrders::find().count(&*self.db).await?;

        Ok(AdminDashboard {
            total_sales,
            total_orders,
        })
    }
}
