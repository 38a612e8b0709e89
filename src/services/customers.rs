use crate::{
    auth::{hash_password, verify_password, AuthService, Role, TokenPair},
    entities::{customer, Categories, Customers, Sellers},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedCustomer {
    pub customer: customer::Model,
    pub token: TokenPair,
}

/// Admin-facing overview of the customer base.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerOverview {
    pub customers: Vec<customer::Model>,
    pub customer_count: u64,
    pub seller_count: u64,
    pub category_count: u64,
}

#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    auth: Arc<AuthService>,
}

impl CustomerService {
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

    #[instrument(skip(self, input))]
    pub async fn register(
        &self,
        input: RegisterInput,
    ) -> Result<AuthenticatedCustomer, ServiceError> {
        input.validate()?;

        let existing = Customers::find()
            .filter(customer::Column::Email.eq(input.email.clone()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let customer = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            password_hash: Set(hash_password(&input.password)
                .map_err(|e| ServiceError::InternalError(e.to_string()))?),
            role: Set(Role::User.as_str().to_string()),
            method: Set("manual".to_string()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let customer = customer.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::CustomerRegistered(customer.id))
            .await;

        let token = self
            .auth
            .generate_token(customer.id, Role::User)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        Ok(AuthenticatedCustomer { customer, token })
    }

    #[instrument(skip(self, credentials))]
    pub async fn login(
        &self,
        credentials: Credentials,
    ) -> Result<AuthenticatedCustomer, ServiceError> {
        credentials.validate()?;

        let customer = Customers::find()
            .filter(customer::Column::Email.eq(credentials.email.clone()))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::AuthError("Incorrect email or password".to_string()))?;

        let valid = verify_password(&credentials.password, &customer.password_hash)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        if !valid {
            return Err(ServiceError::AuthError(
                "Incorrect email or password".to_string(),
            ));
        }

        let token = self
            .auth
            .generate_token(customer.id, Role::User)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        Ok(AuthenticatedCustomer { customer, token })
    }

    pub async fn get(&self, customer_id: Uuid) -> Result<customer::Model, ServiceError> {
        Customers::find_by_id(customer_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Customer {} not found", customer_id))
            })
    }

    /// Customer list plus headline counts for the admin dashboard.
    #[instrument(skip(self))]
    pub async fn overview(&self) -> Result<CustomerOverview, ServiceError> {
        let customers = Customers::find().all(&*self.db).await?;
        let customer_count = customers.len() as u64;
        let seller_count = Sellers::find().count(&*self.db).await?;
        let category_count = Categories::find().count(&*self.db).await?;

        Ok(CustomerOverview {
            customers,
            customer_count,
            seller_count,
            category_count,
        })
    }
}
