use crate::{
    config::AppConfig,
    entities::{
        payment_account, seller, seller_wallet_entry, withdrawal_request,
        seller::PaymentOnboarding,
        withdrawal_request::WithdrawalStatus,
        PaymentAccounts, SellerWalletEntries, Sellers, WithdrawalRequests,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    providers::PaymentProvider,
};
use chrono::Utc;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Seller earnings overview derived from the append-only wallet ledger
/// and the withdrawal history.
#[derive(Debug, Clone, Serialize)]
pub struct WalletSummary {
    pub total_amount: Decimal,
    pub pending_amount: Decimal,
    pub withdrawn_amount: Decimal,
    pub available_amount: Decimal,
    pub pending_withdrawals: Vec<withdrawal_request::Model>,
    pub success_withdrawals: Vec<withdrawal_request::Model>,
}

/// Seller payout onboarding, wallet summaries and withdrawal processing.
#[derive(Clone)]
pub struct WalletService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    config: Arc<AppConfig>,
    provider: Arc<dyn PaymentProvider>,
}

impl WalletService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        config: Arc<AppConfig>,
        provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            db,
            event_sender,
            config,
            provider,
        }
    }

    /// Starts (or restarts) payout onboarding for a seller.
    ///
    /// A previous linking attempt is discarded and replaced with a fresh
    /// provider account and activation code.
    #[instrument(skip(self))]
    pub async fn create_onboarding_link(&self, seller_id: Uuid) -> Result<String, ServiceError> {
        PaymentAccounts::delete_many()
            .filter(payment_account::Column::SellerId.eq(seller_id))
            .exec(&*self.db)
            .await?;

        let account = self.provider.create_connected_account().await?;
        let activation_code: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let return_url = format!(
            "{}?activeCode={}",
            self.config.payment_return_url, activation_code
        );
        let url = self
            .provider
            .create_onboarding_link(&account.id, &self.config.payment_refresh_url, &return_url)
            .await?;

        let record = payment_account::ActiveModel {
            id: Set(Uuid::new_v4()),
            seller_id: Set(seller_id),
            provider_account_id: Set(account.id),
            activation_code: Set(activation_code),
            created_at: Set(Utc::now()),
        };
        record.insert(&*self.db).await?;

        Ok(url)
    }

    /// Completes onboarding: a valid activation code flips the seller's
    /// payout state to active.
    #[instrument(skip(self))]
    pub async fn activate_account(
        &self,
        seller_id: Uuid,
        activation_code: &str,
    ) -> Result<seller::Model, ServiceError> {
        let account = PaymentAccounts::find()
            .filter(payment_account::Column::ActivationCode.eq(activation_code))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::ValidationError("Invalid activation code".to_string())
            })?;

        if account.seller_id != seller_id {
            return Err(ServiceError::Forbidden(
                "Activation code belongs to another seller".to_string(),
            ));
        }

        let seller = Sellers::find_by_id(seller_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Seller {} not found", seller_id)))?;

        let mut seller: seller::ActiveModel = seller.into();
        seller.payment = Set(PaymentOnboarding::Active);
        seller.updated_at = Set(Utc::now());
        let seller = seller.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::SellerPaymentActivated(seller_id))
            .await;

        Ok(seller)
    }

    /// Wallet overview: total earned, pending/withdrawn sums and what is
    /// still available for withdrawal.
    #[instrument(skip(self))]
    pub async fn seller_summary(&self, seller_id: Uuid) -> Result<WalletSummary, ServiceError> {
        let amounts: Vec<Decimal> = SellerWalletEntries::find()
            .select_only()
            .column(seller_wallet_entry::Column::Amount)
            .filter(seller_wallet_entry::Column::SellerId.eq(seller_id))
            .into_tuple()
            .all(&*self.db)
            .await?;
        let total_amount: Decimal = amounts.into_iter().sum();

        let pending_withdrawals = WithdrawalRequests::find()
            .filter(withdrawal_request::Column::SellerId.eq(seller_id))
            .filter(withdrawal_request::Column::Status.eq(WithdrawalStatus::Pending))
            .order_by_desc(withdrawal_request::Column::CreatedAt)
            .all(&*self.db)
            .await?;
        let success_withdrawals = WithdrawalRequests::find()
            .filter(withdrawal_request::Column::SellerId.eq(seller_id))
            .filter(withdrawal_request::Column::Status.eq(WithdrawalStatus::Success))
            .order_by_desc(withdrawal_request::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let pending_amount: Decimal = pending_withdrawals.iter().map(|w| w.amount).sum();
        let withdrawn_amount: Decimal = success_withdrawals.iter().map(|w| w.amount).sum();
        let available_amount = if total_amount > Decimal::ZERO {
            total_amount - (pending_amount + withdrawn_amount)
        } else {
            Decimal::ZERO
        };

        Ok(WalletSummary {
            total_amount,
            pending_amount,
            withdrawn_amount,
            available_amount,
            pending_withdrawals,
            success_withdrawals,
        })
    }

    /// Files a withdrawal request against the seller's available balance.
    #[instrument(skip(self))]
    pub async fn request_withdrawal(
        &self,
        seller_id: Uuid,
        amount: Decimal,
    ) -> Result<withdrawal_request::Model, ServiceError> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Amount must be greater than 0".to_string(),
            ));
        }

        let summary = self.seller_summary(seller_id).await?;
        if amount > summary.available_amount {
            return Err(ServiceError::InvalidOperation(format!(
                "Requested {} exceeds available balance {}",
                amount, summary.available_amount
            )));
        }

        let now = Utc::now();
        let request = withdrawal_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            seller_id: Set(seller_id),
            amount: Set(amount),
            status: Set(WithdrawalStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let request = request.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::WithdrawalRequested {
                seller_id,
                request_id: request.id,
            })
            .await;

        Ok(request)
    }

    /// All withdrawal requests awaiting admin confirmation.
    pub async fn pending_requests(
        &self,
    ) -> Result<Vec<withdrawal_request::Model>, ServiceError> {
        Ok(WithdrawalRequests::find()
            .filter(withdrawal_request::Column::Status.eq(WithdrawalStatus::Pending))
            .order_by_asc(withdrawal_request::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    /// Admin confirms a withdrawal: transfers funds to the seller's
    /// connected account, then marks the request settled.
    #[instrument(skip(self))]
    pub async fn confirm_withdrawal(
        &self,
        request_id: Uuid,
    ) -> Result<withdrawal_request::Model, ServiceError> {
        let request = WithdrawalRequests::find_by_id(request_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Withdrawal request {} not found", request_id))
            })?;

        if request.status == WithdrawalStatus::Success {
            return Err(ServiceError::Conflict(
                "Withdrawal has already been settled".to_string(),
            ));
        }

        let account = PaymentAccounts::find()
            .filter(payment_account::Column::SellerId.eq(request.seller_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidOperation(
                    "Seller has not completed payout onboarding".to_string(),
                )
            })?;

        self.provider
            .create_transfer(
                request.amount,
                &self.config.currency,
                &account.provider_account_id,
            )
            .await?;

        let mut request: withdrawal_request::ActiveModel = request.into();
        request.status = Set(WithdrawalStatus::Success);
        request.updated_at = Set(Utc::now());
        let request = request.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::WithdrawalConfirmed(request_id))
            .await;

        info!(%request_id, "Withdrawal confirmed and transferred");
        Ok(request)
    }
}
