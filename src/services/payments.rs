use crate::{
    config::AppConfig,
    entities::{
        customer_order,
        customer_order::{DeliveryStatus, PaymentStatus},
        platform_wallet_entry, seller_order, seller_wallet_entry, CustomerOrders, SellerOrders,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    providers::PaymentProvider,
};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Outcome of a payment confirmation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// The order transitioned unpaid -> paid and wallets were credited.
    Confirmed,
    /// The order was already paid; nothing changed.
    AlreadyPaid,
}

/// Payment intents, settlement and the deferred cancellation check.
#[derive(Clone)]
pub struct PaymentService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    config: Arc<AppConfig>,
    provider: Arc<dyn PaymentProvider>,
}

impl PaymentService {
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

    /// Creates a payment intent for the given amount and returns the
    /// client secret used by the payment element on the storefront.
    #[instrument(skip(self))]
    pub async fn create_intent(&self, amount: Decimal) -> Result<String, ServiceError> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Amount must be greater than 0".to_string(),
            ));
        }

        let intent = self
            .provider
            .create_payment_intent(amount, &self.config.currency)
            .await?;
        Ok(intent.client_secret)
    }

    /// Marks an order paid and settles wallets.
    ///
    /// The unpaid -> paid transition is a conditional update; only the
    /// caller that wins the swap performs settlement. A replayed
    /// confirmation (or one racing the cancellation check) filters to zero
    /// rows and becomes a no-op, so wallets are credited exactly once per
    /// order.
    #[instrument(skip(self))]
    pub async fn confirm_payment(
        &self,
        order_id: Uuid,
    ) -> Result<ConfirmationOutcome, ServiceError> {
        let order = CustomerOrders::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let txn = self.db.begin().await?;

        let swap = CustomerOrders::update_many()
            .col_expr(
                customer_order::Column::PaymentStatus,
                Expr::value(PaymentStatus::Paid),
            )
            .col_expr(customer_order::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(customer_order::Column::Id.eq(order_id))
            .filter(customer_order::Column::PaymentStatus.eq(PaymentStatus::Unpaid))
            .exec(&txn)
            .await?;

        if swap.rows_affected == 0 {
            txn.rollback().await?;
            info!(%order_id, "Duplicate payment confirmation ignored");
            return Ok(ConfirmationOutcome::AlreadyPaid);
        }

        SellerOrders::update_many()
            .col_expr(
                seller_order::Column::PaymentStatus,
                Expr::value(PaymentStatus::Paid),
            )
            .col_expr(
                seller_order::Column::DeliveryStatus,
                Expr::value(DeliveryStatus::Pending),
            )
            .col_expr(seller_order::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(seller_order::Column::ParentOrderId.eq(order_id))
            .exec(&txn)
            .await?;

        let children = SellerOrders::find()
            .filter(seller_order::Column::ParentOrderId.eq(order_id))
            .all(&txn)
            .await?;

        let now = Utc::now();
        let month = now.month() as i32;
        let year = now.year();

        let platform_entry = platform_wallet_entry::ActiveModel {
            id: Set(Uuid::new_v4()),
            amount: Set(order.total_price),
            month: Set(month),
            year: Set(year),
            created_at: Set(now),
        };
        platform_entry.insert(&txn).await?;

        for child in &children {
            let seller_entry = seller_wallet_entry::ActiveModel {
                id: Set(Uuid::new_v4()),
                seller_id: Set(child.seller_id),
                amount: Set(child.price),
                month: Set(month),
                year: Set(year),
                created_at: Set(now),
            };
            seller_entry.insert(&txn).await?;
        }

        txn.commit().await?;

        self.event_sender
            .send_or_log(Event::OrderPaymentConfirmed(order_id))
            .await;

        info!(%order_id, sellers = children.len(), "Payment confirmed and wallets settled");
        Ok(ConfirmationOutcome::Confirmed)
    }

    /// Deferred payment check executed by the task worker once the grace
    /// window has elapsed.
    ///
    /// Cancels delivery on the order and its children only while the order
    /// is still unpaid; the payment status itself is left untouched. A
    /// confirmation that landed first makes this a no-op, mirroring the
    /// conditional update on the confirmation path.
    #[instrument(skip(self))]
    pub async fn run_payment_check(&self, order_id: Uuid) -> Result<(), ServiceError> {
        let canceled = CustomerOrders::update_many()
            .col_expr(
                customer_order::Column::DeliveryStatus,
                Expr::value(DeliveryStatus::Canceled),
            )
            .col_expr(customer_order::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(customer_order::Column::Id.eq(order_id))
            .filter(customer_order::Column::PaymentStatus.eq(PaymentStatus::Unpaid))
            .exec(&*self.db)
            .await?;

        if canceled.rows_affected == 0 {
            return Ok(());
        }

        SellerOrders::update_many()
            .col_expr(
                seller_order::Column::DeliveryStatus,
                Expr::value(DeliveryStatus::Canceled),
            )
            .col_expr(seller_order::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(seller_order::Column::ParentOrderId.eq(order_id))
            .filter(seller_order::Column::PaymentStatus.eq(PaymentStatus::Unpaid))
            .exec(&*self.db)
            .await?;

        self.event_sender
            .send_or_log(Event::OrderAutoCanceled(order_id))
            .await;

        warn!(%order_id, "Order canceled: payment not received within the grace window");
        Ok(())
    }
}
