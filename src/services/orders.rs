use crate::{
    config::AppConfig,
    entities::{
        cart_item, customer_order, scheduled_task, seller_order,
        customer_order::{DeliveryStatus, PaymentStatus},
        CartItems, CustomerOrders, SellerOrders,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::carts::{ProductSnapshot, SellerGroup},
    services::pricing,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

/// Address captured at order placement, validated at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ShippingAddress {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub phone: String,
    pub post: String,
    pub province: String,
    pub city: String,
    pub area: String,
}

/// Customer order joined with its per-seller children.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithChildren {
    #[serde(flatten)]
    pub order: customer_order::Model,
    pub suborders: Vec<seller_order::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerDashboard {
    pub recent_orders: Vec<customer_order::Model>,
    pub pending_orders: u64,
    pub total_orders: u64,
    pub canceled_orders: u64,
}

/// Order placement and the customer/seller/admin order query surface.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    config: Arc<AppConfig>,
}

impl OrderService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            db,
            event_sender,
            config,
        }
    }

    /// Places an order from seller-partitioned cart groups.
    ///
    /// Creates one customer order embedding every snapshot, one seller
    /// order per group priced net of commission, removes exactly the cart
    /// lines that were purchased, and enqueues the deferred payment check.
    /// All writes share one transaction; out-of-stock and unavailable
    /// lines never reach this function and stay in the cart.
    #[instrument(skip(self, groups, shipping_address))]
    pub async fn place_order(
        &self,
        customer_id: Uuid,
        groups: Vec<SellerGroup>,
        shipping_fee: Decimal,
        shipping_address: ShippingAddress,
    ) -> Result<customer_order::Model, ServiceError> {
        shipping_address.validate()?;
        if groups.is_empty() {
            return Err(ServiceError::ValidationError(
                "No purchasable items in the cart".to_string(),
            ));
        }

        let mut all_items: Vec<ProductSnapshot> = Vec::new();
        let mut consumed_lines: Vec<Uuid> = Vec::new();
        let mut items_total = Decimal::ZERO;
        for group in &groups {
            for line in &group.items {
                let quantity = Decimal::from(line.snapshot.quantity);
                items_total +=
                    pricing::discounted_unit_price(line.snapshot.price, line.snapshot.discount)
                        * quantity;
                all_items.push(line.snapshot.clone());
                consumed_lines.push(line.line_id);
            }
        }

        let now = Utc::now();
        let order_id = Uuid::new_v4();
        let txn = self.db.begin().await?;

        let order = customer_order::ActiveModel {
            id: Set(order_id),
            customer_id: Set(customer_id),
            items: Set(to_json(&all_items)?),
            total_price: Set(items_total + shipping_fee),
            shipping_address: Set(to_json(&shipping_address)?),
            payment_status: Set(PaymentStatus::Unpaid),
            delivery_status: Set(DeliveryStatus::Pending),
            placed_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let order = order.insert(&txn).await?;

        for group in &groups {
            let seller_order = seller_order::ActiveModel {
                id: Set(Uuid::new_v4()),
                parent_order_id: Set(order_id),
                seller_id: Set(group.seller_id),
                items: Set(to_json(&group.items.iter().map(|l| &l.snapshot).collect::<Vec<_>>())?),
                price: Set(group.net_price),
                payment_status: Set(PaymentStatus::Unpaid),
                delivery_status: Set(DeliveryStatus::Pending),
                shipping_origin: Set("Market Warehouse".to_string()),
                placed_at: Set(now),
                created_at: Set(now),
                updated_at: Set(now),
            };
            seller_order.insert(&txn).await?;
        }

        // Only lines that actually fed the order are removed from the cart.
        CartItems::delete_many()
            .filter(cart_item::Column::Id.is_in(consumed_lines))
            .exec(&txn)
            .await?;

        let timeout = Duration::seconds(self.config.order_payment_timeout_secs as i64);
        let task = scheduled_task::ActiveModel {
            id: Set(Uuid::new_v4()),
            task_type: Set(scheduled_task::TaskType::OrderPaymentCheck),
            subject_id: Set(order_id),
            visible_after: Set(now + timeout),
            created_at: Set(now),
        };
        task.insert(&txn).await?;

        txn.commit().await?;

        self.event_sender.send_or_log(Event::OrderPlaced(order_id)).await;

        info!(%order_id, %customer_id, sellers = groups.len(), "Order placed");
        Ok(order)
    }

    /// Customer's orders, optionally filtered by delivery status.
    #[instrument(skip(self))]
    pub async fn list_for_customer(
        &self,
        customer_id: Uuid,
        status: Option<DeliveryStatus>,
    ) -> Result<Vec<customer_order::Model>, ServiceError> {
        let mut query = CustomerOrders::find()
            .filter(customer_order::Column::CustomerId.eq(customer_id))
            .order_by_desc(customer_order::Column::PlacedAt);
        if let Some(status) = status {
            query = query.filter(customer_order::Column::DeliveryStatus.eq(status));
        }
        Ok(query.all(&*self.db).await?)
    }

    /// A single order scoped to its owner.
    #[instrument(skip(self))]
    pub async fn get_for_customer(
        &self,
        customer_id: Uuid,
        order_id: Uuid,
    ) -> Result<customer_order::Model, ServiceError> {
        let order = self.get(order_id).await?;
        if order.customer_id != customer_id {
            return Err(ServiceError::Forbidden(
                "Order belongs to another customer".to_string(),
            ));
        }
        Ok(order)
    }

    pub async fn get(&self, order_id: Uuid) -> Result<customer_order::Model, ServiceError> {
        CustomerOrders::find_by_id(order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))
    }

    #[instrument(skip(self))]
    pub async fn customer_dashboard(
        &self,
        customer_id: Uuid,
    ) -> Result<CustomerDashboard, ServiceError> {
        let recent_orders = CustomerOrders::find()
            .filter(customer_order::Column::CustomerId.eq(customer_id))
            .order_by_desc(customer_order::Column::PlacedAt)
            .limit(5)
            .all(&*self.db)
            .await?;

        let base = CustomerOrders::find()
            .filter(customer_order::Column::CustomerId.eq(customer_id));
        let total_orders = base.clone().count(&*self.db).await?;
        let pending_orders = base
            .clone()
            .filter(customer_order::Column::DeliveryStatus.eq(DeliveryStatus::Pending))
            .count(&*self.db)
            .await?;
        let canceled_orders = base
            .filter(customer_order::Column::DeliveryStatus.eq(DeliveryStatus::Canceled))
            .count(&*self.db)
            .await?;

        Ok(CustomerDashboard {
            recent_orders,
            pending_orders,
            total_orders,
            canceled_orders,
        })
    }

    /// Paginated seller orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_seller(
        &self,
        seller_id: Uuid,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<seller_order::Model>, u64), ServiceError> {
        let paginator = SellerOrders::find()
            .filter(seller_order::Column::SellerId.eq(seller_id))
            .order_by_desc(seller_order::Column::PlacedAt)
            .paginate(&*self.db, per_page.max(1));

        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((orders, total))
    }

    pub async fn get_seller_order(
        &self,
        seller_order_id: Uuid,
    ) -> Result<seller_order::Model, ServiceError> {
        SellerOrders::find_by_id(seller_order_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Seller order {} not found", seller_order_id))
            })
    }

    /// Seller advances the fulfillment state of their slice. Payment
    /// status is never touched on this path.
    #[instrument(skip(self))]
    pub async fn update_seller_delivery_status(
        &self,
        seller_id: Uuid,
        seller_order_id: Uuid,
        status: DeliveryStatus,
    ) -> Result<seller_order::Model, ServiceError> {
        let order = self.get_seller_order(seller_order_id).await?;
        if order.seller_id != seller_id {
            return Err(ServiceError::Forbidden(
                "Order belongs to another seller".to_string(),
            ));
        }

        let mut order: seller_order::ActiveModel = order.into();
        order.delivery_status = Set(status);
        order.updated_at = Set(Utc::now());
        let order = order.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::SellerOrderDeliveryStatusChanged {
                seller_order_id,
                new_status: format!("{:?}", status).to_lowercase(),
            })
            .await;

        Ok(order)
    }

    /// Paginated admin view: customer orders with their children attached.
    #[instrument(skip(self))]
    pub async fn list_for_admin(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<OrderWithChildren>, u64), ServiceError> {
        let paginator = CustomerOrders::find()
            .order_by_desc(customer_order::Column::PlacedAt)
            .paginate(&*self.db, per_page.max(1));

        let total = paginator.num_items().await?;
        let orders = paginator.fetch_page(page.saturating_sub(1)).await?;

        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let mut children: HashMap<Uuid, Vec<seller_order::Model>> = HashMap::new();
        for child in SellerOrders::find()
            .filter(seller_order::Column::ParentOrderId.is_in(order_ids))
            .all(&*self.db)
            .await?
        {
            children.entry(child.parent_order_id).or_default().push(child);
        }

        let joined = orders
            .into_iter()
            .map(|order| {
                let suborders = children.remove(&order.id).unwrap_or_default();
                OrderWithChildren { order, suborders }
            })
            .collect();

        Ok((joined, total))
    }

    pub async fn get_with_children(
        &self,
        order_id: Uuid,
    ) -> Result<OrderWithChildren, ServiceError> {
        let order = self.get(order_id).await?;
        let suborders = SellerOrders::find()
            .filter(seller_order::Column::ParentOrderId.eq(order_id))
            .all(&*self.db)
            .await?;
        Ok(OrderWithChildren { order, suborders })
    }

    /// Admin advances the customer-facing fulfillment state.
    #[instrument(skip(self))]
    pub async fn update_delivery_status(
        &self,
        order_id: Uuid,
        status: DeliveryStatus,
    ) -> Result<customer_order::Model, ServiceError> {
        let order = self.get(order_id).await?;
        let mut order: customer_order::ActiveModel = order.into();
        order.delivery_status = Set(status);
        order.updated_at = Set(Utc::now());
        let order = order.update(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::OrderDeliveryStatusChanged {
                order_id,
                new_status: format!("{:?}", status).to_lowercase(),
            })
            .await;

        Ok(order)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, ServiceError> {
    serde_json::to_value(value)
        .map_err(|e| ServiceError::InternalError(format!("serialization failed: {e}")))
}

/// Deserialize the embedded snapshots of an order items column.
pub fn snapshots_from_json(items: &serde_json::Value) -> Result<Vec<ProductSnapshot>, ServiceError> {
    serde_json::from_value(items.clone())
        .map_err(|e| ServiceError::InternalError(format!("corrupt order items: {e}")))
}
