use crate::{
    config::AppConfig,
    entities::{cart_item, product, CartItems, Products},
    errors::ServiceError,
    events::{Event, EventSender},
    services::pricing,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Immutable copy of a product captured when it enters an order path.
///
/// Embedded into orders so historical records stay stable when the live
/// product is edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub slug: String,
    pub shop_name: String,
    pub brand: String,
    pub category: String,
    pub price: Decimal,
    pub discount: i32,
    pub stock_at_purchase: i32,
    pub quantity: i32,
    pub image: Option<String>,
}

impl ProductSnapshot {
    pub fn capture(product: &product::Model, quantity: i32) -> Self {
        let image = product
            .images
            .as_array()
            .and_then(|urls| urls.first())
            .and_then(|url| url.as_str())
            .map(str::to_string);

        Self {
            product_id: product.id,
            seller_id: product.seller_id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            shop_name: product.shop_name.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            price: product.price,
            discount: product.discount,
            stock_at_purchase: product.stock,
            quantity,
            image,
        }
    }
}

/// One cart line resolved against its live product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub line_id: Uuid,
    pub snapshot: ProductSnapshot,
}

/// Seller partition of a checkout: the slice of the cart belonging to one
/// seller, priced net of platform commission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerGroup {
    pub seller_id: Uuid,
    pub shop_name: String,
    /// Σ seller_net_unit_price × quantity over this seller's lines
    pub net_price: Decimal,
    pub items: Vec<CartLine>,
}

/// Read model rendered as the checkout summary. Persists nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub seller_groups: Vec<SellerGroup>,
    /// Σ discounted_unit_price × quantity over purchasable lines, without
    /// the shipping fee
    pub total_price: Decimal,
    pub shipping_fee: Decimal,
    /// Units across purchasable lines
    pub buyable_item_count: i64,
    /// Units across all resolvable lines, including out-of-stock ones
    pub cart_item_count: i64,
    /// Lines whose requested quantity exceeds current stock; excluded from
    /// purchase and left in the cart
    pub out_of_stock: Vec<CartLine>,
    /// Cart line ids whose product no longer exists
    pub unavailable: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddToCartInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Cart management: line CRUD plus the seller-partitioned checkout
/// summary used to render and place orders.
#[derive(Clone)]
pub struct CartService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    config: Arc<AppConfig>,
}

impl CartService {
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

    /// Adds a product to the customer's cart.
    ///
    /// At most one line may exist per (customer, product); a second add is
    /// a conflict rather than a quantity bump.
    #[instrument(skip(self))]
    pub async fn add_item(
        &self,
        customer_id: Uuid,
        input: AddToCartInput,
    ) -> Result<cart_item::Model, ServiceError> {
        if input.quantity < 1 {
            return Err(ServiceError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }

        Products::find_by_id(input.product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", input.product_id))
            })?;

        let existing = CartItems::find()
            .filter(cart_item::Column::CustomerId.eq(customer_id))
            .filter(cart_item::Column::ProductId.eq(input.product_id))
            .one(&*self.db)
            .await?;

        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "Product is already in the cart".to_string(),
            ));
        }

        let line = cart_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(customer_id),
            product_id: Set(input.product_id),
            quantity: Set(input.quantity),
            created_at: Set(Utc::now()),
        };
        let line = line.insert(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::CartItemAdded {
                customer_id,
                product_id: input.product_id,
            })
            .await;

        Ok(line)
    }

    /// Removes the line for (customer, product) from the cart.
    #[instrument(skip(self))]
    pub async fn remove_item(
        &self,
        customer_id: Uuid,
        product_id: Uuid,
    ) -> Result<cart_item::Model, ServiceError> {
        let line = self.find_line(customer_id, product_id).await?;
        line.clone().delete(&*self.db).await?;

        self.event_sender
            .send_or_log(Event::CartItemRemoved {
                customer_id,
                product_id,
            })
            .await;

        Ok(line)
    }

    /// Bumps the line quantity by one.
    #[instrument(skip(self))]
    pub async fn increment_quantity(
        &self,
        customer_id: Uuid,
        product_id: Uuid,
    ) -> Result<cart_item::Model, ServiceError> {
        let line = self.find_line(customer_id, product_id).await?;
        let quantity = line.quantity;
        let mut line: cart_item::ActiveModel = line.into();
        line.quantity = Set(quantity + 1);
        Ok(line.update(&*self.db).await?)
    }

    /// Lowers the line quantity by one; one unit is the floor.
    #[instrument(skip(self))]
    pub async fn decrement_quantity(
        &self,
        customer_id: Uuid,
        product_id: Uuid,
    ) -> Result<cart_item::Model, ServiceError> {
        let line = self.find_line(customer_id, product_id).await?;
        if line.quantity <= 1 {
            return Err(ServiceError::ValidationError(
                "Quantity can not be less than 1".to_string(),
            ));
        }
        let quantity = line.quantity;
        let mut line: cart_item::ActiveModel = line.into();
        line.quantity = Set(quantity - 1);
        Ok(line.update(&*self.db).await?)
    }

    async fn find_line(
        &self,
        customer_id: Uuid,
        product_id: Uuid,
    ) -> Result<cart_item::Model, ServiceError> {
        CartItems::find()
            .filter(cart_item::Column::CustomerId.eq(customer_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Cart item not found".to_string()))
    }

    /// Builds the seller-partitioned checkout summary for a customer.
    ///
    /// Lines whose product vanished are surfaced in `unavailable`; lines
    /// whose requested quantity exceeds stock are flagged out-of-stock and
    /// excluded from purchase. The remaining lines partition by seller in
    /// order of first appearance. The union of group items, out-of-stock
    /// lines and unavailable ids is exactly the cart content.
    #[instrument(skip(self))]
    pub async fn checkout_summary(
        &self,
        customer_id: Uuid,
    ) -> Result<CheckoutSummary, ServiceError> {
        let lines = CartItems::find()
            .filter(cart_item::Column::CustomerId.eq(customer_id))
            .order_by_asc(cart_item::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let product_ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
        let products: HashMap<Uuid, product::Model> = Products::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let commission = self.config.platform_commission_percent;

        let mut unavailable = Vec::new();
        let mut out_of_stock = Vec::new();
        let mut seller_groups: Vec<SellerGroup> = Vec::new();
        let mut total_price = Decimal::ZERO;
        let mut buyable_item_count: i64 = 0;
        let mut cart_item_count: i64 = 0;

        for line in &lines {
            let Some(product) = products.get(&line.product_id) else {
                unavailable.push(line.id);
                continue;
            };

            cart_item_count += i64::from(line.quantity);
            let cart_line = CartLine {
                line_id: line.id,
                snapshot: ProductSnapshot::capture(product, line.quantity),
            };

            if product.stock < line.quantity {
                out_of_stock.push(cart_line);
                continue;
            }

            buyable_item_count += i64::from(line.quantity);
            let quantity = Decimal::from(line.quantity);
            total_price += pricing::discounted_unit_price(product.price, product.discount) * quantity;
            let net = pricing::seller_net_unit_price(product.price, product.discount, commission)
                * quantity;

            match seller_groups
                .iter_mut()
                .find(|group| group.seller_id == product.seller_id)
            {
                Some(group) => {
                    group.net_price += net;
                    group.items.push(cart_line);
                }
                None => seller_groups.push(SellerGroup {
                    seller_id: product.seller_id,
                    shop_name: product.shop_name.clone(),
                    net_price: net,
                    items: vec![cart_line],
                }),
            }
        }

        let shipping_fee =
            pricing::shipping_fee(self.config.shipping_fee_per_seller, seller_groups.len());

        info!(
            %customer_id,
            sellers = seller_groups.len(),
            buyable = buyable_item_count,
            "Built checkout summary"
        );

        Ok(CheckoutSummary {
            seller_groups,
            total_price,
            shipping_fee,
            buyable_item_count,
            cart_item_count,
            out_of_stock,
            unavailable,
        })
    }
}
