mod common;

use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use vendora_api::{
    entities::{
        cart_item, scheduled_task, seller_order,
        customer_order::{DeliveryStatus, PaymentStatus},
        CartItems, ScheduledTasks, SellerOrders,
    },
    errors::ServiceError,
    services::carts::AddToCartInput,
    services::orders::ShippingAddress,
};

fn test_address() -> ShippingAddress {
    ShippingAddress {
        name: "Pat Doe".to_string(),
        address: "1 Main St".to_string(),
        phone: "555-0100".to_string(),
        post: "12345".to_string(),
        province: "State".to_string(),
        city: "Town".to_string(),
        area: "Center".to_string(),
    }
}

#[tokio::test]
async fn place_order_fans_out_per_seller_and_consumes_cart() {
    let app = TestApp::new().await;
    let carts = app.state.services.carts.clone();
    let orders = app.state.services.orders.clone();

    let seller_a = app.seed_seller("Alpha").await;
    let seller_b = app.seed_seller("Beta").await;
    let customer = app.seed_customer().await;

    // 100 @10% x2 from A, 50 @0% x1 from B
    let pa = app.seed_product(&seller_a, "Kettle", dec!(100), 10, 5).await;
    let pb = app.seed_product(&seller_b, "Lamp", dec!(50), 0, 5).await;

    for (product_id, quantity) in [(pa.id, 2), (pb.id, 1)] {
        carts
            .add_item(customer.id, AddToCartInput { product_id, quantity })
            .await
            .unwrap();
    }

    let summary = carts.checkout_summary(customer.id).await.unwrap();
    let order = orders
        .place_order(
            customer.id,
            summary.seller_groups.clone(),
            summary.shipping_fee,
            test_address(),
        )
        .await
        .unwrap();

    // Customer total = discounted items + shipping: 180 + 50 + 40 = 270.
    assert_eq!(order.total_price, dec!(270));
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);
    assert_eq!(order.delivery_status, DeliveryStatus::Pending);

    let children = SellerOrders::find()
        .filter(seller_order::Column::ParentOrderId.eq(order.id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(children.len(), 2);

    // Each child carries the seller's net-of-commission share.
    let net_sum: Decimal = children.iter().map(|c| c.price).sum();
    let expected_net: Decimal = summary.seller_groups.iter().map(|g| g.net_price).sum();
    assert_eq!(net_sum, expected_net);
    assert_eq!(net_sum, dec!(172) + dec!(48)); // 86x2 + (50-2)

    for child in &children {
        assert_eq!(child.payment_status, PaymentStatus::Unpaid);
        assert_eq!(child.delivery_status, DeliveryStatus::Pending);
        assert_eq!(child.shipping_origin, "Market Warehouse");
    }

    // Consumed cart lines are gone.
    let remaining = CartItems::find()
        .filter(cart_item::Column::CustomerId.eq(customer.id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(remaining.is_empty());

    // A deferred payment check was enqueued for this order.
    let tasks = ScheduledTasks::find()
        .filter(scheduled_task::Column::SubjectId.eq(order.id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].task_type, scheduled_task::TaskType::OrderPaymentCheck);
    assert!(tasks[0].visible_after > tasks[0].created_at);
}

#[tokio::test]
async fn place_order_leaves_out_of_stock_lines_in_cart() {
    let app = TestApp::new().await;
    let carts = app.state.services.carts.clone();
    let orders = app.state.services.orders.clone();

    let seller = app.seed_seller("Partial").await;
    let customer = app.seed_customer().await;

    let buyable = app.seed_product(&seller, "Ready", dec!(10), 0, 10).await;
    let scarce = app.seed_product(&seller, "Backordered", dec!(10), 0, 0).await;

    carts
        .add_item(
            customer.id,
            AddToCartInput {
                product_id: buyable.id,
                quantity: 1,
            },
        )
        .await
        .unwrap();
    let oos_line = carts
        .add_item(
            customer.id,
            AddToCartInput {
                product_id: scarce.id,
                quantity: 1,
            },
        )
        .await
        .unwrap();

    let summary = carts.checkout_summary(customer.id).await.unwrap();
    orders
        .place_order(
            customer.id,
            summary.seller_groups,
            summary.shipping_fee,
            test_address(),
        )
        .await
        .unwrap();

    let remaining = CartItems::find()
        .filter(cart_item::Column::CustomerId.eq(customer.id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, oos_line.id);
}

#[tokio::test]
async fn place_order_rejects_empty_checkout() {
    let app = TestApp::new().await;
    let orders = app.state.services.orders.clone();
    let customer = app.seed_customer().await;

    let result = orders
        .place_order(customer.id, Vec::new(), dec!(0), test_address())
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));
}

#[tokio::test]
async fn place_order_validates_shipping_address() {
    let app = TestApp::new().await;
    let carts = app.state.services.carts.clone();
    let orders = app.state.services.orders.clone();

    let seller = app.seed_seller("Strict").await;
    let customer = app.seed_customer().await;
    let product = app.seed_product(&seller, "Gadget", dec!(10), 0, 5).await;

    carts
        .add_item(
            customer.id,
            AddToCartInput {
                product_id: product.id,
                quantity: 1,
            },
        )
        .await
        .unwrap();
    let summary = carts.checkout_summary(customer.id).await.unwrap();

    let mut address = test_address();
    address.phone = String::new();

    let result = orders
        .place_order(customer.id, summary.seller_groups, summary.shipping_fee, address)
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));
}
