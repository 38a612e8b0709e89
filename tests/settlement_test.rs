mod common;

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::{sea_query::Expr, ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;
use vendora_api::{
    entities::{
        scheduled_task, seller_order, seller_wallet_entry,
        customer_order::{DeliveryStatus, PaymentStatus},
        CustomerOrders, PlatformWalletEntries, ScheduledTasks, SellerOrders, SellerWalletEntries,
    },
    jobs::TaskWorker,
    services::carts::AddToCartInput,
    services::orders::ShippingAddress,
    services::payments::ConfirmationOutcome,
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

/// Seeds a one-seller order (100 @10% x2, shipping 20) and returns
/// (order id, seller id).
async fn place_scenario_order(app: &TestApp) -> (Uuid, Uuid) {
    let seller = app.seed_seller("Scenario Shop").await;
    let customer = app.seed_customer().await;
    let product = app.seed_product(&seller, "Kettle", dec!(100), 10, 5).await;

    app.state
        .services
        .carts
        .add_item(
            customer.id,
            AddToCartInput {
                product_id: product.id,
                quantity: 2,
            },
        )
        .await
        .unwrap();

    let summary = app
        .state
        .services
        .carts
        .checkout_summary(customer.id)
        .await
        .unwrap();
    let order = app
        .state
        .services
        .orders
        .place_order(
            customer.id,
            summary.seller_groups,
            summary.shipping_fee,
            test_address(),
        )
        .await
        .unwrap();

    (order.id, seller.id)
}

#[tokio::test]
async fn confirmation_settles_wallets_once() {
    let app = TestApp::new().await;
    let payments = app.state.services.payments.clone();
    let (order_id, seller_id) = place_scenario_order(&app).await;

    let outcome = payments.confirm_payment(order_id).await.unwrap();
    assert_eq!(outcome, ConfirmationOutcome::Confirmed);

    let order = CustomerOrders::find_by_id(order_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Paid);

    let children = SellerOrders::find()
        .filter(seller_order::Column::ParentOrderId.eq(order_id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(children
        .iter()
        .all(|c| c.payment_status == PaymentStatus::Paid
            && c.delivery_status == DeliveryStatus::Pending));

    // One platform entry for the order total, one seller entry per child.
    let platform = PlatformWalletEntries::find()
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(platform.len(), 1);
    assert_eq!(platform[0].amount, dec!(200));
    let now = Utc::now();
    assert_eq!(platform[0].month, chrono::Datelike::month(&now) as i32);
    assert_eq!(platform[0].year, chrono::Datelike::year(&now));

    let seller_entries = SellerWalletEntries::find()
        .filter(seller_wallet_entry::Column::SellerId.eq(seller_id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(seller_entries.len(), 1);
    assert_eq!(seller_entries[0].amount, dec!(172));
}

#[tokio::test]
async fn duplicate_confirmation_is_a_noop() {
    let app = TestApp::new().await;
    let payments = app.state.services.payments.clone();
    let (order_id, _) = place_scenario_order(&app).await;

    assert_eq!(
        payments.confirm_payment(order_id).await.unwrap(),
        ConfirmationOutcome::Confirmed
    );
    assert_eq!(
        payments.confirm_payment(order_id).await.unwrap(),
        ConfirmationOutcome::AlreadyPaid
    );

    // Wallets credited exactly once despite the replay.
    let platform = PlatformWalletEntries::find()
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(platform.len(), 1);
    let seller_entries = SellerWalletEntries::find().all(&*app.state.db).await.unwrap();
    assert_eq!(seller_entries.len(), 1);
}

/// Makes the order's deferred check due now.
async fn expire_payment_window(app: &TestApp, order_id: Uuid) {
    ScheduledTasks::update_many()
        .col_expr(
            scheduled_task::Column::VisibleAfter,
            Expr::value(Utc::now() - ChronoDuration::seconds(1)),
        )
        .filter(scheduled_task::Column::SubjectId.eq(order_id))
        .exec(&*app.state.db)
        .await
        .unwrap();
}

#[tokio::test]
async fn expired_unpaid_order_is_canceled_but_stays_unpaid() {
    let app = TestApp::new().await;
    let (order_id, _) = place_scenario_order(&app).await;
    expire_payment_window(&app, order_id).await;

    let worker = TaskWorker::new(
        app.state.db.clone(),
        app.state.services.payments.clone(),
        Duration::from_secs(3600),
    );
    let drained = worker.drain_due_tasks().await.unwrap();
    assert_eq!(drained, 1);

    let order = CustomerOrders::find_by_id(order_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.delivery_status, DeliveryStatus::Canceled);
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);

    let children = SellerOrders::find()
        .filter(seller_order::Column::ParentOrderId.eq(order_id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(children
        .iter()
        .all(|c| c.delivery_status == DeliveryStatus::Canceled));

    // The task row is consumed either way.
    let tasks = ScheduledTasks::find().all(&*app.state.db).await.unwrap();
    assert!(tasks.is_empty());

    // No settlement happened.
    assert!(PlatformWalletEntries::find()
        .all(&*app.state.db)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn cancellation_check_is_a_noop_after_confirmation() {
    let app = TestApp::new().await;
    let payments = app.state.services.payments.clone();
    let (order_id, _) = place_scenario_order(&app).await;

    payments.confirm_payment(order_id).await.unwrap();
    expire_payment_window(&app, order_id).await;

    let worker = TaskWorker::new(
        app.state.db.clone(),
        payments.clone(),
        Duration::from_secs(3600),
    );
    worker.drain_due_tasks().await.unwrap();

    let order = CustomerOrders::find_by_id(order_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    // The paid order keeps its fulfillment state.
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.delivery_status, DeliveryStatus::Pending);

    // Exactly one settlement remains on the books.
    let platform = PlatformWalletEntries::find()
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(platform.len(), 1);
}

#[tokio::test]
async fn confirming_unknown_order_is_not_found() {
    let app = TestApp::new().await;
    let payments = app.state.services.payments.clone();

    let result = payments.confirm_payment(Uuid::new_v4()).await;
    assert!(matches!(
        result,
        Err(vendora_api::errors::ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn late_confirmation_reinstates_canceled_children() {
    let app = TestApp::new().await;
    let payments = app.state.services.payments.clone();
    let (order_id, _) = place_scenario_order(&app).await;

    expire_payment_window(&app, order_id).await;
    let worker = TaskWorker::new(
        app.state.db.clone(),
        payments.clone(),
        Duration::from_secs(3600),
    );
    worker.drain_due_tasks().await.unwrap();

    // A confirmation landing after auto-cancel still wins: the order was
    // never paid, so the swap succeeds and children go back to pending.
    assert_eq!(
        payments.confirm_payment(order_id).await.unwrap(),
        ConfirmationOutcome::Confirmed
    );

    let children = SellerOrders::find()
        .filter(seller_order::Column::ParentOrderId.eq(order_id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(children
        .iter()
        .all(|c| c.delivery_status == DeliveryStatus::Pending
            && c.payment_status == PaymentStatus::Paid));

    let parent = CustomerOrders::find_by_id(order_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(parent.payment_status, PaymentStatus::Paid);
    // Customer-facing delivery status stays canceled until staff reset it.
    assert_eq!(parent.delivery_status, DeliveryStatus::Canceled);
}
