mod common;

use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::EntityTrait;
use vendora_api::{entities::Products, services::carts::AddToCartInput};

#[tokio::test]
async fn summary_prices_single_seller_cart() {
    let app = TestApp::new().await;
    let carts = app.state.services.carts.clone();

    let seller = app.seed_seller("Kettle Co").await;
    let customer = app.seed_customer().await;
    // price 100, discount 10%, stock 5
    let product = app.seed_product(&seller, "Blue Kettle", dec!(100), 10, 5).await;

    carts
        .add_item(
            customer.id,
            AddToCartInput {
                product_id: product.id,
                quantity: 2,
            },
        )
        .await
        .unwrap();

    let summary = carts.checkout_summary(customer.id).await.unwrap();

    // discounted 90 x2 = 180; net of 5% commission 86 x2 = 172; one seller -> fee 20
    assert_eq!(summary.total_price, dec!(180));
    assert_eq!(summary.shipping_fee, dec!(20));
    assert_eq!(summary.buyable_item_count, 2);
    assert_eq!(summary.seller_groups.len(), 1);
    assert_eq!(summary.seller_groups[0].net_price, dec!(172));
    assert_eq!(summary.seller_groups[0].shop_name, "Kettle Co");
    assert!(summary.out_of_stock.is_empty());
    assert!(summary.unavailable.is_empty());
}

#[tokio::test]
async fn summary_partitions_by_seller_in_first_appearance_order() {
    let app = TestApp::new().await;
    let carts = app.state.services.carts.clone();

    let seller_a = app.seed_seller("Alpha").await;
    let seller_b = app.seed_seller("Beta").await;
    let customer = app.seed_customer().await;

    let p1 = app.seed_product(&seller_b, "First Item", dec!(10), 0, 9).await;
    let p2 = app.seed_product(&seller_a, "Second Item", dec!(20), 0, 9).await;
    let p3 = app.seed_product(&seller_b, "Third Item", dec!(30), 0, 9).await;

    for product_id in [p1.id, p2.id, p3.id] {
        carts
            .add_item(
                customer.id,
                AddToCartInput {
                    product_id,
                    quantity: 1,
                },
            )
            .await
            .unwrap();
    }

    let summary = carts.checkout_summary(customer.id).await.unwrap();

    assert_eq!(summary.seller_groups.len(), 2);
    // Beta appeared first in the cart, so its partition comes first.
    assert_eq!(summary.seller_groups[0].seller_id, seller_b.id);
    assert_eq!(summary.seller_groups[0].items.len(), 2);
    assert_eq!(summary.seller_groups[1].seller_id, seller_a.id);
    // Two distinct sellers -> double shipping fee.
    assert_eq!(summary.shipping_fee, dec!(40));
}

#[tokio::test]
async fn summary_flags_out_of_stock_and_keeps_union_exact() {
    let app = TestApp::new().await;
    let carts = app.state.services.carts.clone();

    let seller = app.seed_seller("Union Shop").await;
    let customer = app.seed_customer().await;

    let in_stock = app.seed_product(&seller, "Plenty", dec!(10), 0, 10).await;
    let scarce = app.seed_product(&seller, "Scarce", dec!(10), 0, 1).await;

    let line_ok = carts
        .add_item(
            customer.id,
            AddToCartInput {
                product_id: in_stock.id,
                quantity: 3,
            },
        )
        .await
        .unwrap();
    let line_oos = carts
        .add_item(
            customer.id,
            AddToCartInput {
                product_id: scarce.id,
                quantity: 2,
            },
        )
        .await
        .unwrap();

    let summary = carts.checkout_summary(customer.id).await.unwrap();

    let grouped: Vec<_> = summary
        .seller_groups
        .iter()
        .flat_map(|g| g.items.iter().map(|l| l.line_id))
        .collect();
    assert_eq!(grouped, vec![line_ok.id]);
    assert_eq!(summary.out_of_stock.len(), 1);
    assert_eq!(summary.out_of_stock[0].line_id, line_oos.id);
    assert!(summary.unavailable.is_empty());

    // No line lost or duplicated across the partitions.
    assert_eq!(grouped.len() + summary.out_of_stock.len(), 2);
    assert_eq!(summary.buyable_item_count, 3);
    assert_eq!(summary.cart_item_count, 5);
    // Out-of-stock units never price in.
    assert_eq!(summary.total_price, dec!(30));
}

#[tokio::test]
async fn summary_surfaces_lines_whose_product_vanished() {
    let app = TestApp::new().await;
    let carts = app.state.services.carts.clone();

    let seller = app.seed_seller("Ghost Shop").await;
    let customer = app.seed_customer().await;
    let product = app.seed_product(&seller, "Ephemeral", dec!(50), 0, 5).await;

    let line = carts
        .add_item(
            customer.id,
            AddToCartInput {
                product_id: product.id,
                quantity: 1,
            },
        )
        .await
        .unwrap();

    Products::delete_by_id(product.id)
        .exec(&*app.state.db)
        .await
        .unwrap();

    let summary = carts.checkout_summary(customer.id).await.unwrap();

    assert!(summary.seller_groups.is_empty());
    assert_eq!(summary.unavailable, vec![line.id]);
    assert_eq!(summary.total_price, dec!(0));
    assert_eq!(summary.shipping_fee, dec!(0));
}
