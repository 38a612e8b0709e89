mod common;

use common::TestApp;
use rust_decimal_macros::dec;
use uuid::Uuid;
use vendora_api::{
    auth::Role,
    errors::ServiceError,
    services::carts::AddToCartInput,
    services::customers::{Credentials, RegisterInput},
    services::wishlists::WishlistToggle,
};

fn register_input(email: &str) -> RegisterInput {
    RegisterInput {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        password: "correct-horse-battery".to_string(),
    }
}

#[tokio::test]
async fn customer_register_and_login_round_trip() {
    let app = TestApp::new().await;
    let customers = app.state.services.customers.clone();

    let registered = customers
        .register(register_input("ada@example.com"))
        .await
        .unwrap();
    assert_eq!(registered.customer.role, "user");

    // The issued token resolves back to the same actor.
    let user = app
        .state
        .auth
        .authenticate(&registered.token.access_token)
        .unwrap();
    assert_eq!(user.id, registered.customer.id);
    assert_eq!(user.role, Role::User);

    let logged_in = customers
        .login(Credentials {
            email: "ada@example.com".to_string(),
            password: "correct-horse-battery".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(logged_in.customer.id, registered.customer.id);

    let rejected = customers
        .login(Credentials {
            email: "ada@example.com".to_string(),
            password: "wrong password".to_string(),
        })
        .await;
    assert!(matches!(rejected, Err(ServiceError::AuthError(_))));
}

#[tokio::test]
async fn duplicate_email_registration_conflicts() {
    let app = TestApp::new().await;
    let customers = app.state.services.customers.clone();

    customers
        .register(register_input("dup@example.com"))
        .await
        .unwrap();
    let second = customers.register(register_input("dup@example.com")).await;
    assert!(matches!(second, Err(ServiceError::Conflict(_))));
}

#[tokio::test]
async fn weak_password_is_rejected() {
    let app = TestApp::new().await;
    let mut input = register_input("weak@example.com");
    input.password = "short".to_string();

    let result = app.state.services.customers.register(input).await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));
}

#[tokio::test]
async fn cart_enforces_one_line_per_product() {
    let app = TestApp::new().await;
    let carts = app.state.services.carts.clone();

    let seller = app.seed_seller("Cart Shop").await;
    let customer = app.seed_customer().await;
    let product = app.seed_product(&seller, "Widget", dec!(10), 0, 5).await;

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

    let second = carts
        .add_item(
            customer.id,
            AddToCartInput {
                product_id: product.id,
                quantity: 1,
            },
        )
        .await;
    assert!(matches!(second, Err(ServiceError::Conflict(_))));
}

#[tokio::test]
async fn cart_rejects_unknown_product_and_bad_quantity() {
    let app = TestApp::new().await;
    let carts = app.state.services.carts.clone();
    let customer = app.seed_customer().await;

    let missing = carts
        .add_item(
            customer.id,
            AddToCartInput {
                product_id: Uuid::new_v4(),
                quantity: 1,
            },
        )
        .await;
    assert!(matches!(missing, Err(ServiceError::NotFound(_))));

    let seller = app.seed_seller("Qty Shop").await;
    let product = app.seed_product(&seller, "Widget", dec!(10), 0, 5).await;
    let zero = carts
        .add_item(
            customer.id,
            AddToCartInput {
                product_id: product.id,
                quantity: 0,
            },
        )
        .await;
    assert!(matches!(zero, Err(ServiceError::ValidationError(_))));
}

#[tokio::test]
async fn cart_quantity_floors_at_one() {
    let app = TestApp::new().await;
    let carts = app.state.services.carts.clone();

    let seller = app.seed_seller("Floor Shop").await;
    let customer = app.seed_customer().await;
    let product = app.seed_product(&seller, "Widget", dec!(10), 0, 5).await;

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

    let line = carts
        .increment_quantity(customer.id, product.id)
        .await
        .unwrap();
    assert_eq!(line.quantity, 3);

    carts.decrement_quantity(customer.id, product.id).await.unwrap();
    let line = carts
        .decrement_quantity(customer.id, product.id)
        .await
        .unwrap();
    assert_eq!(line.quantity, 1);

    let below_floor = carts.decrement_quantity(customer.id, product.id).await;
    assert!(matches!(below_floor, Err(ServiceError::ValidationError(_))));
}

#[tokio::test]
async fn wishlist_toggle_adds_then_removes() {
    let app = TestApp::new().await;
    let wishlists = app.state.services.wishlists.clone();

    let seller = app.seed_seller("Wish Shop").await;
    let customer = app.seed_customer().await;
    let product = app.seed_product(&seller, "Charm", dec!(15), 0, 5).await;

    let first = wishlists.toggle(customer.id, product.id).await.unwrap();
    assert!(matches!(first, WishlistToggle::Added { .. }));
    assert_eq!(wishlists.list(customer.id).await.unwrap().len(), 1);

    let second = wishlists.toggle(customer.id, product.id).await.unwrap();
    assert!(matches!(second, WishlistToggle::Removed { .. }));
    assert!(wishlists.list(customer.id).await.unwrap().is_empty());
}
