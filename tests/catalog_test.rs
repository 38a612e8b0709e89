mod common;

use common::TestApp;
use rust_decimal_macros::dec;
use vendora_api::{
    errors::ServiceError,
    services::catalog_query::{BrowseQuery, PriceSort},
    services::products::CreateProductInput,
    services::reviews::AddReviewInput,
};

fn product_input(name: &str, price: rust_decimal::Decimal, discount: i32) -> CreateProductInput {
    CreateProductInput {
        name: name.to_string(),
        category: "kitchen".to_string(),
        description: "A fine item".to_string(),
        brand: "Acme".to_string(),
        shop_name: "Catalog Shop".to_string(),
        price,
        discount,
        stock: 10,
        image_urls: vec!["https://assets.test/products/a.jpg".to_string()],
    }
}

#[tokio::test]
async fn product_creation_slugs_the_name() {
    let app = TestApp::new().await;
    let products = app.state.services.products.clone();
    let seller = app.seed_seller("Catalog Shop").await;

    let product = products
        .create(seller.id, product_input("Blue Ceramic Kettle", dec!(40), 0))
        .await
        .unwrap();
    assert_eq!(product.slug, "Blue-Ceramic-Kettle");

    let detail = products.detail_by_slug("Blue-Ceramic-Kettle").await.unwrap();
    assert_eq!(detail.product.id, product.id);
}

#[tokio::test]
async fn product_update_is_owner_scoped() {
    let app = TestApp::new().await;
    let products = app.state.services.products.clone();
    let owner = app.seed_seller("Owner").await;
    let other = app.seed_seller("Other").await;

    let product = products
        .create(owner.id, product_input("Guarded Item", dec!(10), 0))
        .await
        .unwrap();

    let result = products.delete(other.id, product.id).await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));

    let invalid_discount = products
        .create(owner.id, product_input("Bad Discount", dec!(10), 250))
        .await;
    assert!(matches!(
        invalid_discount,
        Err(ServiceError::ValidationError(_))
    ));
}

#[tokio::test]
async fn browse_pipeline_filters_and_pages() {
    let app = TestApp::new().await;
    let products = app.state.services.products.clone();
    let seller = app.seed_seller("Browse Shop").await;

    for (name, price) in [
        ("Cheap Kettle", dec!(10)),
        ("Mid Kettle", dec!(50)),
        ("Posh Kettle", dec!(90)),
    ] {
        products
            .create(seller.id, product_input(name, price, 0))
            .await
            .unwrap();
    }

    let page = products
        .browse(BrowseQuery {
            search: Some("kettle".to_string()),
            low_price: Some(dec!(20)),
            sort: Some(PriceSort::HighToLow),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page.total_products, 2);
    assert_eq!(page.products[0].name, "Posh Kettle");
    assert_eq!(page.products[1].name, "Mid Kettle");
}

#[tokio::test]
async fn reviews_recompute_the_product_rating() {
    let app = TestApp::new().await;
    let products = app.state.services.products.clone();
    let reviews = app.state.services.reviews.clone();
    let seller = app.seed_seller("Review Shop").await;

    let product = products
        .create(seller.id, product_input("Rated Item", dec!(30), 0))
        .await
        .unwrap();

    reviews
        .add_review(AddReviewInput {
            product_id: product.id,
            reviewer_name: "Ada".to_string(),
            rating: 5,
            review: "Great".to_string(),
        })
        .await
        .unwrap();
    reviews
        .add_review(AddReviewInput {
            product_id: product.id,
            reviewer_name: "Grace".to_string(),
            rating: 4,
            review: "Solid".to_string(),
        })
        .await
        .unwrap();

    let updated = products.get(product.id).await.unwrap();
    assert_eq!(updated.rating, dec!(4.5));

    let page = reviews.list(product.id, 1).await.unwrap();
    assert_eq!(page.total_reviews, 2);
    let five_star = page.histogram.iter().find(|b| b.rating == 5).unwrap();
    assert_eq!(five_star.count, 1);

    let out_of_range = reviews
        .add_review(AddReviewInput {
            product_id: product.id,
            reviewer_name: "Eve".to_string(),
            rating: 6,
            review: "Too good".to_string(),
        })
        .await;
    assert!(matches!(out_of_range, Err(ServiceError::ValidationError(_))));
}
