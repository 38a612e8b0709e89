pub mod admin;
pub mod banners;
pub mod categories;
pub mod common;
pub mod customers;
pub mod orders;
pub mod payments;
pub mod products;
pub mod sellers;

use crate::{
    auth::AuthService,
    config::AppConfig,
    events::EventSender,
    providers::{AssetStorage, PaymentProvider},
    services::{
        AdminService, BannerService, CartService, CategoryService, CustomerService, OrderService,
        PaymentService, ProductService, ReviewService, SellerService, WalletService,
        WishlistService,
    },
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Aggregated services consumed by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub customers: Arc<CustomerService>,
    pub sellers: Arc<SellerService>,
    pub admins: Arc<AdminService>,
    pub products: Arc<ProductService>,
    pub reviews: Arc<ReviewService>,
    pub categories: Arc<CategoryService>,
    pub banners: Arc<BannerService>,
    pub carts: Arc<CartService>,
    pub wishlists: Arc<WishlistService>,
    pub orders: Arc<OrderService>,
    pub payments: Arc<PaymentService>,
    pub wallets: Arc<WalletService>,
    pub assets: Arc<dyn AssetStorage>,
}

impl AppServices {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: Arc<EventSender>,
        config: Arc<AppConfig>,
        auth: Arc<AuthService>,
        payment_provider: Arc<dyn PaymentProvider>,
        assets: Arc<dyn AssetStorage>,
    ) -> Self {
        Self {
            customers: Arc::new(CustomerService::new(
                db.clone(),
                event_sender.clone(),
                auth.clone(),
            )),
            sellers: Arc::new(SellerService::new(
                db.clone(),
                event_sender.clone(),
                auth.clone(),
            )),
            admins: Arc::new(AdminService::new(db.clone(), auth)),
            products: Arc::new(ProductService::new(db.clone(), event_sender.clone())),
            reviews: Arc::new(ReviewService::new(db.clone(), event_sender.clone())),
            categories: Arc::new(CategoryService::new(db.clone(), event_sender.clone())),
            banners: Arc::new(BannerService::new(
                db.clone(),
                event_sender.clone(),
                assets.clone(),
            )),
            carts: Arc::new(CartService::new(
                db.clone(),
                event_sender.clone(),
                config.clone(),
            )),
            wishlists: Arc::new(WishlistService::new(db.clone())),
            orders: Arc::new(OrderService::new(
                db.clone(),
                event_sender.clone(),
                config.clone(),
            )),
            payments: Arc::new(PaymentService::new(
                db.clone(),
                event_sender.clone(),
                config.clone(),
                payment_provider.clone(),
            )),
            wallets: Arc::new(WalletService::new(
                db,
                event_sender,
                config,
                payment_provider,
            )),
            assets,
        }
    }
}
