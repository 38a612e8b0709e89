use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use tokio::sync::mpsc;
use uuid::Uuid;
use vendora_api::{
    auth::{AuthConfig, AuthService, Role},
    config::AppConfig,
    db,
    entities::{customer, product, seller},
    events::{self, EventSender},
    handlers::AppServices,
    providers::{AssetStorage, InMemoryAssetStorage, MockPaymentProvider, PaymentProvider},
    AppState,
};

/// Test harness backed by an in-memory SQLite database with the full
/// schema applied and mock external providers.
pub struct TestApp {
    pub state: AppState,
    #[allow(dead_code)]
    pub payment_provider: Arc<MockPaymentProvider>,
    #[allow(dead_code)]
    pub assets: Arc<InMemoryAssetStorage>,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // A single pooled connection keeps the in-memory database alive
        // for the whole test.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db = Arc::new(pool);
        let cfg = Arc::new(cfg);

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let auth = Arc::new(AuthService::new(AuthConfig::new(
            cfg.jwt_secret.clone(),
            cfg.auth_issuer.clone(),
            cfg.auth_audience.clone(),
            Duration::from_secs(3600),
        )));

        let payment_provider = Arc::new(MockPaymentProvider::new());
        let assets = Arc::new(InMemoryAssetStorage::new());
        let payment_dyn: Arc<dyn PaymentProvider> = payment_provider.clone();
        let assets_dyn: Arc<dyn AssetStorage> = assets.clone();

        let services = AppServices::new(
            db.clone(),
            Arc::new(event_sender.clone()),
            cfg.clone(),
            auth.clone(),
            payment_dyn,
            assets_dyn,
        );

        let state = AppState {
            db,
            config: cfg,
            event_sender,
            auth,
            services,
        };

        Self {
            state,
            payment_provider,
            assets,
            _event_task: event_task,
        }
    }

    /// Builds the same router main() serves, minus the network listener.
    pub fn router(&self) -> Router {
        let auth = self.state.auth.clone();
        Router::new()
            .nest("/api/v1", vendora_api::api_v1_routes())
            .layer(axum::middleware::from_fn_with_state(
                auth,
                |axum::extract::State(auth): axum::extract::State<Arc<AuthService>>,
                 mut req: axum::extract::Request,
                 next: axum::middleware::Next| async move {
                    req.extensions_mut().insert(auth);
                    next.run(req).await
                },
            ))
            .with_state(self.state.clone())
    }

    /// Inserts a seller row directly.
    pub async fn seed_seller(&self, shop_name: &str) -> seller::Model {
        let now = Utc::now();
        let model = seller::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set("Test".to_string()),
            last_name: Set(shop_name.to_string()),
            email: Set(format!("{}@sellers.test", Uuid::new_v4().simple())),
            password_hash: Set("unused".to_string()),
            role: Set(Role::Seller.as_str().to_string()),
            status: Set(seller::SellerStatus::Active),
            payment: Set(seller::PaymentOnboarding::Inactive),
            method: Set("manual".to_string()),
            image: Set(None),
            shop_info: Set(Some(serde_json::json!({ "shop_name": shop_name }))),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model
            .insert(&*self.state.db)
            .await
            .expect("failed to seed seller")
    }

    /// Inserts a customer row directly.
    pub async fn seed_customer(&self) -> customer::Model {
        let now = Utc::now();
        let model = customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set("Test".to_string()),
            last_name: Set("Customer".to_string()),
            email: Set(format!("{}@customers.test", Uuid::new_v4().simple())),
            password_hash: Set("unused".to_string()),
            role: Set(Role::User.as_str().to_string()),
            method: Set("manual".to_string()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model
            .insert(&*self.state.db)
            .await
            .expect("failed to seed customer")
    }

    /// Inserts a product row directly.
    pub async fn seed_product(
        &self,
        seller: &seller::Model,
        name: &str,
        price: Decimal,
        discount: i32,
        stock: i32,
    ) -> product::Model {
        let shop_name = seller
            .shop_info
            .as_ref()
            .and_then(|info| info.get("shop_name"))
            .and_then(|v| v.as_str())
            .unwrap_or("Shop")
            .to_string();

        let now = Utc::now();
        let model = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            seller_id: Set(seller.id),
            name: Set(name.to_string()),
            slug: Set(name.to_lowercase().replace(' ', "-")),
            shop_name: Set(shop_name),
            category: Set("general".to_string()),
            description: Set("test product".to_string()),
            brand: Set("Acme".to_string()),
            price: Set(price),
            discount: Set(discount),
            stock: Set(stock),
            rating: Set(Decimal::ZERO),
            images: Set(serde_json::json!(["https://assets.test/products/p.jpg"])),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model
            .insert(&*self.state.db)
            .await
            .expect("failed to seed product")
    }
}
