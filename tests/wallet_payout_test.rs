mod common;

use chrono::{Datelike, Utc};
use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;
use vendora_api::{
    entities::{seller::PaymentOnboarding, seller_wallet_entry},
    errors::ServiceError,
};

/// Credits a seller wallet directly, as settlement would.
async fn credit_wallet(app: &TestApp, seller_id: Uuid, amount: rust_decimal::Decimal) {
    let now = Utc::now();
    seller_wallet_entry::ActiveModel {
        id: Set(Uuid::new_v4()),
        seller_id: Set(seller_id),
        amount: Set(amount),
        month: Set(now.month() as i32),
        year: Set(now.year()),
        created_at: Set(now),
    }
    .insert(&*app.state.db)
    .await
    .expect("failed to credit wallet");
}

#[tokio::test]
async fn onboarding_activation_flips_payout_state() {
    let app = TestApp::new().await;
    let wallets = app.state.services.wallets.clone();
    let seller = app.seed_seller("Payout Shop").await;

    let url = wallets.create_onboarding_link(seller.id).await.unwrap();
    // The mock provider embeds the activation code in the return URL.
    let code = url.split("activeCode=").nth(1).unwrap().split('&').next().unwrap();

    let wrong = wallets.activate_account(seller.id, "not-a-code").await;
    assert!(matches!(wrong, Err(ServiceError::ValidationError(_))));

    let updated = wallets.activate_account(seller.id, code).await.unwrap();
    assert_eq!(updated.payment, PaymentOnboarding::Active);
}

#[tokio::test]
async fn activation_code_is_owner_bound() {
    let app = TestApp::new().await;
    let wallets = app.state.services.wallets.clone();
    let owner = app.seed_seller("Owner Shop").await;
    let intruder = app.seed_seller("Intruder Shop").await;

    let url = wallets.create_onboarding_link(owner.id).await.unwrap();
    let code = url.split("activeCode=").nth(1).unwrap().split('&').next().unwrap();

    let stolen = wallets.activate_account(intruder.id, code).await;
    assert!(matches!(stolen, Err(ServiceError::Forbidden(_))));
}

#[tokio::test]
async fn wallet_summary_nets_out_withdrawals() {
    let app = TestApp::new().await;
    let wallets = app.state.services.wallets.clone();
    let seller = app.seed_seller("Ledger Shop").await;

    credit_wallet(&app, seller.id, dec!(100)).await;
    credit_wallet(&app, seller.id, dec!(72)).await;

    wallets.request_withdrawal(seller.id, dec!(50)).await.unwrap();

    let summary = wallets.seller_summary(seller.id).await.unwrap();
    assert_eq!(summary.total_amount, dec!(172));
    assert_eq!(summary.pending_amount, dec!(50));
    assert_eq!(summary.withdrawn_amount, dec!(0));
    assert_eq!(summary.available_amount, dec!(122));

    // A request beyond the available balance is refused.
    let excessive = wallets.request_withdrawal(seller.id, dec!(200)).await;
    assert!(matches!(excessive, Err(ServiceError::InvalidOperation(_))));
}

#[tokio::test]
async fn admin_confirmation_transfers_and_settles() {
    let app = TestApp::new().await;
    let wallets = app.state.services.wallets.clone();
    let seller = app.seed_seller("Transfer Shop").await;

    credit_wallet(&app, seller.id, dec!(80)).await;
    // Onboarding must be complete before a transfer has a destination.
    wallets.create_onboarding_link(seller.id).await.unwrap();

    let request = wallets.request_withdrawal(seller.id, dec!(60)).await.unwrap();
    assert_eq!(wallets.pending_requests().await.unwrap().len(), 1);

    let confirmed = wallets.confirm_withdrawal(request.id).await.unwrap();
    assert!(wallets.pending_requests().await.unwrap().is_empty());

    // The provider saw exactly one transfer for the requested amount.
    let transfers = app.payment_provider.transfers();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].1, dec!(60));

    // Settling twice is refused.
    let replay = wallets.confirm_withdrawal(confirmed.id).await;
    assert!(matches!(replay, Err(ServiceError::Conflict(_))));

    let summary = wallets.seller_summary(seller.id).await.unwrap();
    assert_eq!(summary.withdrawn_amount, dec!(60));
    assert_eq!(summary.available_amount, dec!(20));
}
