use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Mutex;
use tracing::instrument;
use uuid::Uuid;

use super::ProviderError;

/// Payment-processor capability the core depends on.
///
/// Account onboarding and the payment-element flow on the client side are
/// entirely delegated; the backend only creates intents, connected
/// accounts, onboarding links and transfers.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment intent and return its client secret.
    async fn create_payment_intent(
        &self,
        amount: Decimal,
        currency: &str,
    ) -> Result<PaymentIntent, ProviderError>;

    /// Create a connected account for seller payouts.
    async fn create_connected_account(&self) -> Result<ConnectedAccount, ProviderError>;

    /// Create a hosted onboarding link for a connected account.
    async fn create_onboarding_link(
        &self,
        account_id: &str,
        refresh_url: &str,
        return_url: &str,
    ) -> Result<String, ProviderError>;

    /// Transfer funds to a connected account.
    async fn create_transfer(
        &self,
        amount: Decimal,
        currency: &str,
        destination_account: &str,
    ) -> Result<TransferReceipt, ProviderError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectedAccount {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferReceipt {
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct OnboardingLinkResponse {
    url: String,
}

/// Stripe-wire-compatible gateway.
///
/// Amounts are decimal in their natural unit everywhere else in the
/// system and converted to minor units only at this boundary.
pub struct StripeGateway {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(base_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            secret_key: secret_key.into(),
        }
    }

    fn to_minor_units(amount: Decimal) -> Result<i64, ProviderError> {
        (amount * Decimal::ONE_HUNDRED)
            .round()
            .to_i64()
            .ok_or_else(|| ProviderError::InvalidAmount(format!("amount out of range: {amount}")))
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.secret_key)
            .form(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("{status}: {body}")));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PaymentProvider for StripeGateway {
    #[instrument(skip(self))]
    async fn create_payment_intent(
        &self,
        amount: Decimal,
        currency: &str,
    ) -> Result<PaymentIntent, ProviderError> {
        let params = [
            ("amount", Self::to_minor_units(amount)?.to_string()),
            ("currency", currency.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];
        self.post_form("/v1/payment_intents", &params).await
    }

    #[instrument(skip(self))]
    async fn create_connected_account(&self) -> Result<ConnectedAccount, ProviderError> {
        let params = [("type", "express".to_string())];
        self.post_form("/v1/accounts", &params).await
    }

    #[instrument(skip(self))]
    async fn create_onboarding_link(
        &self,
        account_id: &str,
        refresh_url: &str,
        return_url: &str,
    ) -> Result<String, ProviderError> {
        let params = [
            ("account", account_id.to_string()),
            ("refresh_url", refresh_url.to_string()),
            ("return_url", return_url.to_string()),
            ("type", "account_onboarding".to_string()),
        ];
        let link: OnboardingLinkResponse = self.post_form("/v1/account_links", &params).await?;
        Ok(link.url)
    }

    #[instrument(skip(self))]
    async fn create_transfer(
        &self,
        amount: Decimal,
        currency: &str,
        destination_account: &str,
    ) -> Result<TransferReceipt, ProviderError> {
        let params = [
            ("amount", Self::to_minor_units(amount)?.to_string()),
            ("currency", currency.to_string()),
            ("destination", destination_account.to_string()),
        ];
        self.post_form("/v1/transfers", &params).await
    }
}

/// In-memory provider used by tests; records transfers for assertions.
#[derive(Default)]
pub struct MockPaymentProvider {
    transfers: Mutex<Vec<(String, Decimal)>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transfers recorded so far as (destination account, amount) pairs.
    pub fn transfers(&self) -> Vec<(String, Decimal)> {
        self.transfers.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_payment_intent(
        &self,
        _amount: Decimal,
        _currency: &str,
    ) -> Result<PaymentIntent, ProviderError> {
        let id = Uuid::new_v4().simple().to_string();
        Ok(PaymentIntent {
            client_secret: format!("pi_{id}_secret"),
            id: format!("pi_{id}"),
        })
    }

    async fn create_connected_account(&self) -> Result<ConnectedAccount, ProviderError> {
        Ok(ConnectedAccount {
            id: format!("acct_{}", Uuid::new_v4().simple()),
        })
    }

    async fn create_onboarding_link(
        &self,
        account_id: &str,
        _refresh_url: &str,
        return_url: &str,
    ) -> Result<String, ProviderError> {
        Ok(format!("{return_url}&account={account_id}"))
    }

    async fn create_transfer(
        &self,
        amount: Decimal,
        _currency: &str,
        destination_account: &str,
    ) -> Result<TransferReceipt, ProviderError> {
        self.transfers
            .lock()
            .unwrap()
            .push((destination_account.to_string(), amount));
        Ok(TransferReceipt {
            id: format!("tr_{}", Uuid::new_v4().simple()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn minor_unit_conversion_rounds_cleanly() {
        assert_eq!(StripeGateway::to_minor_units(dec!(200)).unwrap(), 20000);
        assert_eq!(StripeGateway::to_minor_units(dec!(19.99)).unwrap(), 1999);
        assert_eq!(StripeGateway::to_minor_units(dec!(0.005)).unwrap(), 0);
    }

    #[tokio::test]
    async fn mock_provider_records_transfers() {
        let provider = MockPaymentProvider::new();
        provider
            .create_transfer(dec!(172), "usd", "acct_123")
            .await
            .unwrap();

        let transfers = provider.transfers();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0], ("acct_123".to_string(), dec!(172)));
    }
}
