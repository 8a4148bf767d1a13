use crate::application::callback_decoder::CallbackDecoder;
use crate::application::router::GatewayRouter;
use crate::domain::ports::{CodecRef, GatewayError, TransactionStoreBox};
use crate::domain::transaction::{Amount, StatusPolicy, Transaction, TransactionType};
use crate::error::{PaymentError, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Owns the transaction store and drives each transaction's status lifecycle.
///
/// Payments are routed to a gateway and only stored once the gateway has
/// answered with an identifier. Callbacks are decoded per gateway and move the
/// matching transaction to the reported status. The store is never reachable
/// from outside this type.
pub struct PaymentService {
    store: TransactionStoreBox,
    router: GatewayRouter,
    decoder: CallbackDecoder,
    policy: Arc<StatusPolicy>,
    gateway_timeout: Option<Duration>,
}

impl PaymentService {
    /// Creates a new `PaymentService`.
    ///
    /// # Arguments
    ///
    /// * `store` - Backing store for transactions.
    /// * `router` - Router holding the registered gateways.
    /// * `decoder` - Callback codecs keyed by gateway name.
    pub fn new(store: TransactionStoreBox, router: GatewayRouter, decoder: CallbackDecoder) -> Self {
        Self {
            store,
            router,
            decoder,
            policy: Arc::new(StatusPolicy::default()),
            gateway_timeout: None,
        }
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Bounds how long a single gateway call may take.
    pub fn with_gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = Some(timeout);
        self
    }

    pub fn router(&self) -> &GatewayRouter {
        &self.router
    }

    /// Codec the given gateway uses for its callbacks.
    pub fn callback_codec(&self, gateway: &str) -> Result<&CodecRef> {
        self.decoder.codec(gateway)
    }

    /// Routes a payment and records it as `pending`.
    ///
    /// Nothing is stored unless the gateway call succeeds with a usable
    /// identifier. Dropping the returned future before completion stores nothing.
    #[instrument(skip(self, amount), fields(amount = %amount))]
    pub async fn process_payment(
        &self,
        amount: Amount,
        kind: TransactionType,
        gateway: &str,
    ) -> Result<Transaction> {
        let routed = self.router.route_payment(amount, kind, gateway);
        let id = match self.gateway_timeout {
            Some(limit) => tokio::time::timeout(limit, routed)
                .await
                .map_err(|_| PaymentError::DeadlineExceeded(limit.as_millis() as u64))??,
            None => routed.await?,
        };

        if id.trim().is_empty() {
            return Err(PaymentError::GatewayFailure {
                gateway: gateway.to_string(),
                source: GatewayError::EmptyIdentifier,
            });
        }

        let tx = Transaction::new(id, amount, kind, gateway.to_string());
        self.store.insert(tx.clone()).await?;

        info!(id = %tx.id, "transaction created");
        Ok(tx)
    }

    pub async fn deposit(&self, amount: Amount, gateway: &str) -> Result<Transaction> {
        self.process_payment(amount, TransactionType::Deposit, gateway)
            .await
    }

    pub async fn withdraw(&self, amount: Amount, gateway: &str) -> Result<Transaction> {
        self.process_payment(amount, TransactionType::Withdrawal, gateway)
            .await
    }

    /// Applies a gateway callback to the transaction it refers to.
    pub async fn handle_callback(&self, gateway: &str, raw: &[u8]) -> Result<()> {
        self.handle_callback_with_content_type(gateway, raw, None)
            .await
    }

    /// Like [`handle_callback`](Self::handle_callback), additionally checking the
    /// transport's content type against the gateway's wire format.
    #[instrument(skip(self, raw), fields(bytes = raw.len()))]
    pub async fn handle_callback_with_content_type(
        &self,
        gateway: &str,
        raw: &[u8],
        content_type: Option<&str>,
    ) -> Result<()> {
        let update = self
            .decoder
            .decode(gateway, raw, content_type)
            .inspect_err(|e| warn!(error = %e, "rejected callback"))?;

        let policy = Arc::clone(&self.policy);
        let status = update.status.clone();
        let tx = self
            .store
            .update(
                &update.transaction_id,
                Box::new(move |tx: &mut Transaction| tx.apply_status(status, &policy)),
            )
            .await
            .inspect_err(|e| warn!(id = %update.transaction_id, error = %e, "callback not applied"))?;

        info!(id = %tx.id, status = %tx.status, "transaction status updated");
        Ok(())
    }

    pub async fn get_transaction(&self, id: &str) -> Result<Transaction> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| PaymentError::TransactionNotFound(id.to_string()))
    }

    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.store.get_all().await
    }
}
