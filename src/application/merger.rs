use crate::domain::merged::MergedTransaction;
use crate::domain::ports::EnricherRef;
use crate::domain::transaction::Transaction;
use crate::error::{PaymentError, Result};
use crate::infrastructure::enrichers::PlaceholderEnricher;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Combines a transaction with its gateway's supplementary data.
///
/// Each gateway may register its own enricher; gateways without one get the
/// fallback. Merging never touches the input and has no side effects of its own.
pub struct Merger {
    enrichers: HashMap<String, EnricherRef>,
    fallback: EnricherRef,
    timeout: Option<Duration>,
}

impl Default for Merger {
    fn default() -> Self {
        Self::new(Arc::new(PlaceholderEnricher::default()))
    }
}

impl Merger {
    pub fn new(fallback: EnricherRef) -> Self {
        Self {
            enrichers: HashMap::new(),
            fallback,
            timeout: None,
        }
    }

    pub fn with_enricher(mut self, gateway: impl Into<String>, enricher: EnricherRef) -> Self {
        self.enrichers.insert(gateway.into(), enricher);
        self
    }

    /// Bounds how long an enrichment source may take.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub async fn merge(&self, tx: &Transaction) -> Result<MergedTransaction> {
        let enricher = self.enrichers.get(&tx.gateway).unwrap_or(&self.fallback);
        debug!(id = %tx.id, gateway = %tx.gateway, "merging transaction");

        let pending = enricher.supplement(tx);
        let supplement = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, pending).await.map_err(|_| {
                PaymentError::MergeError(format!(
                    "enrichment for {} timed out after {}ms",
                    tx.gateway,
                    limit.as_millis()
                ))
            })?,
            None => pending.await,
        }
        .map_err(|e| PaymentError::MergeError(e.to_string()))?;

        Ok(MergedTransaction::new(tx.clone(), supplement))
    }
}
