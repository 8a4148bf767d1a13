use crate::domain::callback::CallbackUpdate;
use crate::domain::merged::Supplement;
use crate::domain::ports::{CodecRef, EnricherRef, EnrichmentError, EnrichmentResult, Enricher};
use crate::domain::transaction::Transaction;
use async_trait::async_trait;
use std::time::Duration;

pub const PLACEHOLDER_KEY: &str = "xml_response";
pub const PLACEHOLDER_VALUE: &str = "i am xml response";

/// Contributes one fixed field to every merged view.
#[derive(Debug, Clone)]
pub struct PlaceholderEnricher {
    key: String,
    value: String,
}

impl Default for PlaceholderEnricher {
    fn default() -> Self {
        Self::new(PLACEHOLDER_KEY, PLACEHOLDER_VALUE)
    }
}

impl PlaceholderEnricher {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[async_trait]
impl Enricher for PlaceholderEnricher {
    async fn supplement(&self, _tx: &Transaction) -> EnrichmentResult {
        Ok(Supplement::from([(self.key.clone(), self.value.clone())]))
    }
}

/// Echoes the transaction's current state as the gateway itself would report it,
/// rendered in that gateway's callback wire format.
#[derive(Clone)]
pub struct WireEchoEnricher {
    codec: CodecRef,
}

impl WireEchoEnricher {
    pub fn new(codec: CodecRef) -> Self {
        Self { codec }
    }
}

#[async_trait]
impl Enricher for WireEchoEnricher {
    async fn supplement(&self, tx: &Transaction) -> EnrichmentResult {
        let update = CallbackUpdate {
            transaction_id: tx.id.clone(),
            status: tx.status.clone(),
        };
        let raw = self
            .codec
            .encode(&update)
            .map_err(|e| EnrichmentError::Malformed(e.to_string()))?;
        let echo = String::from_utf8(raw).map_err(|e| EnrichmentError::Malformed(e.to_string()))?;

        Ok(Supplement::from([
            (
                "wire_format".to_string(),
                self.codec.format().to_string(),
            ),
            ("echo".to_string(), echo),
        ]))
    }
}

/// Delays another enricher, standing in for a slow supplementary data source.
#[derive(Clone)]
pub struct DelayedEnricher {
    inner: EnricherRef,
    latency: Duration,
}

impl DelayedEnricher {
    pub fn new(inner: EnricherRef, latency: Duration) -> Self {
        Self { inner, latency }
    }
}

#[async_trait]
impl Enricher for DelayedEnricher {
    async fn supplement(&self, tx: &Transaction) -> EnrichmentResult {
        tokio::time::sleep(self.latency).await;
        self.inner.supplement(tx).await
    }
}
