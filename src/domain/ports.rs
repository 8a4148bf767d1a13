use super::callback::{CallbackFormat, CallbackUpdate};
use super::merged::Supplement;
use super::transaction::{Amount, Transaction};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a gateway backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("declined: {0}")]
    Declined(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[error("returned an empty transaction identifier")]
    EmptyIdentifier,
}

/// A settlement backend able to take deposits and withdrawals.
///
/// Calls may block on network I/O or fail. On success the returned identifier
/// keys the new transaction.
#[async_trait]
pub trait Gateway: Send + Sync {
    fn name(&self) -> &str;
    async fn process_deposit(&self, amount: Amount) -> GatewayResult;
    async fn process_withdrawal(&self, amount: Amount) -> GatewayResult;
}

/// Gateway-assigned transaction identifier, or the gateway's failure.
pub type GatewayResult = std::result::Result<String, GatewayError>;

pub type GatewayRef = Arc<dyn Gateway>;

/// Mutation applied to a stored transaction. Returns whether anything changed.
pub type TransactionUpdate = Box<dyn FnOnce(&mut Transaction) -> Result<bool> + Send>;

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Publishes a new record. Fails with `DuplicateTransaction` if the id is taken.
    async fn insert(&self, tx: Transaction) -> Result<()>;
    async fn get(&self, tx_id: &str) -> Result<Option<Transaction>>;
    /// Applies `update` atomically. Readers see the record before or after, never between.
    async fn update(&self, tx_id: &str, update: TransactionUpdate) -> Result<Transaction>;
    async fn get_all(&self) -> Result<Vec<Transaction>>;
}

pub type TransactionStoreBox = Box<dyn TransactionStore>;

/// Decodes (and renders) one gateway wire format.
pub trait CallbackCodec: Send + Sync {
    fn format(&self) -> CallbackFormat;
    fn decode(&self, raw: &[u8]) -> Result<CallbackUpdate>;
    fn encode(&self, update: &CallbackUpdate) -> Result<Vec<u8>>;
}

pub type CodecRef = Arc<dyn CallbackCodec>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentError {
    #[error("enrichment source unreachable: {0}")]
    Unreachable(String),
    #[error("enrichment data malformed: {0}")]
    Malformed(String),
}

/// Source of gateway-specific supplementary data for the merged view.
///
/// Must not have side effects: the same transaction yields the same supplement
/// while the source itself is unchanged.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn supplement(&self, tx: &Transaction) -> EnrichmentResult;
}

pub type EnrichmentResult = std::result::Result<Supplement, EnrichmentError>;

pub type EnricherRef = Arc<dyn Enricher>;
