use crate::domain::ports::{TransactionStore, TransactionUpdate};
use crate::domain::transaction::Transaction;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::{Entry, RandomState};
use std::hash::BuildHasher;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const DEFAULT_SHARDS: usize = 16;

type Shard = RwLock<HashMap<String, Transaction>>;

/// A thread-safe in-memory store for transactions.
///
/// Records are spread over independently locked shards keyed by a hash of the
/// transaction id, so operations on different ids rarely contend. Records are
/// cloned out on read and replaced whole on update.
#[derive(Clone)]
pub struct InMemoryTransactionStore {
    shards: Arc<[Shard]>,
    hasher: RandomState,
}

impl Default for InMemoryTransactionStore {
    fn default() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }
}

impl InMemoryTransactionStore {
    /// Creates a new, empty in-memory transaction store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with `shards` buckets (at least one).
    pub fn with_shards(shards: usize) -> Self {
        let shards = (0..shards.max(1))
            .map(|_| RwLock::new(HashMap::new()))
            .collect::<Vec<_>>();
        Self {
            shards: shards.into(),
            hasher: RandomState::new(),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, tx_id: &str) -> &Shard {
        let index = (self.hasher.hash_one(tx_id) as usize) % self.shards.len();
        &self.shards[index]
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, tx: Transaction) -> Result<()> {
        let mut shard = self.shard(&tx.id).write().await;
        match shard.entry(tx.id.clone()) {
            Entry::Occupied(_) => Err(PaymentError::DuplicateTransaction(tx.id)),
            Entry::Vacant(slot) => {
                slot.insert(tx);
                Ok(())
            }
        }
    }

    async fn get(&self, tx_id: &str) -> Result<Option<Transaction>> {
        let shard = self.shard(tx_id).read().await;
        Ok(shard.get(tx_id).cloned())
    }

    async fn update(&self, tx_id: &str, update: TransactionUpdate) -> Result<Transaction> {
        let mut shard = self.shard(tx_id).write().await;
        let stored = shard
            .get_mut(tx_id)
            .ok_or_else(|| PaymentError::TransactionNotFound(tx_id.to_string()))?;

        // Work on a copy so a rejected update leaves the record untouched.
        let mut next = stored.clone();
        update(&mut next)?;
        *stored = next.clone();
        Ok(next)
    }

    async fn get_all(&self) -> Result<Vec<Transaction>> {
        let mut all = Vec::new();
        for shard in self.shards.iter() {
            all.extend(shard.read().await.values().cloned());
        }
        Ok(all)
    }
}
