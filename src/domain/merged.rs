use crate::domain::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Gateway-specific extra fields. Opaque to the core.
pub type Supplement = BTreeMap<String, String>;

/// Read view of a transaction: the canonical record plus whatever the gateway's
/// enricher contributed. Built per request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub supplement: Supplement,
}

impl MergedTransaction {
    pub fn new(transaction: Transaction, supplement: Supplement) -> Self {
        Self {
            transaction,
            supplement,
        }
    }
}
