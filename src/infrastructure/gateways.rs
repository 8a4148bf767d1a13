use crate::domain::ports::{Gateway, GatewayError, GatewayResult};
use crate::domain::transaction::{Amount, TransactionType};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Forced outcome for a simulated gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    Decline,
    Unavailable,
}

/// Stand-in settlement backend.
///
/// Hands back a fresh UUID for every accepted payment, optionally after an
/// artificial delay, or fails every call when a [`FailureMode`] is set.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    name: String,
    latency: Option<Duration>,
    failure: Option<FailureMode>,
}

impl SimulatedGateway {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latency: None,
            failure: None,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn with_failure(mut self, failure: FailureMode) -> Self {
        self.failure = Some(failure);
        self
    }

    async fn settle(&self, r#type: TransactionType, amount: Amount) -> GatewayResult {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        match self.failure {
            Some(FailureMode::Decline) => Err(GatewayError::Declined(format!(
                "{} of {} refused by {}",
                r#type, amount, self.name
            ))),
            Some(FailureMode::Unavailable) => Err(GatewayError::Unavailable(format!(
                "{} is not accepting requests",
                self.name
            ))),
            None => Ok(Uuid::new_v4().to_string()),
        }
    }
}

#[async_trait]
impl Gateway for SimulatedGateway {
    fn name(&self) -> &str {
        &self.name
    }

    async fn process_deposit(&self, amount: Amount) -> GatewayResult {
        self.settle(TransactionType::Deposit, amount).await
    }

    async fn process_withdrawal(&self, amount: Amount) -> GatewayResult {
        self.settle(TransactionType::Withdrawal, amount).await
    }
}
