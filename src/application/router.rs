use crate::domain::ports::GatewayRef;
use crate::domain::transaction::{Amount, TransactionType};
use crate::error::{PaymentError, Result};
use std::collections::HashMap;
use tracing::debug;

/// Named gateway instances available for routing.
#[derive(Default, Clone)]
pub struct GatewayRegistry {
    gateways: HashMap<String, GatewayRef>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `gateway` under its own name, replacing any previous entry.
    pub fn register(&mut self, gateway: GatewayRef) {
        self.gateways.insert(gateway.name().to_string(), gateway);
    }

    pub fn with(mut self, gateway: GatewayRef) -> Self {
        self.register(gateway);
        self
    }

    pub fn get(&self, name: &str) -> Option<&GatewayRef> {
        self.gateways.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.gateways.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Resolves a gateway by name and dispatches a deposit or withdrawal to it.
///
/// Gateway failures are passed through as they are; the router never retries.
pub struct GatewayRouter {
    registry: GatewayRegistry,
}

impl GatewayRouter {
    pub fn new(registry: GatewayRegistry) -> Self {
        Self { registry }
    }

    pub fn gateways(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub async fn route_payment(
        &self,
        amount: Amount,
        kind: TransactionType,
        gateway: &str,
    ) -> Result<String> {
        let target = self
            .registry
            .get(gateway)
            .ok_or_else(|| PaymentError::UnknownGateway(gateway.to_string()))?;

        debug!(gateway, %kind, %amount, "dispatching to gateway");
        let outcome = match kind {
            TransactionType::Deposit => target.process_deposit(amount).await,
            TransactionType::Withdrawal => target.process_withdrawal(amount).await,
        };

        outcome.map_err(|source| PaymentError::GatewayFailure {
            gateway: gateway.to_string(),
            source,
        })
    }
}
