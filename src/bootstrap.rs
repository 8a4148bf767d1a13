//! Wires the core together from a [`PayrouteConfig`].

use crate::application::callback_decoder::CallbackDecoder;
use crate::application::merger::Merger;
use crate::application::payment_service::PaymentService;
use crate::application::router::{GatewayRegistry, GatewayRouter};
use crate::config::{EnrichmentKind, PayrouteConfig};
use crate::domain::ports::EnricherRef;
use crate::error::Result;
use crate::infrastructure::enrichers::{DelayedEnricher, PlaceholderEnricher, WireEchoEnricher};
use crate::infrastructure::gateways::SimulatedGateway;
use crate::infrastructure::in_memory::InMemoryTransactionStore;
use crate::interfaces::callback::codec_for;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// The assembled core: payment service plus merger for read views.
pub struct Payroute {
    pub payments: PaymentService,
    pub merger: Merger,
}

pub fn build(config: &PayrouteConfig) -> Result<Payroute> {
    config.validate()?;

    let mut registry = GatewayRegistry::new();
    let mut decoder = CallbackDecoder::new();
    let mut merger = Merger::default();

    for gateway in &config.gateways {
        let mut backend = SimulatedGateway::new(gateway.name.clone());
        if let Some(ms) = gateway.latency_ms {
            backend = backend.with_latency(Duration::from_millis(ms));
        }
        if let Some(failure) = gateway.failure {
            backend = backend.with_failure(failure);
        }
        registry.register(Arc::new(backend));

        let codec = codec_for(gateway.callback_format);
        decoder.register(gateway.name.clone(), codec.clone());

        let mut enricher: Option<EnricherRef> = match gateway.enrichment {
            EnrichmentKind::Placeholder => None,
            EnrichmentKind::WireEcho => Some(Arc::new(WireEchoEnricher::new(codec))),
        };
        if let Some(ms) = gateway.enrichment_latency_ms {
            let inner: EnricherRef = match enricher {
                Some(inner) => inner,
                None => Arc::new(PlaceholderEnricher::default()),
            };
            enricher = Some(Arc::new(DelayedEnricher::new(inner, Duration::from_millis(ms))));
        }
        if let Some(enricher) = enricher {
            merger = merger.with_enricher(gateway.name.clone(), enricher);
        }
    }

    if let Some(timeout) = config.enrichment_timeout() {
        merger = merger.with_timeout(timeout);
    }

    let store = InMemoryTransactionStore::with_shards(config.store_shards);
    let mut payments = PaymentService::new(Box::new(store), GatewayRouter::new(registry), decoder)
        .with_status_policy(config.status_rules()?);
    if let Some(timeout) = config.gateway_timeout() {
        payments = payments.with_gateway_timeout(timeout);
    }

    info!(gateways = ?payments.router().gateways(), "payment core ready");
    Ok(Payroute { payments, merger })
}
