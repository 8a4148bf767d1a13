//! Adapters behind the domain ports: storage, gateway backends and enrichment sources.

pub mod enrichers;
pub mod gateways;
pub mod in_memory;
