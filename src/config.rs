use crate::domain::callback::CallbackFormat;
use crate::domain::transaction::{StatusPolicy, TransactionStatus, TransitionMode};
use crate::error::{PaymentError, Result};
use crate::infrastructure::gateways::FailureMode;
use crate::infrastructure::in_memory::DEFAULT_SHARDS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Supplementary data source used when merging a gateway's transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentKind {
    #[default]
    Placeholder,
    WireEcho,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub name: String,
    pub callback_format: CallbackFormat,
    #[serde(default)]
    pub latency_ms: Option<u64>,
    #[serde(default)]
    pub failure: Option<FailureMode>,
    #[serde(default)]
    pub enrichment: EnrichmentKind,
    #[serde(default)]
    pub enrichment_latency_ms: Option<u64>,
}

impl GatewayConfig {
    pub fn new(name: impl Into<String>, callback_format: CallbackFormat) -> Self {
        Self {
            name: name.into(),
            callback_format,
            latency_ms: None,
            failure: None,
            enrichment: EnrichmentKind::default(),
            enrichment_latency_ms: None,
        }
    }
}

/// Runtime configuration. Every field has a default, so an empty JSON object
/// is a valid configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrouteConfig {
    pub gateways: Vec<GatewayConfig>,
    pub gateway_timeout_ms: Option<u64>,
    pub enrichment_timeout_ms: Option<u64>,
    pub store_shards: usize,
    pub status_policy: TransitionMode,
    pub terminal_statuses: Vec<String>,
}

impl Default for PayrouteConfig {
    fn default() -> Self {
        Self {
            gateways: vec![
                GatewayConfig::new("gateway_a", CallbackFormat::Json),
                GatewayConfig::new("gateway_b", CallbackFormat::Xml),
            ],
            gateway_timeout_ms: None,
            enrichment_timeout_ms: None,
            store_shards: DEFAULT_SHARDS,
            status_policy: TransitionMode::default(),
            terminal_statuses: vec!["completed".to_string(), "failed".to_string()],
        }
    }
}

impl PayrouteConfig {
    /// Reads a JSON configuration file and validates it.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data).map_err(|e| {
            PaymentError::ConfigError(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gateways.is_empty() {
            return Err(PaymentError::ConfigError(
                "at least one gateway must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for gateway in &self.gateways {
            if gateway.name.trim().is_empty() {
                return Err(PaymentError::ConfigError(
                    "gateway names must not be empty".to_string(),
                ));
            }
            if !seen.insert(gateway.name.as_str()) {
                return Err(PaymentError::ConfigError(format!(
                    "gateway {} is configured twice",
                    gateway.name
                )));
            }
        }

        if self.store_shards == 0 {
            return Err(PaymentError::ConfigError(
                "store_shards must be at least 1".to_string(),
            ));
        }

        self.status_rules().map(|_| ())
    }

    pub fn status_rules(&self) -> Result<StatusPolicy> {
        let terminal = self
            .terminal_statuses
            .iter()
            .map(|raw| {
                TransactionStatus::normalized(raw).ok_or_else(|| {
                    PaymentError::ConfigError("terminal statuses must not be blank".to_string())
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(StatusPolicy::new(self.status_policy, terminal))
    }

    pub fn gateway_timeout(&self) -> Option<Duration> {
        self.gateway_timeout_ms.map(Duration::from_millis)
    }

    pub fn enrichment_timeout(&self) -> Option<Duration> {
        self.enrichment_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = PayrouteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gateways[0].callback_format, CallbackFormat::Json);
        assert_eq!(config.gateways[1].callback_format, CallbackFormat::Xml);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: PayrouteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PayrouteConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "gateways": [
                    {{"name": "gateway_c", "callback_format": "xml", "latency_ms": 5, "enrichment": "wire_echo"}}
                ],
                "gateway_timeout_ms": 250,
                "status_policy": "last_write_wins"
            }}"#
        )
        .unwrap();

        let config = PayrouteConfig::load(file.path()).unwrap();
        assert_eq!(config.gateways.len(), 1);
        assert_eq!(config.gateways[0].enrichment, EnrichmentKind::WireEcho);
        assert_eq!(config.gateway_timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.status_policy, TransitionMode::LastWriteWins);
    }

    #[test]
    fn test_duplicate_gateway_names_rejected() {
        let mut config = PayrouteConfig::default();
        config
            .gateways
            .push(GatewayConfig::new("gateway_a", CallbackFormat::Xml));
        assert!(matches!(
            config.validate(),
            Err(PaymentError::ConfigError(_))
        ));
    }

    #[test]
    fn test_blank_terminal_status_rejected() {
        let config = PayrouteConfig {
            terminal_statuses: vec!["completed".to_string(), " ".to_string()],
            ..PayrouteConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
