use crate::domain::transaction::TransactionStatus;
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A gateway callback reduced to what the state machine needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackUpdate {
    pub transaction_id: String,
    pub status: TransactionStatus,
}

impl CallbackUpdate {
    /// Validates raw decoded fields. Blank ids or statuses are rejected.
    ///
    /// Identifiers are opaque and kept exactly as received, so they match the
    /// key the gateway handed out at payment time.
    pub fn new(transaction_id: &str, status: &str) -> Result<Self> {
        if transaction_id.trim().is_empty() {
            return Err(PaymentError::InvalidCallbackPayload(
                "missing transaction_id".to_string(),
            ));
        }
        let status = TransactionStatus::normalized(status).ok_or_else(|| {
            PaymentError::InvalidCallbackPayload("missing status".to_string())
        })?;

        Ok(Self {
            transaction_id: transaction_id.to_string(),
            status,
        })
    }
}

/// Wire encoding a gateway uses for its callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackFormat {
    /// Structured text (`{"transaction_id": .., "status": ..}`).
    Json,
    /// Markup (`<callback><transaction_id/><status/></callback>`).
    Xml,
}

impl CallbackFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackFormat::Json => "json",
            CallbackFormat::Xml => "xml",
        }
    }

    pub fn media_types(&self) -> &'static [&'static str] {
        match self {
            CallbackFormat::Json => &["application/json", "text/json"],
            CallbackFormat::Xml => &["application/xml", "text/xml"],
        }
    }

    /// Media type a gateway sends its callbacks with.
    pub fn content_type(&self) -> &'static str {
        self.media_types()[0]
    }

    /// Whether a `Content-Type` value (parameters allowed) is compatible with
    /// this format.
    pub fn accepts(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        let suffix = match self {
            CallbackFormat::Json => "+json",
            CallbackFormat::Xml => "+xml",
        };
        self.media_types().contains(&essence.as_str()) || essence.ends_with(suffix)
    }
}

impl fmt::Display for CallbackFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
