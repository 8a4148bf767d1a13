use crate::domain::callback::{CallbackFormat, CallbackUpdate};
use crate::domain::ports::CallbackCodec;
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct JsonCallback {
    transaction_id: String,
    status: String,
}

/// Structured-text callbacks: `{"transaction_id": "...", "status": "..."}`.
///
/// Unknown fields are ignored so gateways can send extra metadata.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCallbackCodec;

impl CallbackCodec for JsonCallbackCodec {
    fn format(&self) -> CallbackFormat {
        CallbackFormat::Json
    }

    fn decode(&self, raw: &[u8]) -> Result<CallbackUpdate> {
        let callback: JsonCallback = serde_json::from_slice(raw)
            .map_err(|e| PaymentError::InvalidCallbackPayload(format!("malformed JSON: {}", e)))?;
        CallbackUpdate::new(&callback.transaction_id, callback.status.as_str())
    }

    fn encode(&self, update: &CallbackUpdate) -> Result<Vec<u8>> {
        let callback = JsonCallback {
            transaction_id: update.transaction_id.clone(),
            status: update.status.to_string(),
        };
        serde_json::to_vec(&callback)
            .map_err(|e| PaymentError::InvalidCallbackPayload(format!("cannot encode JSON: {}", e)))
    }
}
