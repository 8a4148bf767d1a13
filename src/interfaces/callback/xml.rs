use crate::domain::callback::{CallbackFormat, CallbackUpdate};
use crate::domain::ports::CallbackCodec;
use crate::error::{PaymentError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::{Deserialize, Serialize};

const ROOT: &[u8] = b"callback";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "callback")]
struct XmlCallback {
    transaction_id: String,
    status: String,
}

/// Markup callbacks:
///
/// ```xml
/// <callback>
///     <transaction_id>...</transaction_id>
///     <status>...</status>
/// </callback>
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlCallbackCodec;

impl XmlCallbackCodec {
    // quick-xml's deserializer ignores the root name, so check it separately.
    fn check_root(body: &str) -> Result<()> {
        let mut reader = Reader::from_str(body);
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.name().as_ref() == ROOT => return Ok(()),
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    return Err(PaymentError::InvalidCallbackPayload(format!(
                        "unexpected root element <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                Ok(Event::Eof) => {
                    return Err(PaymentError::InvalidCallbackPayload(
                        "empty XML document".to_string(),
                    ));
                }
                Ok(_) => continue,
                Err(e) => {
                    return Err(PaymentError::InvalidCallbackPayload(format!(
                        "malformed XML: {}",
                        e
                    )));
                }
            }
        }
    }
}

impl CallbackCodec for XmlCallbackCodec {
    fn format(&self) -> CallbackFormat {
        CallbackFormat::Xml
    }

    fn decode(&self, raw: &[u8]) -> Result<CallbackUpdate> {
        let body = std::str::from_utf8(raw).map_err(|e| {
            PaymentError::InvalidCallbackPayload(format!("callback is not UTF-8: {}", e))
        })?;
        Self::check_root(body)?;

        let callback: XmlCallback = quick_xml::de::from_str(body)
            .map_err(|e| PaymentError::InvalidCallbackPayload(format!("malformed XML: {}", e)))?;
        CallbackUpdate::new(&callback.transaction_id, callback.status.as_str())
    }

    fn encode(&self, update: &CallbackUpdate) -> Result<Vec<u8>> {
        let callback = XmlCallback {
            transaction_id: update.transaction_id.clone(),
            status: update.status.to_string(),
        };
        quick_xml::se::to_string(&callback)
            .map(String::into_bytes)
            .map_err(|e| PaymentError::InvalidCallbackPayload(format!("cannot encode XML: {}", e)))
    }
}
