use crate::domain::callback::CallbackUpdate;
use crate::domain::ports::CodecRef;
use crate::error::{PaymentError, Result};
use std::collections::HashMap;

/// Maps each gateway to the wire format its callbacks arrive in.
///
/// Supporting a new gateway means registering a codec here; the state machine
/// only ever sees [`CallbackUpdate`]s.
#[derive(Default, Clone)]
pub struct CallbackDecoder {
    codecs: HashMap<String, CodecRef>,
}

impl CallbackDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, gateway: impl Into<String>, codec: CodecRef) {
        self.codecs.insert(gateway.into(), codec);
    }

    pub fn with(mut self, gateway: impl Into<String>, codec: CodecRef) -> Self {
        self.register(gateway, codec);
        self
    }

    pub fn codec(&self, gateway: &str) -> Result<&CodecRef> {
        self.codecs
            .get(gateway)
            .ok_or_else(|| PaymentError::UnknownGateway(gateway.to_string()))
    }

    /// Decodes `raw` using the codec registered for `gateway`.
    ///
    /// A `content_type` hint, when given, must agree with that codec's format.
    pub fn decode(
        &self,
        gateway: &str,
        raw: &[u8],
        content_type: Option<&str>,
    ) -> Result<CallbackUpdate> {
        let codec = self.codec(gateway)?;

        if let Some(content_type) = content_type
            && !codec.format().accepts(content_type)
        {
            return Err(PaymentError::InvalidCallbackPayload(format!(
                "{} sends {} callbacks, got content type {}",
                gateway,
                codec.format(),
                content_type
            )));
        }

        codec.decode(raw)
    }
}
