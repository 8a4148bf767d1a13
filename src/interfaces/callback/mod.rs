//! Gateway callback wire formats.

pub mod json;
pub mod xml;

use crate::domain::callback::CallbackFormat;
use crate::domain::ports::CodecRef;
use std::sync::Arc;

/// Returns the codec for a wire format.
pub fn codec_for(format: CallbackFormat) -> CodecRef {
    match format {
        CallbackFormat::Json => Arc::new(json::JsonCallbackCodec),
        CallbackFormat::Xml => Arc::new(xml::XmlCallbackCodec),
    }
}
