//! Application layer containing the orchestration logic.
//!
//! [`router::GatewayRouter`] picks and calls a gateway by name,
//! [`payment_service::PaymentService`] owns the transaction store and the status
//! state machine, [`callback_decoder::CallbackDecoder`] turns gateway callbacks
//! into normalized updates, and [`merger::Merger`] builds enriched read views.

pub mod callback_decoder;
pub mod merger;
pub mod payment_service;
pub mod router;
