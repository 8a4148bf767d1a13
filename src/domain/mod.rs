//! Domain layer: the canonical transaction record, the normalized callback shape,
//! the merged read view, and the ports the application layer depends on.

pub mod callback;
pub mod merged;
pub mod ports;
pub mod transaction;
