//! Wire-level adapters: gateway callback codecs, and the CSV/JSON formats used by
//! the command-line driver.

pub mod callback;
pub mod csv;
pub mod json;
