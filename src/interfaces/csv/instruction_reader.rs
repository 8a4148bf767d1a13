use crate::domain::transaction::{Amount, TransactionType};
use crate::error::{PaymentError, Result};
use serde::Deserialize;
use std::io::Read;

/// One row of the driver's input: a payment to submit and, optionally, the
/// status the gateway should report back for it.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct PaymentInstruction {
    pub r#type: TransactionType,
    pub gateway: String,
    pub amount: Amount,
    #[serde(default)]
    pub outcome: Option<String>,
}

impl PaymentInstruction {
    /// The callback status to play back, if any.
    pub fn outcome(&self) -> Option<&str> {
        self.outcome
            .as_deref()
            .map(str::trim)
            .filter(|outcome| !outcome.is_empty())
    }
}

/// Reads payment instructions from a CSV source.
///
/// Expects a `type, gateway, amount, outcome` header. Whitespace is trimmed and the
/// trailing `outcome` column may be left out.
pub struct InstructionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InstructionReader<R> {
    /// Creates a new `InstructionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes instructions.
    pub fn instructions(self) -> impl Iterator<Item = Result<PaymentInstruction>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PaymentError::from))
    }
}
