use crate::error::{PaymentError, Result};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A strictly positive monetary amount.
///
/// Amounts are validated when they are built, so everything downstream of the
/// transport can assume `amount > 0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PaymentError::ValidationError(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a transaction.
///
/// Open-ended: gateways report whatever status they like and the
/// core stores it as given (after normalization). Only `pending` is assigned by
/// the core itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionStatus(String);

impl TransactionStatus {
    pub const PENDING: &'static str = "pending";

    pub fn pending() -> Self {
        Self(Self::PENDING.to_string())
    }

    /// Trims and lowercases a reported status. Returns `None` for blank input.
    pub fn normalized(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_ascii_lowercase()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How callbacks may move a transaction between statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    /// Any callback overwrites the current status.
    LastWriteWins,
    /// Once a terminal status is reached only the same status may be re-reported.
    #[default]
    TerminalIsFinal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPolicy {
    mode: TransitionMode,
    terminal: Vec<TransactionStatus>,
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self::new(
            TransitionMode::default(),
            vec![
                TransactionStatus("completed".to_string()),
                TransactionStatus("failed".to_string()),
            ],
        )
    }
}

impl StatusPolicy {
    pub fn new(mode: TransitionMode, terminal: Vec<TransactionStatus>) -> Self {
        Self { mode, terminal }
    }

    pub fn last_write_wins() -> Self {
        Self {
            mode: TransitionMode::LastWriteWins,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> TransitionMode {
        self.mode
    }

    pub fn is_terminal(&self, status: &TransactionStatus) -> bool {
        self.terminal.contains(status)
    }
}

/// The canonical record of one payment operation.
///
/// Everything but `status` and `updated_at` is fixed at construction.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: String,
    pub amount: Amount,
    pub r#type: TransactionType,
    pub gateway: String,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a fully initialized `pending` record.
    pub fn new(id: String, amount: Amount, r#type: TransactionType, gateway: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            amount,
            r#type,
            gateway,
            status: TransactionStatus::pending(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the record to `status` under `policy`.
    ///
    /// Returns `Ok(false)` when a terminal status is re-reported (nothing changes).
    /// On error the record is left untouched.
    pub fn apply_status(
        &mut self,
        status: TransactionStatus,
        policy: &StatusPolicy,
    ) -> Result<bool> {
        if policy.mode() == TransitionMode::TerminalIsFinal && policy.is_terminal(&self.status) {
            if self.status == status {
                return Ok(false);
            }
            return Err(PaymentError::TerminalStatus {
                id: self.id.clone(),
                current: self.status.to_string(),
                requested: status.to_string(),
            });
        }

        self.status = status;
        self.touch();
        Ok(true)
    }

    // updated_at must advance even when the clock has not.
    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}
