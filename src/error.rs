use miette::Diagnostic;
use thiserror::Error;

use crate::domain::ports::GatewayError;

/// Errors surfaced by the orchestration core.
///
/// Every component returns these unchanged to its caller; nothing in the core
/// retries or recovers. A transport maps them with [`PaymentError::kind`].
#[derive(Error, Diagnostic, Debug)]
pub enum PaymentError {
    #[error("unknown gateway: {0}")]
    #[diagnostic(code(payroute::unknown_gateway))]
    UnknownGateway(String),

    #[error("gateway {gateway} failed: {source}")]
    #[diagnostic(code(payroute::gateway_failure))]
    GatewayFailure {
        gateway: String,
        #[source]
        source: GatewayError,
    },

    #[error("invalid callback payload: {0}")]
    #[diagnostic(code(payroute::invalid_callback_payload))]
    InvalidCallbackPayload(String),

    #[error("transaction not found: {0}")]
    #[diagnostic(code(payroute::transaction_not_found))]
    TransactionNotFound(String),

    #[error("merge failed: {0}")]
    #[diagnostic(code(payroute::merge_error))]
    MergeError(String),

    #[error("validation error: {0}")]
    #[diagnostic(code(payroute::validation))]
    ValidationError(String),

    #[error("transaction already exists: {0}")]
    #[diagnostic(code(payroute::duplicate_transaction))]
    DuplicateTransaction(String),

    #[error("transaction {id} is already {current}, refusing transition to {requested}")]
    #[diagnostic(code(payroute::terminal_status))]
    TerminalStatus {
        id: String,
        current: String,
        requested: String,
    },

    #[error("deadline of {0}ms exceeded")]
    #[diagnostic(code(payroute::deadline_exceeded))]
    DeadlineExceeded(u64),

    #[error("configuration error: {0}")]
    #[diagnostic(code(payroute::config))]
    ConfigError(String),

    #[error("CSV error: {0}")]
    #[diagnostic(code(payroute::csv))]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(payroute::io))]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PaymentError>;

/// Which side of a request an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Client,
    Server,
}

/// Stable tag for each error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownGateway,
    GatewayFailure,
    InvalidCallbackPayload,
    TransactionNotFound,
    MergeError,
    Validation,
    DuplicateTransaction,
    TerminalStatus,
    DeadlineExceeded,
    Config,
    Csv,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownGateway => "unknown_gateway",
            ErrorKind::GatewayFailure => "gateway_failure",
            ErrorKind::InvalidCallbackPayload => "invalid_callback_payload",
            ErrorKind::TransactionNotFound => "transaction_not_found",
            ErrorKind::MergeError => "merge_error",
            ErrorKind::Validation => "validation",
            ErrorKind::DuplicateTransaction => "duplicate_transaction",
            ErrorKind::TerminalStatus => "terminal_status",
            ErrorKind::DeadlineExceeded => "deadline_exceeded",
            ErrorKind::Config => "config",
            ErrorKind::Csv => "csv",
            ErrorKind::Io => "io",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ErrorKind::UnknownGateway
            | ErrorKind::InvalidCallbackPayload
            | ErrorKind::TransactionNotFound
            | ErrorKind::Validation
            | ErrorKind::DuplicateTransaction
            | ErrorKind::TerminalStatus => ErrorClass::Client,
            ErrorKind::GatewayFailure
            | ErrorKind::MergeError
            | ErrorKind::DeadlineExceeded
            | ErrorKind::Config
            | ErrorKind::Csv
            | ErrorKind::Io => ErrorClass::Server,
        }
    }
}

impl PaymentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PaymentError::UnknownGateway(_) => ErrorKind::UnknownGateway,
            PaymentError::GatewayFailure { .. } => ErrorKind::GatewayFailure,
            PaymentError::InvalidCallbackPayload(_) => ErrorKind::InvalidCallbackPayload,
            PaymentError::TransactionNotFound(_) => ErrorKind::TransactionNotFound,
            PaymentError::MergeError(_) => ErrorKind::MergeError,
            PaymentError::ValidationError(_) => ErrorKind::Validation,
            PaymentError::DuplicateTransaction(_) => ErrorKind::DuplicateTransaction,
            PaymentError::TerminalStatus { .. } => ErrorKind::TerminalStatus,
            PaymentError::DeadlineExceeded(_) => ErrorKind::DeadlineExceeded,
            PaymentError::ConfigError(_) => ErrorKind::Config,
            PaymentError::CsvError(_) => ErrorKind::Csv,
            PaymentError::IoError(_) => ErrorKind::Io,
        }
    }

    /// Tag/message pair for the transport boundary.
    pub fn to_tag_message(&self) -> (&'static str, String) {
        (self.kind().as_str(), self.to_string())
    }
}
