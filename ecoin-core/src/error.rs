use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid bet amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid side: {0}")]
    InvalidSide(String),

    #[error("Account not found: {id}")]
    AccountNotFound { id: String },

    #[error("Insufficient balance: need {need}, have {available}")]
    InsufficientBalance { need: i64, available: i64 },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    pub fn invalid_amount(token: impl Into<String>) -> Self {
        Self::InvalidAmount(token.into())
    }

    pub fn invalid_side(token: impl Into<String>) -> Self {
        Self::InvalidSide(token.into())
    }

    pub fn account_not_found(id: impl Into<String>) -> Self {
        Self::AccountNotFound { id: id.into() }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Storage failures are infrastructure problems and get logged at the
    /// command boundary; everything else is a per-request user reply.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_))
    }
}
