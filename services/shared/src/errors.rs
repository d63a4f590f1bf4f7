/// Shared error types for lobby surfaces
///
/// Design:
/// - Standardized error codes so every surface reports failures the same way
/// - Categorized by error domain (Validation, Conflict, Internal)
/// - Serializable so the presentation layer can render them directly
///
/// Usage:
/// - Engine errors convert into ServiceError at the surface boundary
/// - Error codes follow pattern: <CATEGORY>_<SPECIFIC>_<DETAIL>
/// - Context field carries the numbers a player needs to correct the input
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error categories that map to status codes and logging severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Player supplied an invalid stake or bet (400)
    Validation,

    /// Request conflicts with the state of the round (409)
    Conflict,

    /// Ledger or other unexpected failures (500)
    Internal,
}

impl ErrorCategory {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::Validation => 400,
            ErrorCategory::Conflict => 409,
            ErrorCategory::Internal => 500,
        }
    }

    pub fn log_level(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "warn",
            ErrorCategory::Conflict => "warn",
            ErrorCategory::Internal => "error",
        }
    }
}

/// Standard error codes used across all surfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    // Validation errors
    pub const VALIDATION_INVALID_WAGER: ErrorCode = ErrorCode("VALIDATION_INVALID_WAGER");
    pub const VALIDATION_INSUFFICIENT_BALANCE: ErrorCode =
        ErrorCode("VALIDATION_INSUFFICIENT_BALANCE");
    pub const VALIDATION_INVALID_BET: ErrorCode = ErrorCode("VALIDATION_INVALID_BET");

    // Conflict errors
    pub const CONFLICT_ROUND_IN_PROGRESS: ErrorCode = ErrorCode("CONFLICT_ROUND_IN_PROGRESS");
    pub const CONFLICT_NO_PENDING_ROUND: ErrorCode = ErrorCode("CONFLICT_NO_PENDING_ROUND");
    pub const CONFLICT_ROUND_CANCELLED: ErrorCode = ErrorCode("CONFLICT_ROUND_CANCELLED");
    pub const CONFLICT_SURFACE_CLOSED: ErrorCode = ErrorCode("CONFLICT_SURFACE_CLOSED");

    // Internal errors
    pub const INTERNAL_LEDGER: ErrorCode = ErrorCode("INTERNAL_LEDGER");
    pub const INTERNAL_UNEXPECTED: ErrorCode = ErrorCode("INTERNAL_UNEXPECTED");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Standardized error structure returned to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    /// Error category (determines status code and log level)
    pub category: ErrorCategory,

    /// Structured error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context (bounds, balances, round ids)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ServiceError {
    pub fn new(category: ErrorCategory, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category,
            code: code.as_str().to_string(),
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    // Validation error constructors
    pub fn invalid_wager(amount: u64, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_INVALID_WAGER,
            format!("Invalid wager: {}", amount),
        )
        .with_context(reason)
    }

    pub fn insufficient_balance(required: u64, available: u64) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_INSUFFICIENT_BALANCE,
            "Insufficient balance",
        )
        .with_context(format!("required: {}, available: {}", required, available))
    }

    pub fn invalid_bet(bet: impl fmt::Display, surface: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_INVALID_BET,
            format!("Bet not offered on this table: {}", bet),
        )
        .with_context(format!("surface: {}", surface))
    }

    // Conflict error constructors
    pub fn round_in_progress(state: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Conflict,
            ErrorCode::CONFLICT_ROUND_IN_PROGRESS,
            "A round is already in progress",
        )
        .with_context(format!("state: {}", state))
    }

    pub fn no_pending_round(state: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Conflict,
            ErrorCode::CONFLICT_NO_PENDING_ROUND,
            "No round is waiting for this step",
        )
        .with_context(format!("state: {}", state))
    }

    pub fn round_cancelled(round_id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Conflict,
            ErrorCode::CONFLICT_ROUND_CANCELLED,
            format!("Round cancelled before reveal: {}", round_id),
        )
    }

    pub fn surface_closed() -> Self {
        Self::new(
            ErrorCategory::Conflict,
            ErrorCode::CONFLICT_SURFACE_CLOSED,
            "Surface has been closed",
        )
    }

    // Internal error constructors
    pub fn ledger_error(error: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Internal,
            ErrorCode::INTERNAL_LEDGER,
            "Ledger error",
        )
        .with_context(error.to_string())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Internal,
            ErrorCode::INTERNAL_UNEXPECTED,
            message,
        )
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "[{}] {}: {}", self.code, self.message, context)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ServiceError {}

pub type Result<T> = std::result::Result<T, ServiceError>;
