use thiserror::Error;

use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;
use crate::infra::store_errors::map_store_err;
use crate::store::StoreError;

/// Error returned at the action boundary (lobby, roster, game flow, session).
///
/// Validation, authorization, capacity and not-found errors carry a detail
/// that is safe to show to the player. Store and internal errors are reported
/// with a generic message; the detail is for logs.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Capacity exceeded: {detail}")]
    Capacity { code: ErrorCode, detail: String },
    #[error("Forbidden: {detail}")]
    Forbidden { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Store error: {detail}")]
    Store { code: ErrorCode, detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Capacity { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Store { code, .. } => *code,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::Internal { .. } => ErrorCode::Internal,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AppError::Validation { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Capacity { detail, .. }
            | AppError::Forbidden { detail, .. }
            | AppError::Conflict { detail, .. }
            | AppError::Store { detail, .. }
            | AppError::Config { detail }
            | AppError::Internal { detail } => detail,
        }
    }

    /// Short human title derived from the code, e.g. `GAME_FULL` -> `Game Full`.
    pub fn title(&self) -> String {
        Self::humanize_code(self.code().as_str())
    }

    /// Message for the player. Operational failures never leak their detail.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Capacity { detail, .. }
            | AppError::Forbidden { detail, .. }
            | AppError::Conflict { detail, .. } => detail.clone(),
            AppError::Store { .. } => {
                "The game server could not save your action. Please try again.".to_string()
            }
            AppError::Config { .. } | AppError::Internal { .. } => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn forbidden(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            code,
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(|c| c.to_lowercase()))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn validation_code(kind: &ValidationKind) -> ErrorCode {
    match kind {
        ValidationKind::InvalidJoinCode => ErrorCode::InvalidJoinCode,
        ValidationKind::InvalidColorSelection => ErrorCode::InvalidColorSelection,
        ValidationKind::DuplicateMove => ErrorCode::DuplicateMove,
        ValidationKind::HandNotEmpty => ErrorCode::HandNotEmpty,
        ValidationKind::NoHand => ErrorCode::NoHand,
        ValidationKind::CardIndexOutOfRange => ErrorCode::CardIndexOutOfRange,
        ValidationKind::IncompleteSelection => ErrorCode::IncompleteSelection,
        ValidationKind::PhaseMismatch => ErrorCode::PhaseMismatch,
        ValidationKind::RosterExists => ErrorCode::RosterExists,
        ValidationKind::NotEnoughPlayers => ErrorCode::NotEnoughPlayers,
        ValidationKind::Other(_) => ErrorCode::ValidationError,
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(kind, detail) => AppError::Validation {
                code: validation_code(&kind),
                detail,
            },
            DomainError::NotFound(kind, detail) => {
                let code = match kind {
                    NotFoundKind::Game => ErrorCode::GameNotFound,
                    NotFoundKind::Player => ErrorCode::PlayerNotFound,
                    NotFoundKind::Rider => ErrorCode::RiderNotFound,
                    NotFoundKind::Other(_) => ErrorCode::NotFound,
                };
                AppError::NotFound { code, detail }
            }
            DomainError::Conflict(ConflictKind::GameFull, detail) => AppError::Capacity {
                code: ErrorCode::GameFull,
                detail,
            },
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::JoinCodeConflict => ErrorCode::JoinCodeConflict,
                    ConflictKind::OptimisticLock => ErrorCode::OptimisticLock,
                    _ => ErrorCode::Conflict,
                };
                AppError::Conflict { code, detail }
            }
            DomainError::Forbidden(kind, detail) => {
                let code = match kind {
                    ForbiddenKind::InsufficientRole => ErrorCode::InsufficientRole,
                    ForbiddenKind::NotRiderOwner => ErrorCode::NotRiderOwner,
                };
                AppError::Forbidden { code, detail }
            }
            DomainError::Infra(kind, detail) => {
                let code = match kind {
                    InfraErrorKind::StoreUnavailable => ErrorCode::StoreUnavailable,
                    InfraErrorKind::DataCorruption => ErrorCode::DataCorruption,
                    InfraErrorKind::Other(_) => ErrorCode::StoreError,
                };
                AppError::Store { code, detail }
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::from(map_store_err(e))
    }
}

impl From<std::env::VarError> for AppError {
    fn from(e: std::env::VarError) -> Self {
        AppError::config(format!("env var error: {e}"))
    }
}
