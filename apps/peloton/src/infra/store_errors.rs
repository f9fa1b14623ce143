//! StoreError -> DomainError translation.
//!
//! Repositories convert `StoreError` into `DomainError` here, and higher
//! layers map `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::store::{StoreError, Table};

/// Map a unique constraint name to the domain error it stands for.
fn map_constraint(constraint: &str) -> Option<DomainError> {
    match constraint {
        "moves_rider_round_key" => Some(DomainError::validation(
            ValidationKind::DuplicateMove,
            "A move for this rider is already recorded for this round",
        )),
        "games_join_code_key" => Some(DomainError::conflict(
            ConflictKind::JoinCodeConflict,
            "Join code already exists",
        )),
        "players_game_role_key" => Some(DomainError::conflict(
            ConflictKind::GameFull,
            "Game already has two players",
        )),
        "riders_game_color_type_key" => Some(DomainError::validation(
            ValidationKind::RosterExists,
            "Teams have already been selected for this game",
        )),
        _ => None,
    }
}

fn not_found_kind(table: Table) -> NotFoundKind {
    match table {
        Table::Games => NotFoundKind::Game,
        Table::Players => NotFoundKind::Player,
        Table::Riders => NotFoundKind::Rider,
        Table::Moves => NotFoundKind::Other("Move".into()),
    }
}

/// Translate a `StoreError` into a `DomainError`.
pub fn map_store_err(e: StoreError) -> DomainError {
    match e {
        StoreError::Unavailable(detail) => {
            warn!(detail = %detail, "Record store unavailable");
            DomainError::infra(InfraErrorKind::StoreUnavailable, "Record store unavailable")
        }
        StoreError::RecordNotFound { table, id } => {
            let kind = not_found_kind(table);
            DomainError::not_found(kind, format!("{table} record {id} not found"))
        }
        StoreError::UniqueViolation { table, constraint } => {
            warn!(table = %table, constraint, "Unique constraint violation");
            map_constraint(constraint).unwrap_or_else(|| {
                DomainError::conflict(
                    ConflictKind::Other("Unique".into()),
                    format!("Unique constraint violation on {table}"),
                )
            })
        }
        StoreError::VersionMismatch {
            table,
            id,
            expected,
            actual,
        } => {
            warn!(table = %table, %id, expected, actual, "Optimistic lock conflict detected");
            DomainError::conflict(
                ConflictKind::OptimisticLock,
                format!(
                    "Resource was modified concurrently (expected version {expected}, actual version {actual}). Please refresh and retry."
                ),
            )
        }
        StoreError::PatchMismatch { table } => {
            error!(table = %table, "Patch applied to wrong record kind");
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Patch does not apply to {table}"),
            )
        }
        StoreError::Rejected(detail) => {
            error!(detail = %detail, "Store rejected write");
            DomainError::infra(InfraErrorKind::Other("Rejected".into()), detail)
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        map_store_err(e)
    }
}
