//! Typed record access over the generic record store.
//!
//! Functions here are generic over `RecordStore` and return `DomainError`,
//! with store failures translated by `infra::store_errors`.

pub mod games;
pub mod moves;
pub mod players;
pub mod riders;

use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::store::{Record, Table};

/// Narrow a record to the expected kind, treating a mismatch as corruption.
fn narrow<T>(record: Record, table: Table, f: fn(Record) -> Option<T>) -> Result<T, DomainError> {
    let actual = record.table();
    f(record).ok_or_else(|| {
        DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("Expected a {table} record, got {actual}"),
        )
    })
}

fn narrow_all<T>(
    records: Vec<Record>,
    table: Table,
    f: fn(Record) -> Option<T>,
) -> Result<Vec<T>, DomainError> {
    records.into_iter().map(|r| narrow(r, table, f)).collect()
}
