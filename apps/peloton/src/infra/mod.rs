//! Infrastructure layer - store error translation and state assembly.

pub mod state;
pub mod store_errors;
