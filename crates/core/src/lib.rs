//! Driver-independent building blocks for the roster data-access layer.
//!
//! No I/O happens here: parameters go in, SQL fragments and pagination
//! metadata come out.

pub mod error;
pub mod pagination;
pub mod param;
pub mod query;
pub mod types;
pub mod value;
