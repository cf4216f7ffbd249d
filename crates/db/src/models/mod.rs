//! Entity rows and the parameter types that select, create and update them.

pub mod role;
pub mod user;
