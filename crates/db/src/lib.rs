//! Leader/follower data access for users and roles.

pub mod config;
pub mod domain;
pub mod error;
pub mod handle;
pub mod models;
pub mod mysql;
pub mod repositories;
pub mod row;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{ConfigError, DbConfig};
pub use domain::Domain;
pub use error::{ErrorKind, StoreError};
pub use handle::{Connection, Database, ExecResult, SqlError, Transaction};
pub use mysql::{create_pool, MySqlDatabase};
