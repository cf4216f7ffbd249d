//! Repository layer.
//!
//! Each entity has a repository holding a shared [`Database`](crate::Database)
//! handle. Writes go to the leader, reads to the follower.

mod crud;

pub mod role_repo;
pub mod user_repo;

pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
