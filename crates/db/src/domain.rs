use std::sync::Arc;

use crate::handle::Database;
use crate::repositories::{RoleRepo, UserRepo};

/// Every repository, built over one shared database handle.
#[derive(Clone)]
pub struct Domain {
    pub user: UserRepo,
    pub role: RoleRepo,
}

impl Domain {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self {
            user: UserRepo::new(Arc::clone(&db)),
            role: RoleRepo::new(db),
        }
    }
}
