use tracing::info;

use crate::error::{AppError, AppResult};
use crate::storage::{Store, SESSION_USER_KEY};

use super::repo_types::PublicUser;

/// The signed-in user of this client, stored under `user`. Holds public
/// fields only.
#[derive(Clone)]
pub struct Session {
    store: Store,
}

impl Session {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn current(&self) -> AppResult<Option<PublicUser>> {
        self.store.load(SESSION_USER_KEY)
    }

    pub fn require(&self) -> AppResult<PublicUser> {
        self.current()?.ok_or(AppError::NotAuthenticated)
    }

    pub fn sign_in(&self, user: &PublicUser) -> AppResult<()> {
        self.store.save(SESSION_USER_KEY, user)?;
        info!(user_id = user.id, "session started");
        Ok(())
    }

    pub fn logout(&self) -> AppResult<()> {
        self.store.remove(SESSION_USER_KEY)?;
        info!("session cleared");
        Ok(())
    }
}
