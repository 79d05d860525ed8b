use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::jwt;
use crate::auth::store::SessionStore;
use crate::error::{ClientError, Result};
use crate::model::employee::Employee;
use crate::model::role::Role;

/// Bearer token and the profile returned with it at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub employee: Employee,
}

impl Session {
    pub fn role(&self) -> Role {
        self.employee.role
    }

    pub fn is_expired_at(&self, now: u64) -> bool {
        jwt::is_expired(&self.token, now)
    }
}

/// Shared handle on the current session, passed to the API client and to
/// every guard that needs to know who is logged in.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
    store: Option<SessionStore>,
}

fn now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

impl SessionContext {
    /// Nothing survives the process.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Restores a stored session; an already expired one is discarded.
    pub fn persistent(store: SessionStore) -> Result<Self> {
        let restored = store.load()?;
        let ctx = Self {
            current: Arc::new(RwLock::new(None)),
            store: Some(store),
        };

        match restored {
            Some(session) if session.is_expired_at(now()) => {
                info!("Stored session has expired, discarding");
                ctx.clear();
            }
            Some(session) => {
                *ctx.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
            }
            None => {}
        }

        Ok(ctx)
    }

    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn set(&self, session: Session) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&session)?;
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        Ok(())
    }

    /// Forgets the session in memory and on disk.
    pub fn clear(&self) {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                warn!(error = %e, path = %store.path().display(), "Failed to remove stored session");
            }
        }
    }

    pub fn require_login(&self) -> Result<Session> {
        let session = self.current().ok_or(ClientError::NotLoggedIn)?;
        if session.is_expired_at(now()) {
            self.clear();
            return Err(ClientError::Unauthorized);
        }
        Ok(session)
    }

    pub fn require_admin(&self) -> Result<Session> {
        let session = self.require_login()?;
        if session.role().is_admin() {
            Ok(session)
        } else {
            Err(ClientError::Forbidden("Admin privileges required".into()))
        }
    }
}
