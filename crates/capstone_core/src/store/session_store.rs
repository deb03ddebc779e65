//! Session store: who is signed in.
//!
//! # Invariants
//! - `login` never fails and always overwrites the previous identity.
//! - A saved logged-out session removes the persisted entry.

use crate::model::session::{Role, SessionIdentity};
use crate::persist::{read_payload, write_payload, PayloadKind, PersistResult};
use crate::repo::kv_repo::KvRepository;
use log::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStore {
    identity: Option<SessionIdentity>,
    dirty: bool,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the identity persisted under `key`, if any.
    pub fn load<R: KvRepository + ?Sized>(repo: &R, key: &str) -> PersistResult<Self> {
        let identity: Option<SessionIdentity> = read_payload(repo, key, PayloadKind::Session)?;
        info!(
            "event=session_load module=store status=ok authenticated={}",
            identity.is_some()
        );
        Ok(Self {
            identity,
            dirty: false,
        })
    }

    /// Persists the identity, or clears the entry when logged out.
    pub fn save<R: KvRepository + ?Sized>(&mut self, repo: &R, key: &str) -> PersistResult<()> {
        if !self.dirty {
            return Ok(());
        }
        match &self.identity {
            Some(identity) => write_payload(repo, key, identity)?,
            None => {
                repo.remove_value(key)?;
            }
        }
        self.dirty = false;
        Ok(())
    }

    /// Sets the identity without any credential check.
    pub fn login(&mut self, email: impl Into<String>, role: Role) {
        self.identity = Some(SessionIdentity::new(email, role));
        self.dirty = true;
    }

    pub fn logout(&mut self) {
        self.identity = None;
        self.dirty = true;
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }
}
