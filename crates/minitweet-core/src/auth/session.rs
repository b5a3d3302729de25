//! The session store: sole owner of the current credential.
//!
//! The in-memory credential and the durable copy never disagree from a
//! caller's point of view: the durable write happens first and memory is
//! only updated once it succeeded.

use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::models::Credential;

use super::storage::TokenStorage;

/// Session-level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

pub struct SessionStore {
    storage: Box<dyn TokenStorage>,
    credential: Option<Credential>,
    /// Bumped on every credential transition; in-flight work started under an
    /// older generation is stale.
    generation: u64,
    state_tx: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Open the store, reading any persisted credential.
    ///
    /// An unreadable, corrupted, or empty stored value is treated as absent.
    pub fn open(storage: impl TokenStorage + 'static) -> Self {
        let credential = match storage.load() {
            Ok(Some(token)) if !token.is_empty() => Some(Credential::new(token)),
            Ok(Some(_)) => {
                warn!("Stored credential is empty, ignoring");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored credential, starting anonymous");
                None
            }
        };

        let state = if credential.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        };
        let (state_tx, _) = watch::channel(state);

        Self {
            storage: Box::new(storage),
            credential,
            generation: 0,
            state_tx,
        }
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn state(&self) -> SessionState {
        if self.credential.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Watch session state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Replace the credential, persisting it first.
    pub fn set_credential(&mut self, credential: Credential) -> Result<()> {
        self.storage.store(credential.as_str())?;
        self.credential = Some(credential);
        self.transition();
        info!("Session credential stored");
        Ok(())
    }

    /// Forget the credential. Clearing an absent credential is a no-op.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove()?;
        if self.credential.take().is_some() {
            self.transition();
            info!("Session cleared");
        }
        Ok(())
    }

    fn transition(&mut self) {
        self.generation += 1;
        let state = self.state();
        // send_replace never fails, even with no receivers
        self.state_tx.send_replace(state);
    }
}
