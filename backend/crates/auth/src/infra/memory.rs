//! In-Memory Repository Implementation
//!
//! Backs tests and database-less local runs. Every operation takes one
//! lock, so `register` is atomic with respect to concurrent callers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use kernel::id::{IdentityId, SessionId};
use tokio::sync::RwLock;

use crate::domain::entity::{identity::Identity, session::Session};
use crate::domain::repository::{AccountRegistry, IdentityRepository, SessionRepository};
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    identities: HashMap<IdentityId, Identity>,
    sessions: HashMap<SessionId, Session>,
}

impl State {
    fn email_taken(&self, email: &Email) -> bool {
        self.identities.values().any(|i| &i.email == email)
    }

    fn user_name_taken(&self, user_name: &UserName) -> bool {
        self.identities
            .values()
            .any(|i| i.user_name.canonical() == user_name.canonical())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn identity_count(&self) -> usize {
        self.state.read().await.identities.len()
    }

    /// Includes expired sessions not yet cleaned up
    pub async fn session_count(&self) -> usize {
        self.state.read().await.sessions.len()
    }
}

impl IdentityRepository for InMemoryAuthRepository {
    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>> {
        Ok(self.state.read().await.identities.get(identity_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let state = self.state.read().await;
        Ok(state
            .identities
            .values()
            .find(|i| &i.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.state.read().await.email_taken(email))
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        Ok(self.state.read().await.user_name_taken(user_name))
    }
}

impl SessionRepository for InMemoryAuthRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        let mut state = self.state.write().await;
        if !state.identities.contains_key(&session.identity_id) {
            return Err(AuthError::Internal(
                "Session references an unknown identity".to_string(),
            ));
        }
        state.sessions.insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: &SessionId) -> AuthResult<Option<Session>> {
        let state = self.state.read().await;
        Ok(state
            .sessions
            .get(session_id)
            .filter(|s| !s.is_expired())
            .cloned())
    }

    async fn delete_by_id(&self, session_id: &SessionId) -> AuthResult<bool> {
        Ok(self.state.write().await.sessions.remove(session_id).is_some())
    }

    async fn delete_expired(&self) -> AuthResult<u64> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - state.sessions.len()) as u64)
    }
}

impl AccountRegistry for InMemoryAuthRepository {
    async fn register(&self, identity: &Identity, session: &Session) -> AuthResult<()> {
        let mut state = self.state.write().await;

        if state.email_taken(&identity.email) || state.user_name_taken(&identity.user_name) {
            return Err(AuthError::AccountExists);
        }

        state
            .identities
            .insert(identity.identity_id, identity.clone());
        state.sessions.insert(session.session_id, session.clone());
        Ok(())
    }
}
