//! Session Entity
//!
//! One signed-in device or browser. The unit of revocation: deleting a
//! session invalidates every token minted against it at the next check
//! that consults the store.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use kernel::id::{IdentityId, SessionId};

/// Session entity
///
/// Immutable once created; `expires_at` is fixed at creation and never
/// extended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: SessionId,
    pub identity_id: IdentityId,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// TTL comes from configuration, not from here
    pub fn new(identity_id: IdentityId, user_agent: Option<String>, ttl: Duration) -> Self {
        let now = Utc::now().trunc_subsecs(6);

        Self {
            session_id: SessionId::new(),
            identity_id,
            user_agent,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_expiry() {
        let session = Session::new(IdentityId::new(), None, Duration::days(30));
        assert_eq!(session.expires_at - session.created_at, Duration::days(30));
        assert!(!session.is_expired());
        assert!(session.is_expired_at(session.expires_at));
    }

    #[test]
    fn test_timestamps_have_microsecond_precision() {
        let session = Session::new(IdentityId::new(), None, Duration::days(30));
        assert_eq!(session.created_at.timestamp_subsec_nanos() % 1000, 0);
        assert_eq!(session.expires_at.timestamp_subsec_nanos() % 1000, 0);
    }

    #[test]
    fn test_sessions_are_distinct() {
        let identity = IdentityId::new();
        let a = Session::new(identity, None, Duration::days(1));
        let b = Session::new(identity, None, Duration::days(1));
        assert_ne!(a.session_id, b.session_id);
    }
}
