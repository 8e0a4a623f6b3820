//! PostgreSQL Repository Implementations

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{IdentityId, SessionId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{identity::Identity, session::Session};
use crate::domain::repository::{AccountRegistry, IdentityRepository, SessionRepository};
use crate::domain::value_object::{
    date_of_birth::DateOfBirth, display_name::DisplayName, email::Email, password::PasswordHash,
    user_name::UserName,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

const IDENTITY_COLUMNS: &str = r#"
    identity_id,
    display_name,
    email,
    user_name,
    password_hash,
    date_of_birth,
    created_at,
    updated_at
"#;

// ============================================================================
// Identity Repository Implementation
// ============================================================================

impl IdentityRepository for PgAuthRepository {
    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE identity_id = $1"
        ))
        .bind(identity_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(IdentityRow::into_identity).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(IdentityRow::into_identity).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM identities WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM identities WHERE user_name_canonical = $1)",
        )
        .bind(user_name.canonical())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgAuthRepository {
    async fn create(&self, session: &Session) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                identity_id,
                user_agent,
                created_at,
                expires_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.identity_id.as_uuid())
        .bind(session.user_agent.as_deref())
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, session_id: &SessionId) -> AuthResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                identity_id,
                user_agent,
                created_at,
                expires_at
            FROM sessions
            WHERE session_id = $1 AND expires_at > now()
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn delete_by_id(&self, session_id: &SessionId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn delete_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Account Registry Implementation
// ============================================================================

impl AccountRegistry for PgAuthRepository {
    async fn register(&self, identity: &Identity, session: &Session) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO identities (
                identity_id,
                display_name,
                email,
                user_name,
                user_name_canonical,
                password_hash,
                date_of_birth,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(identity.identity_id.as_uuid())
        .bind(identity.display_name.as_str())
        .bind(identity.email.as_str())
        .bind(identity.user_name.original())
        .bind(identity.user_name.canonical())
        .bind(identity.password_hash.as_phc_string())
        .bind(identity.date_of_birth.as_date())
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::AccountExists
            } else {
                AuthError::Database(e)
            }
        })?;

        sqlx::query(
            r#"
            INSERT INTO sessions (
                session_id,
                identity_id,
                user_agent,
                created_at,
                expires_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.identity_id.as_uuid())
        .bind(session.user_agent.as_deref())
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&mut *tx)
        .await?;

        // Dropping `tx` without commit rolls back
        tx.commit().await?;

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct IdentityRow {
    identity_id: Uuid,
    display_name: String,
    email: String,
    user_name: String,
    password_hash: String,
    date_of_birth: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_identity(self) -> AuthResult<Identity> {
        let password_hash = PasswordHash::from_phc_string(self.password_hash)?;

        Ok(Identity {
            identity_id: IdentityId::from_uuid(self.identity_id),
            display_name: DisplayName::from_db(self.display_name),
            email: Email::from_db(self.email),
            user_name: UserName::from_db(self.user_name),
            password_hash,
            date_of_birth: DateOfBirth::from_db(self.date_of_birth),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    identity_id: Uuid,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_id: SessionId::from_uuid(self.session_id),
            identity_id: IdentityId::from_uuid(self.identity_id),
            user_agent: self.user_agent,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}
