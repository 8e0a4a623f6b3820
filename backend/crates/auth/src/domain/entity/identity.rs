//! Identity Entity
//!
//! A user account. The password hash never leaves the server; the
//! presentation layer maps this to a response DTO without it.

use chrono::{DateTime, SubsecRound, Utc};
use kernel::id::IdentityId;

use crate::domain::value_object::{
    date_of_birth::DateOfBirth, display_name::DisplayName, email::Email, password::PasswordHash,
    user_name::UserName,
};

#[derive(Debug, Clone)]
pub struct Identity {
    pub identity_id: IdentityId,
    pub display_name: DisplayName,
    /// Unique, canonical lower-case
    pub email: Email,
    /// Unique on its canonical form
    pub user_name: UserName,
    pub password_hash: PasswordHash,
    pub date_of_birth: DateOfBirth,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(
        display_name: DisplayName,
        email: Email,
        user_name: UserName,
        password_hash: PasswordHash,
        date_of_birth: DateOfBirth,
    ) -> Self {
        // Microseconds, as stored
        let now = Utc::now().trunc_subsecs(6);

        Self {
            identity_id: IdentityId::new(),
            display_name,
            email,
            user_name,
            password_hash,
            date_of_birth,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::password::RawPassword;
    use chrono::NaiveDate;

    #[test]
    fn test_new_identity_timestamps_match_storage_precision() {
        let password = RawPassword::new("Chalkboard-42".to_string()).unwrap();
        let identity = Identity::new(
            DisplayName::from_db("Tanaka"),
            Email::from_db("tanaka@school.example"),
            UserName::from_db("tanaka"),
            PasswordHash::from_raw(&password, None).unwrap(),
            DateOfBirth::from_db(NaiveDate::from_ymd_opt(2000, 4, 1).unwrap()),
        );

        assert_eq!(identity.created_at.timestamp_subsec_nanos() % 1000, 0);
        assert_eq!(identity.created_at, identity.updated_at);
    }
}
