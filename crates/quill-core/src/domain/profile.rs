use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Profile entity - the identity record behind an authenticated account.
///
/// `password_hash` is `None` for accounts provisioned through OAuth; such
/// accounts can never pass password verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Create a profile with a password credential (email sign-up).
    pub fn new(email: String, full_name: Option<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            full_name,
            avatar_url: None,
            password_hash: Some(password_hash),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a credential-less profile (first OAuth sign-in).
    pub fn from_oauth(
        email: String,
        full_name: Option<String>,
        avatar_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            full_name,
            avatar_url,
            password_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

}

/// The slice of a profile that read paths attach to posts.
///
/// Templates only ever see this projection, never the credential-bearing
/// profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}
