use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// The user's display name.
    pub full_name: String,
    /// The user's email address.
    pub email: String,
    /// The user's avatar URL, if the provider has one.
    #[serde(default)]
    pub image: Option<String>,
}

/// A session written by the identity provider into the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The user this session belongs to.
    pub user: SessionUser,
    /// The timestamp when the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
