//! The credential record stored for each service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A username/password pair for one service.
///
/// `username` and `password` are wiped from memory when the record is
/// dropped.  `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialRecord {
    pub username: String,
    pub password: String,

    /// When this service was first added.
    #[zeroize(skip)]
    pub created_at: DateTime<Utc>,

    /// When this service was last overwritten.
    #[zeroize(skip)]
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Create a record stamped with the current time.
    pub fn new(username: &str, password: &str) -> Self {
        let now = Utc::now();
        Self {
            username: username.to_string(),
            password: password.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Lightweight metadata about a stored service (no credentials).
///
/// Returned by `Vault::list_entries` so callers can display service
/// names and timestamps without touching usernames or passwords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMetadata {
    pub service: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
