//! In-memory credential store and its canonical byte encoding.
//!
//! The store keeps services in insertion order so listings are
//! deterministic.  Its serialized form is the plaintext that gets
//! sealed inside the vault file:
//!
//! ```text
//! {"version":1,"credentials":[{"service":"...","username":"...","password":"...",
//!   "created_at":"...","updated_at":"..."}, ...]}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::record::{CredentialRecord, ServiceMetadata};
use crate::errors::{CredVaultError, Result};

/// Version of the JSON payload inside the sealed ciphertext.
pub const PAYLOAD_VERSION: u32 = 1;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Entry {
    service: String,
    #[serde(flatten)]
    record: CredentialRecord,
}

#[derive(Deserialize)]
struct Payload {
    version: u32,
    credentials: Vec<Entry>,
}

/// Ordered mapping from service name to credential record.
///
/// `Debug` shows only the number of entries.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialStore {
    entries: Vec<Entry>,
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("len", &self.entries.len())
            .field("entries", &"[REDACTED]")
            .finish()
    }
}

impl CredentialStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite the credentials for `service`.
    ///
    /// Overwriting keeps the service's position and original
    /// `created_at`.
    pub fn add(&mut self, service: &str, username: &str, password: &str) -> Result<()> {
        validate_service_name(service)?;

        match self.position(service) {
            Some(idx) => {
                let created_at = self.entries[idx].record.created_at;
                let mut record = CredentialRecord::new(username, password);
                record.created_at = created_at;
                self.entries[idx].record = record;
            }
            None => self.entries.push(Entry {
                service: service.to_string(),
                record: CredentialRecord::new(username, password),
            }),
        }
        Ok(())
    }

    /// Look up the credentials for `service`.
    pub fn get(&self, service: &str) -> Option<&CredentialRecord> {
        self.position(service).map(|idx| &self.entries[idx].record)
    }

    /// Remove `service`.  Returns `false` if it was not present.
    pub fn delete(&mut self, service: &str) -> bool {
        match self.position(service) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Service names in insertion order.
    pub fn list_services(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.service.as_str()).collect()
    }

    /// Service names with their timestamps, in insertion order.
    pub fn list_metadata(&self) -> Vec<ServiceMetadata> {
        self.entries
            .iter()
            .map(|e| ServiceMetadata {
                service: e.service.clone(),
                created_at: e.record.created_at,
                updated_at: e.record.updated_at,
            })
            .collect()
    }

    /// Returns `true` if `service` is present.
    pub fn contains(&self, service: &str) -> bool {
        self.position(service).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encode the store as JSON bytes.  The buffer is zeroized on drop.
    pub fn serialize(&self) -> Result<Zeroizing<Vec<u8>>> {
        let payload = PayloadRef {
            version: PAYLOAD_VERSION,
            credentials: &self.entries,
        };
        serde_json::to_vec(&payload)
            .map(Zeroizing::new)
            .map_err(|e| CredVaultError::SerializationError(format!("credentials: {e}")))
    }

    /// Decode bytes produced by [`CredentialStore::serialize`].
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let payload: Payload = serde_json::from_slice(bytes)
            .map_err(|e| CredVaultError::InvalidVaultFormat(format!("credentials JSON: {e}")))?;

        if payload.version != PAYLOAD_VERSION {
            return Err(CredVaultError::InvalidVaultFormat(format!(
                "unsupported payload version {}, expected {PAYLOAD_VERSION}",
                payload.version
            )));
        }

        let mut store = Self::new();
        for entry in payload.credentials {
            if entry.service.is_empty() {
                return Err(CredVaultError::InvalidVaultFormat(
                    "payload contains an empty service name".into(),
                ));
            }
            if store.contains(&entry.service) {
                return Err(CredVaultError::InvalidVaultFormat(
                    "payload contains a duplicate service name".into(),
                ));
            }
            store.entries.push(entry);
        }
        Ok(store)
    }

    fn position(&self, service: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.service == service)
    }
}

/// Borrowing twin of `Payload` so serializing does not clone secrets.
#[derive(Serialize)]
struct PayloadRef<'a> {
    version: u32,
    credentials: &'a [Entry],
}

/// Validate that a service name is usable as a key.
///
/// Service names are case-sensitive and otherwise unrestricted, but
/// must be non-empty.
fn validate_service_name(service: &str) -> Result<()> {
    if service.is_empty() {
        return Err(CredVaultError::InvalidServiceName(
            "service name cannot be empty".into(),
        ));
    }
    Ok(())
}
