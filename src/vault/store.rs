//! High-level vault operations used by CLI commands.
//!
//! `Vault` wraps the binary format layer, the crypto layer and the
//! in-memory `CredentialStore` behind a small state machine:
//!
//! ```text
//! Locked --unlock(password)--> Unlocked --lock()--> Locked
//! ```
//!
//! Every mutation is persisted immediately.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::crypto::encryption::{decrypt, encrypt};
use crate::crypto::generator;
use crate::crypto::kdf::{derive_key, Argon2Params};
use crate::crypto::keys::DerivedKey;
use crate::errors::{CredVaultError, Result};

use super::credentials::CredentialStore;
use super::format::{self, VaultFile, VaultHeader};
use super::record::{CredentialRecord, ServiceMetadata};

/// Key material and plaintext that exist only while unlocked.
struct Session {
    header: VaultHeader,
    key: DerivedKey,
    credentials: CredentialStore,
}

enum State {
    Locked,
    Unlocked(Session),
}

/// The main vault handle.  Create one with `Vault::new`, `unlock` it,
/// then use its methods to manage credentials.
pub struct Vault {
    /// Path to the vault file on disk.
    path: PathBuf,

    /// Argon2 params used only when this handle creates a new vault.
    kdf_params: Argon2Params,

    state: State,
}

impl fmt::Debug for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault")
            .field("path", &self.path)
            .field("unlocked", &self.is_unlocked())
            .field("credentials", &"[REDACTED]")
            .finish()
    }
}

impl Vault {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// A locked handle for the vault at `path`, using default Argon2 params
    /// if the vault has to be created.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_kdf_params(path, Argon2Params::default())
    }

    /// A locked handle that creates new vaults with `kdf_params`.
    ///
    /// Existing vaults always open with the params stored in their header.
    pub fn with_kdf_params(path: impl Into<PathBuf>, kdf_params: Argon2Params) -> Self {
        Self {
            path: path.into(),
            kdf_params,
            state: State::Locked,
        }
    }

    // ------------------------------------------------------------------
    // State transitions
    // ------------------------------------------------------------------

    /// Unlock the vault with the master password.
    ///
    /// If no vault file exists yet, a new empty vault with a fresh salt
    /// is started; it reaches disk on the first save.  Otherwise the
    /// file is read, the key is derived from the password and the stored
    /// salt, and the payload is decrypted and verified.
    ///
    /// On any error the vault stays locked and no credentials are loaded.
    pub fn unlock(&mut self, master_password: &str) -> Result<()> {
        if self.is_unlocked() {
            return Err(CredVaultError::VaultAlreadyUnlocked);
        }
        if master_password.is_empty() {
            return Err(CredVaultError::EmptyMasterPassword);
        }

        let session = match format::read_vault(&self.path) {
            Ok(file) => self.open_existing(master_password, file)?,
            Err(CredVaultError::VaultNotFound(_)) => self.start_new(master_password)?,
            Err(e) => return Err(e),
        };

        self.state = State::Unlocked(session);
        Ok(())
    }

    /// Lock the vault, dropping the key and all plaintext credentials.
    pub fn lock(&mut self) {
        if self.is_unlocked() {
            debug!(path = %self.path.display(), "vault locked");
        }
        self.state = State::Locked;
    }

    fn open_existing(&self, master_password: &str, file: VaultFile) -> Result<Session> {
        let key = derive_key(
            master_password.as_bytes(),
            &file.header.salt,
            &file.header.kdf_params,
        )?;

        let plaintext = decrypt(&key, &file.payload, &file.header.to_bytes()).inspect_err(|_| {
            warn!(path = %self.path.display(), "vault authentication failed");
        })?;
        let credentials = CredentialStore::deserialize(&plaintext)?;

        debug!(
            path = %self.path.display(),
            credentials = credentials.len(),
            "vault unlocked"
        );

        Ok(Session {
            header: file.header,
            key,
            credentials,
        })
    }

    fn start_new(&self, master_password: &str) -> Result<Session> {
        let header = VaultHeader::generate(self.kdf_params)?;
        let key = derive_key(master_password.as_bytes(), &header.salt, &header.kdf_params)?;

        debug!(path = %self.path.display(), "no vault file yet, starting empty vault");

        Ok(Session {
            header,
            key,
            credentials: CredentialStore::new(),
        })
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Add or overwrite the credentials for `service`, then persist.
    ///
    /// If persisting fails the in-memory store is rolled back, so memory
    /// never claims a change the disk does not have.
    pub fn add(&mut self, service: &str, username: &str, password: &str) -> Result<()> {
        let snapshot = self.session()?.credentials.clone();
        self.session_mut()?
            .credentials
            .add(service, username, password)?;

        if let Err(e) = self.save() {
            self.session_mut()?.credentials = snapshot;
            return Err(e);
        }

        debug!(
            credentials = self.session()?.credentials.len(),
            "credential stored"
        );
        Ok(())
    }

    /// Look up the credentials for `service`.
    pub fn get(&self, service: &str) -> Result<Option<&CredentialRecord>> {
        Ok(self.session()?.credentials.get(service))
    }

    /// Remove `service`.  Returns `Ok(false)` if it was not present, in
    /// which case nothing is written.
    pub fn delete(&mut self, service: &str) -> Result<bool> {
        if !self.session()?.credentials.contains(service) {
            return Ok(false);
        }

        let snapshot = self.session()?.credentials.clone();
        self.session_mut()?.credentials.delete(service);

        if let Err(e) = self.save() {
            self.session_mut()?.credentials = snapshot;
            return Err(e);
        }

        debug!(
            credentials = self.session()?.credentials.len(),
            "credential deleted"
        );
        Ok(true)
    }

    /// Service names in insertion order.
    pub fn list_services(&self) -> Result<Vec<String>> {
        Ok(self
            .session()?
            .credentials
            .list_services()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    /// Service names with timestamps, in insertion order.
    pub fn list_entries(&self) -> Result<Vec<ServiceMetadata>> {
        Ok(self.session()?.credentials.list_metadata())
    }

    /// Generate a random password.  Does not require the vault to be unlocked.
    pub fn generate_password(length: usize) -> Result<String> {
        generator::generate_password(length)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Re-encrypt the credential store with a fresh nonce and write it
    /// to disk atomically.  Key and salt are unchanged.
    pub fn save(&mut self) -> Result<()> {
        let created = !self.path.exists();
        let session = self.session()?;

        let plaintext = session.credentials.serialize()?;
        let payload = encrypt(&session.key, &plaintext, &session.header.to_bytes())?;

        let file = VaultFile {
            header: session.header.clone(),
            payload,
        };
        format::write_vault(&self.path, &file)?;

        if created {
            info!(path = %self.path.display(), "vault created");
        } else {
            debug!(path = %self.path.display(), "vault saved");
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a vault file exists at `path`.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Returns `true` while the vault is unlocked.
    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, State::Unlocked(_))
    }

    /// Returns the number of stored services.
    pub fn len(&self) -> Result<usize> {
        Ok(self.session()?.credentials.len())
    }

    /// Returns `true` if no services are stored.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.session()?.credentials.is_empty())
    }

    /// Returns the header of the unlocked vault (salt, KDF params).
    pub fn header(&self) -> Result<&VaultHeader> {
        Ok(&self.session()?.header)
    }

    fn session(&self) -> Result<&Session> {
        match &self.state {
            State::Unlocked(session) => Ok(session),
            State::Locked => Err(CredVaultError::VaultLocked),
        }
    }

    fn session_mut(&mut self) -> Result<&mut Session> {
        match &mut self.state {
            State::Unlocked(session) => Ok(session),
            State::Locked => Err(CredVaultError::VaultLocked),
        }
    }
}
