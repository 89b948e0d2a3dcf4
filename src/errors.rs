use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in CredVault.
///
/// Messages never carry secret material: no passwords, usernames or
/// decrypted bytes are ever formatted into an error.
#[derive(Debug, Error)]
pub enum CredVaultError {
    // --- Authentication ---
    #[error("Authentication failed — wrong master password or corrupted vault")]
    AuthenticationFailed,

    // --- Format ---
    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    // --- IO errors ---
    #[error("Vault not found at {0}")]
    VaultNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Validation errors ---
    #[error("Master password cannot be empty")]
    EmptyMasterPassword,

    #[error("Invalid length: {0}")]
    InvalidLength(String),

    #[error("Invalid service name: {0}")]
    InvalidServiceName(String),

    #[error("Vault is locked — unlock it with the master password first")]
    VaultLocked,

    #[error("Vault is already unlocked")]
    VaultAlreadyUnlocked,

    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("No credentials stored for '{0}'")]
    ServiceNotFound(String),
}

/// Broad category of a [`CredVaultError`].
///
/// Callers that only need to decide between "ask for the password
/// again", "report a disk problem" and "report a bug" can match on this
/// instead of on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong password or tampered file. The two are indistinguishable.
    Authentication,
    /// Structurally invalid vault file or payload.
    Format,
    /// The file system refused a read or write.
    Io,
    /// The caller passed something we refuse to act on.
    Validation,
    /// Crypto or serialization machinery failed unexpectedly.
    Internal,
    /// Configuration or CLI-level failures.
    Usage,
}

impl CredVaultError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationFailed => ErrorKind::Authentication,
            Self::InvalidVaultFormat(_) => ErrorKind::Format,
            Self::VaultNotFound(_) | Self::Io(_) => ErrorKind::Io,
            Self::EmptyMasterPassword
            | Self::InvalidLength(_)
            | Self::InvalidServiceName(_)
            | Self::VaultLocked
            | Self::VaultAlreadyUnlocked => ErrorKind::Validation,
            Self::KeyDerivationFailed(_)
            | Self::EncryptionFailed(_)
            | Self::SerializationError(_) => ErrorKind::Internal,
            Self::ConfigError(_)
            | Self::CommandFailed(_)
            | Self::ServiceNotFound(_) => ErrorKind::Usage,
        }
    }
}

/// Convenience type alias for CredVault results.
pub type Result<T> = std::result::Result<T, CredVaultError>;
