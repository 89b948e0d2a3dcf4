//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - `CredentialRecord` and `ServiceMetadata` types (`record`)
//! - The in-memory `CredentialStore` and its JSON encoding (`credentials`)
//! - Binary vault file format with atomic writes (`format`)
//! - High-level `Vault` for unlocking and managing credentials (`store`)

pub mod credentials;
pub mod format;
pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use credentials::CredentialStore;
pub use format::{VaultFile, VaultHeader};
pub use record::{CredentialRecord, ServiceMetadata};
pub use store::Vault;
