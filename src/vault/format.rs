//! Binary vault file format and atomic persistence.
//!
//! A vault file has this fixed layout (integers little-endian):
//!
//! ```text
//! [CVLT: 4][version: 1][salt len: 1][salt: 32][kdf id: 1][m_kib: 4][t: 4][p: 4][key len: 1]
//! [nonce: 12][ciphertext len: 4][ciphertext: N][tag: 16]
//! ```
//!
//! - **Magic** (`CVLT`): identifies the file as a CredVault vault.
//! - **Version**: format version (currently `1`).
//! - **Salt**: random per-vault Argon2id salt.
//! - **KDF id / params / key len**: exactly how the key was derived, so
//!   it can be derived again on open.
//! - **Nonce, ciphertext, tag**: the AES-256-GCM sealed credential store.
//!
//! The first 52 bytes (magic through key len) form the header and are fed
//! to AES-GCM as associated data, so any change to them fails
//! authentication even if the parse itself succeeds.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::crypto::encryption::{SealedPayload, NONCE_LEN, TAG_LEN};
use crate::crypto::kdf::{generate_salt, Argon2Params, Salt, SALT_LEN};
use crate::crypto::keys::KEY_LEN;
use crate::errors::{CredVaultError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"CVLT";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Identifier for Argon2id (version 0x13).
const KDF_ARGON2ID: u8 = 1;

const SALT_LEN_OFFSET: usize = 5;
const SALT_OFFSET: usize = 6;
const KDF_ID_OFFSET: usize = SALT_OFFSET + SALT_LEN;
const MEMORY_OFFSET: usize = KDF_ID_OFFSET + 1;
const ITERATIONS_OFFSET: usize = MEMORY_OFFSET + 4;
const PARALLELISM_OFFSET: usize = ITERATIONS_OFFSET + 4;
const KEY_LEN_OFFSET: usize = PARALLELISM_OFFSET + 4;

/// Size of the authenticated header: magic through key length.
pub const HEADER_LEN: usize = KEY_LEN_OFFSET + 1;

const LEN_OFFSET: usize = HEADER_LEN + NONCE_LEN;
const CIPHERTEXT_OFFSET: usize = LEN_OFFSET + 4;

/// Smallest possible file: header, nonce, length, empty ciphertext, tag.
pub const MIN_FILE_LEN: usize = CIPHERTEXT_OFFSET + TAG_LEN;

// ---------------------------------------------------------------------------
// VaultHeader
// ---------------------------------------------------------------------------

/// Plaintext metadata at the start of a vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultHeader {
    /// Format version.
    pub version: u8,
    /// Argon2id parameters the key was derived with.
    pub kdf_params: Argon2Params,
    /// The Argon2id salt.  Not secret.
    pub salt: Salt,
}

impl VaultHeader {
    /// Header for a brand-new vault with a freshly generated salt.
    ///
    /// Nothing is written to disk until the first `write_vault`.
    pub fn generate(kdf_params: Argon2Params) -> Result<Self> {
        kdf_params.validate()?;
        Ok(Self {
            version: CURRENT_VERSION,
            kdf_params,
            salt: generate_salt(),
        })
    }

    /// Encode the header.  These bytes are also the AEAD associated data.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0..4].copy_from_slice(MAGIC);
        buf[4] = self.version;
        buf[SALT_LEN_OFFSET] = SALT_LEN as u8;
        buf[SALT_OFFSET..KDF_ID_OFFSET].copy_from_slice(&self.salt);
        buf[KDF_ID_OFFSET] = KDF_ARGON2ID;
        buf[MEMORY_OFFSET..ITERATIONS_OFFSET]
            .copy_from_slice(&self.kdf_params.memory_kib.to_le_bytes());
        buf[ITERATIONS_OFFSET..PARALLELISM_OFFSET]
            .copy_from_slice(&self.kdf_params.iterations.to_le_bytes());
        buf[PARALLELISM_OFFSET..KEY_LEN_OFFSET]
            .copy_from_slice(&self.kdf_params.parallelism.to_le_bytes());
        buf[KEY_LEN_OFFSET] = KEY_LEN as u8;
        buf
    }

    /// Decode a header from exactly `HEADER_LEN` bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != HEADER_LEN {
            return Err(CredVaultError::InvalidVaultFormat(format!(
                "header must be {HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(CredVaultError::InvalidVaultFormat(
                "missing CVLT magic bytes".into(),
            ));
        }

        let version = bytes[4];
        if version != CURRENT_VERSION {
            return Err(CredVaultError::InvalidVaultFormat(format!(
                "unsupported version {version}, expected {CURRENT_VERSION}"
            )));
        }

        if usize::from(bytes[SALT_LEN_OFFSET]) != SALT_LEN {
            return Err(CredVaultError::InvalidVaultFormat(format!(
                "unsupported salt length {}",
                bytes[SALT_LEN_OFFSET]
            )));
        }
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&bytes[SALT_OFFSET..KDF_ID_OFFSET]);

        if bytes[KDF_ID_OFFSET] != KDF_ARGON2ID {
            return Err(CredVaultError::InvalidVaultFormat(format!(
                "unsupported KDF id {}",
                bytes[KDF_ID_OFFSET]
            )));
        }

        let kdf_params = Argon2Params {
            memory_kib: read_u32(bytes, MEMORY_OFFSET),
            iterations: read_u32(bytes, ITERATIONS_OFFSET),
            parallelism: read_u32(bytes, PARALLELISM_OFFSET),
        };
        // A tampered header must not be able to request unbounded work.
        kdf_params.validate().map_err(|_| {
            CredVaultError::InvalidVaultFormat("KDF parameters out of range".into())
        })?;

        if usize::from(bytes[KEY_LEN_OFFSET]) != KEY_LEN {
            return Err(CredVaultError::InvalidVaultFormat(format!(
                "unsupported key length {}",
                bytes[KEY_LEN_OFFSET]
            )));
        }

        Ok(Self {
            version,
            kdf_params,
            salt,
        })
    }
}

// ---------------------------------------------------------------------------
// VaultFile
// ---------------------------------------------------------------------------

/// Everything stored in a vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultFile {
    pub header: VaultHeader,
    pub payload: SealedPayload,
}

impl VaultFile {
    /// Encode the full file contents.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let ciphertext_len = u32::try_from(self.payload.ciphertext.len()).map_err(|_| {
            CredVaultError::SerializationError(format!(
                "ciphertext length {} exceeds u32::MAX",
                self.payload.ciphertext.len()
            ))
        })?;

        let total = MIN_FILE_LEN + self.payload.ciphertext.len();
        let mut buf = Vec::with_capacity(total);

        buf.extend_from_slice(&self.header.to_bytes()); // 52 bytes
        buf.extend_from_slice(&self.payload.nonce); // 12 bytes
        buf.extend_from_slice(&ciphertext_len.to_le_bytes()); // 4 bytes LE
        buf.extend_from_slice(&self.payload.ciphertext); // N bytes
        buf.extend_from_slice(&self.payload.tag); // 16 bytes

        Ok(buf)
    }

    /// Decode full file contents.  Rejects truncated or over-long input.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_FILE_LEN {
            return Err(CredVaultError::InvalidVaultFormat(
                "file too small to be a valid vault".into(),
            ));
        }

        let header = VaultHeader::parse(&data[..HEADER_LEN])?;

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&data[HEADER_LEN..LEN_OFFSET]);

        let ciphertext_len = usize::try_from(read_u32(data, LEN_OFFSET)).map_err(|_| {
            CredVaultError::InvalidVaultFormat(
                "ciphertext length exceeds platform address space".into(),
            )
        })?;

        let ciphertext_end = CIPHERTEXT_OFFSET
            .checked_add(ciphertext_len)
            .ok_or_else(|| CredVaultError::InvalidVaultFormat("ciphertext length overflow".into()))?;
        let file_end = ciphertext_end
            .checked_add(TAG_LEN)
            .ok_or_else(|| CredVaultError::InvalidVaultFormat("ciphertext length overflow".into()))?;
        if file_end != data.len() {
            return Err(CredVaultError::InvalidVaultFormat(
                "ciphertext length does not match file size".into(),
            ));
        }

        let ciphertext = data[CIPHERTEXT_OFFSET..ciphertext_end].to_vec();
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&data[ciphertext_end..]);

        Ok(Self {
            header,
            payload: SealedPayload {
                nonce,
                ciphertext,
                tag,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Read and parse a vault file.
///
/// A missing file is reported as `VaultNotFound`; every other read
/// failure is surfaced as `Io`, never as an empty vault.
pub fn read_vault(path: &Path) -> Result<VaultFile> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CredVaultError::VaultNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    VaultFile::from_bytes(&data)
}

/// Write a vault file to disk **atomically**.
///
/// 1. Encode the file.
/// 2. Write it to a temp file in the same directory and fsync it.
/// 3. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file, and a
/// failure at any step leaves the previous vault untouched.
pub fn write_vault(path: &Path, vault: &VaultFile) -> Result<()> {
    let buf = vault.to_bytes()?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    // The temp file is in the same directory so rename is guaranteed
    // to be atomic on the same filesystem.
    let tmp_path = temp_path(path);

    if let Err(e) = write_synced(&tmp_path, &buf) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    sync_dir(parent);
    Ok(())
}

/// Path of the temp file used while writing `path`.
///
/// Example: `dir/passwords.vault` -> `dir/.passwords.vault.tmp`
pub fn temp_path(path: &Path) -> PathBuf {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!(".{name}.tmp"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    // Drop any leftover from an earlier crash so the mode below applies.
    let _ = fs::remove_file(path);

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(unix)]
fn sync_dir(dir: &Path) {
    // Best effort: persists the rename itself.
    if let Ok(d) = fs::File::open(dir) {
        let _ = d.sync_all();
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
