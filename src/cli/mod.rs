//! CLI module — Clap argument parser, output helpers, and command implementations.
//!
//! The CLI is a thin collaborator: it gathers input, unlocks a `Vault`
//! and renders results.  All cryptography lives in the library.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{CredVaultError, ErrorKind, Result};
use crate::vault::Vault;

/// Minimum master password length for new vaults.
const MIN_PASSWORD_LEN: usize = 8;

/// How many times an interactive unlock may be retried after a wrong password.
const MAX_UNLOCK_ATTEMPTS: usize = 3;

/// Environment variable holding the master password for scripted use.
pub const PASSWORD_ENV: &str = "CREDVAULT_PASSWORD";

/// CredVault CLI: encrypted local password manager.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Encrypted local password manager",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the vault file (default: passwords.vault)
    #[arg(long, env = "CREDVAULT_FILE", global = true)]
    pub vault: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add or update the credentials for a service
    Add {
        /// Service name (e.g. github.com)
        service: String,
        /// Username or email (omit for interactive prompt)
        #[arg(short, long)]
        username: Option<String>,
        /// Generate a random password instead of entering one
        #[arg(short, long)]
        generate: bool,
        /// Length of the generated password (implies --generate)
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Show the credentials stored for a service
    Get {
        /// Service name
        service: String,
    },

    /// List all stored services
    List,

    /// Delete the credentials for a service
    Delete {
        /// Service name
        service: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a strong random password (no vault access)
    Generate {
        /// Password length (default: 16)
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Interactive menu: unlock once, then add, retrieve, list and delete
    Shell,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from the current directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// Build the full path to the vault file from the CLI arguments.
pub fn vault_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(settings.vault_path(&cwd, cli.vault.as_deref()))
}

/// Resolve the vault path, then unlock it.
///
/// With `allow_create == false` a missing vault file is an error, so
/// read-only commands never prompt to create a vault.
pub fn open_vault(cli: &Cli, settings: &Settings, allow_create: bool) -> Result<Vault> {
    let path = vault_path(cli, settings)?;
    let mut vault = Vault::with_kdf_params(&path, settings.argon2_params());

    if !allow_create && !vault.exists() {
        output::tip("Run `credvault add <SERVICE>` to create the vault.");
        return Err(CredVaultError::VaultNotFound(path));
    }

    unlock_vault(&mut vault)?;
    Ok(vault)
}

/// Unlock `vault`, trying in order:
/// 1. `CREDVAULT_PASSWORD` env var (single attempt)
/// 2. Interactive prompt, re-prompting after a wrong password
pub fn unlock_vault(vault: &mut Vault) -> Result<()> {
    let creating = !vault.exists();

    if let Some(pw) = env_password() {
        if creating {
            check_new_password(&pw)?;
        }
        return vault.unlock(&pw);
    }

    if creating {
        output::info(&format!(
            "No vault at {} — a new one will be created.",
            vault.path().display()
        ));
        let pw = prompt_new_password()?;
        return vault.unlock(&pw);
    }

    let mut attempt = 1;
    loop {
        let pw = prompt_password()?;
        match vault.unlock(&pw) {
            Err(e) if e.kind() == ErrorKind::Authentication && attempt < MAX_UNLOCK_ATTEMPTS => {
                output::warning("Wrong master password or corrupted vault. Try again.");
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Read the master password from `CREDVAULT_PASSWORD`, if set and non-empty.
fn env_password() -> Option<Zeroizing<String>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

/// Prompt for the master password of an existing vault.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    let pw = dialoguer::Password::new()
        .with_prompt("Enter your master password")
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation.
///
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Choose a master password")
                .with_confirmation(
                    "Confirm master password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| CredVaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if let Err(e) = check_new_password(&password) {
            output::warning(&format!("{e}. Try again."));
            continue;
        }

        return Ok(password);
    }
}

fn check_new_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredVaultError::CommandFailed(format!(
            "master password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Prompt for a line of visible text.
pub fn prompt_text(prompt: &str) -> Result<String> {
    dialoguer::Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| CredVaultError::CommandFailed(format!("input prompt: {e}")))
}

/// Prompt for a hidden credential password.  Empty input is allowed and
/// means "generate one for me".
pub fn prompt_secret(prompt: &str) -> Result<Zeroizing<String>> {
    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a generated-password length.
pub fn prompt_length(default: usize) -> Result<usize> {
    dialoguer::Input::<usize>::new()
        .with_prompt("Password length")
        .default(default)
        .interact_text()
        .map_err(|e| CredVaultError::CommandFailed(format!("input prompt: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn new_password_length_is_enforced() {
        assert!(check_new_password("short").is_err());
        assert!(check_new_password("long-enough").is_ok());
    }

    #[test]
    fn new_password_length_counts_characters() {
        // Eight multi-byte characters are enough even though the byte
        // count is larger.
        assert!(check_new_password("ééééééé").is_err());
        assert!(check_new_password("éééééééé").is_ok());
    }

    #[test]
    fn add_flags_parse() {
        let cli = Cli::try_parse_from([
            "credvault",
            "add",
            "github.com",
            "-u",
            "alice",
            "--length",
            "24",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                service,
                username,
                generate,
                length,
            } => {
                assert_eq!(service, "github.com");
                assert_eq!(username.as_deref(), Some("alice"));
                assert!(!generate);
                assert_eq!(length, Some(24));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn completions_shell_is_parsed_by_clap() {
        let cli = Cli::try_parse_from(["credvault", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: clap_complete::Shell::Zsh
            }
        ));
        assert!(Cli::try_parse_from(["credvault", "completions", "csh"]).is_err());
    }

    #[test]
    fn vault_flag_is_a_path() {
        let cli = Cli::try_parse_from(["credvault", "--vault", "work.vault", "list"]).unwrap();
        assert_eq!(cli.vault.as_deref(), Some(std::path::Path::new("work.vault")));
    }

    #[test]
    fn negative_length_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["credvault", "generate", "--length", "-4"]).is_err());
    }
}
