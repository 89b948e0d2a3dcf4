//! `credvault delete` — remove the credentials for a service.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{load_settings, open_vault, Cli};
use crate::errors::{CredVaultError, Result};
use crate::vault::Vault;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, service: &str, force: bool) -> Result<()> {
    let settings = load_settings()?;
    let mut vault = open_vault(cli, &settings, false)?;
    remove(&mut vault, service, force)
}

/// Delete `service` from an unlocked vault, asking first unless `force`.
///
/// Shared with the interactive shell.
pub fn remove(vault: &mut Vault, service: &str, force: bool) -> Result<()> {
    if vault.get(service)?.is_none() {
        output::info(&format!("No credentials stored for '{service}'."));
        return Ok(());
    }

    if !force && !confirm(service)? {
        output::info("Cancelled.");
        return Ok(());
    }

    vault.delete(service)?;
    output::success(&format!("Deleted credentials for '{service}'"));
    Ok(())
}

fn confirm(service: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!("Delete credentials for '{service}'?"))
        .default(false)
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("confirm prompt: {e}")))
}
