//! `credvault get` — print the credentials stored for one service.

use crate::cli::output;
use crate::cli::{load_settings, open_vault, Cli};
use crate::errors::{CredVaultError, Result};

/// Execute the `get` command.
pub fn execute(cli: &Cli, service: &str) -> Result<()> {
    let settings = load_settings()?;
    let vault = open_vault(cli, &settings, false)?;

    let record = vault
        .get(service)?
        .ok_or_else(|| CredVaultError::ServiceNotFound(service.to_string()))?;
    output::print_credential(service, record);

    Ok(())
}
