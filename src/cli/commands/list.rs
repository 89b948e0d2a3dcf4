//! `credvault list` — display all stored services in a table.

use crate::cli::output;
use crate::cli::{load_settings, open_vault, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let vault = open_vault(cli, &settings, false)?;

    let services = vault.list_entries()?;
    output::info(&format!(
        "{} — {} service(s)",
        vault.path().display(),
        services.len()
    ));
    output::print_services_table(&services);

    Ok(())
}
