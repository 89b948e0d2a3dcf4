//! `credvault generate` — print a random password without opening a vault.

use crate::cli::load_settings;
use crate::errors::Result;
use crate::vault::Vault;

/// Execute the `generate` command.
pub fn execute(length: Option<usize>) -> Result<()> {
    let settings = load_settings()?;
    let length = length.unwrap_or(settings.generated_password_length);

    // Raw output so the password can be piped.
    println!("{}", Vault::generate_password(length)?);
    Ok(())
}
