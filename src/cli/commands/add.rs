//! `credvault add` — add or update the credentials for a service.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, open_vault, prompt_secret, prompt_text, Cli};
use crate::config::Settings;
use crate::errors::Result;
use crate::vault::Vault;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    service: &str,
    username: Option<&str>,
    generate: bool,
    length: Option<usize>,
) -> Result<()> {
    let settings = load_settings()?;

    // Gather the credential before touching the vault so a bad length
    // or an aborted prompt never unlocks anything.
    let username = match username {
        Some(u) => u.to_string(),
        None => prompt_text("Username")?,
    };

    let entered = if generate || length.is_some() {
        None
    } else if !io::stdin().is_terminal() {
        // Piped input (stdin is not a terminal).
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Some(Zeroizing::new(buf.trim_end().to_string()))
    } else {
        Some(prompt_secret("Password (leave empty to generate one)")?)
    };

    // Empty input means "generate one", on a pipe as on a prompt.
    let (password, generated) = match entered {
        Some(pw) if !pw.is_empty() => (pw, false),
        _ => {
            let len = generated_length(&settings, length);
            (Zeroizing::new(Vault::generate_password(len)?), true)
        }
    };

    let mut vault = open_vault(cli, &settings, true)?;
    store(&mut vault, service, &username, &password)?;

    if generated {
        output::info(&format!("Generated password: {}", password.as_str()));
    }
    Ok(())
}

/// Store one credential in an unlocked vault and report the outcome.
///
/// Shared with the interactive shell.
pub fn store(vault: &mut Vault, service: &str, username: &str, password: &str) -> Result<()> {
    let existed = vault.get(service)?.is_some();
    vault.add(service, username, password)?;

    let verb = if existed { "updated" } else { "added" };
    output::success(&format!(
        "Credentials for '{service}' {verb} ({} total)",
        vault.len()?
    ));
    Ok(())
}

/// Resolve the length for a generated password.
pub(crate) fn generated_length(settings: &Settings, length: Option<usize>) -> usize {
    length.unwrap_or(settings.generated_password_length)
}
