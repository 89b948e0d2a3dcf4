//! `credvault shell` — unlock once, then drive the vault from a menu.

use dialoguer::Select;
use zeroize::Zeroizing;

use crate::cli::commands::{add, delete};
use crate::cli::output;
use crate::cli::{load_settings, open_vault, prompt_length, prompt_secret, prompt_text, Cli};
use crate::config::Settings;
use crate::errors::{CredVaultError, Result};
use crate::vault::Vault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add,
    Retrieve,
    Generate,
    List,
    Delete,
    Exit,
}

impl Action {
    const ALL: [Action; 6] = [
        Action::Add,
        Action::Retrieve,
        Action::Generate,
        Action::List,
        Action::Delete,
        Action::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            Action::Add => "Add new password",
            Action::Retrieve => "Retrieve password",
            Action::Generate => "Generate strong password",
            Action::List => "List all services",
            Action::Delete => "Delete password",
            Action::Exit => "Exit",
        }
    }
}

/// Execute the `shell` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let settings = load_settings()?;
    let mut vault = open_vault(cli, &settings, true)?;
    output::success(&format!("Unlocked {}", vault.path().display()));

    let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();

    loop {
        let choice = Select::new()
            .with_prompt("Menu")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(|e| CredVaultError::CommandFailed(format!("menu prompt: {e}")))?;

        let action = Action::ALL[choice];
        if action == Action::Exit {
            break;
        }

        // A failed action is reported and the menu comes back.
        if let Err(e) = run_action(action, &mut vault, &settings) {
            output::error(&e.to_string());
        }
    }

    vault.lock();
    println!("Goodbye!");
    Ok(())
}

fn run_action(action: Action, vault: &mut Vault, settings: &Settings) -> Result<()> {
    match action {
        Action::Add => {
            let service = prompt_text("Service name (e.g. google.com)")?;
            let username = prompt_text("Username/email")?;
            let mut password = prompt_secret("Password (leave empty to generate)")?;
            if password.is_empty() {
                let length = prompt_length(settings.generated_password_length)?;
                password = Zeroizing::new(Vault::generate_password(length)?);
                output::info(&format!("Generated password: {}", password.as_str()));
            }
            add::store(vault, &service, &username, &password)
        }
        Action::Retrieve => {
            let service = prompt_text("Service name")?;
            match vault.get(&service)? {
                Some(record) => output::print_credential(&service, record),
                None => output::info(&format!("No credentials stored for '{service}'.")),
            }
            Ok(())
        }
        Action::Generate => {
            let length = prompt_length(settings.generated_password_length)?;
            output::info(&format!(
                "Generated password: {}",
                Vault::generate_password(length)?
            ));
            Ok(())
        }
        Action::List => {
            output::print_services_table(&vault.list_entries()?);
            Ok(())
        }
        Action::Delete => {
            let service = prompt_text("Service name to delete")?;
            delete::remove(vault, &service, false)
        }
        Action::Exit => Ok(()),
    }
}
