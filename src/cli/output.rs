//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so every command
//! shares the same styling.  Status lines go to stderr where they would
//! otherwise mix with machine-readable stdout (`get`, `generate`).

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{CredentialRecord, ServiceMetadata};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Print a green success message.
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning.
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message.
pub fn info(msg: &str) {
    eprintln!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim hint.
pub fn tip(msg: &str) {
    eprintln!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of stored services (Service, Created, Updated).
pub fn print_services_table(services: &[ServiceMetadata]) {
    if services.is_empty() {
        info("No credentials stored yet.");
        tip("Run `credvault add <SERVICE>` to store your first credential.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Service", "Created", "Updated"]);

    for s in services {
        table.add_row(vec![
            s.service.clone(),
            s.created_at.format(TIMESTAMP_FORMAT).to_string(),
            s.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ]);
    }

    println!("{table}");
}

/// Print a stored credential.  The password is printed in the clear;
/// callers only reach this after an explicit request for it.
pub fn print_credential(service: &str, record: &CredentialRecord) {
    println!("{} {}", style("Service: ").bold(), service);
    println!("{} {}", style("Username:").bold(), record.username);
    println!("{} {}", style("Password:").bold(), record.password);
}
