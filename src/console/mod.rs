//! # Interactive Console
//!
//! Hierarchical text menu: Main -> Manage Keys / Manage Secrets ->
//! List/Create/Retrieve/Update/Delete. Commands are single characters,
//! case-insensitive; empty input defaults to the exit command.
//!
//! Envelope errors render as `error-> <message>` and the loop continues.
//! Anything unexpected (an I/O failure on the terminal, a setup fault)
//! prints the error, its cause chain, and a backtrace, then the menu
//! continues rather than terminating the process.

pub mod manage_keys;
pub mod manage_secrets;

use std::io::{self, BufRead, Write};

use crate::keys::KeysManagement;
use crate::secrets::SecretsManagement;
use manage_keys::ManageKeys;
use manage_secrets::ManageSecrets;

/// Owns the two resource screens and drives the main menu loop.
#[derive(Debug)]
pub struct Menus {
    keys: ManageKeys,
    secrets: ManageSecrets,
}

impl Menus {
    pub fn new(keys: KeysManagement, secrets: SecretsManagement) -> Self {
        Menus {
            keys: ManageKeys::new(keys),
            secrets: ManageSecrets::new(secrets),
        }
    }

    /// Run the main menu until the user exits.
    pub async fn main_menu(&self) {
        loop {
            write_main_menu();

            let command = match read_menu_option() {
                Ok(command) => command,
                Err(e) => {
                    write_unexpected_error(&e.into());
                    return;
                }
            };
            match command.as_str() {
                "K" => self.manage_keys_menu().await,
                "S" => self.manage_secrets_menu().await,
                "X" => return,
                _ => {}
            }
        }
    }

    async fn manage_keys_menu(&self) {
        loop {
            write_manage_keys_submenu();

            let command = match read_menu_option() {
                Ok(command) => command,
                Err(e) => {
                    write_unexpected_error(&e.into());
                    return;
                }
            };
            let outcome = match command.as_str() {
                "1" => self.keys.list().await,
                "2" => self.keys.create().await,
                "3" => self.keys.retrieval().await,
                "4" => self.keys.update().await,
                "5" => self.keys.delete().await,
                "M" => return,
                _ => continue,
            };
            if let Err(e) = outcome {
                write_unexpected_error(&e);
                let _ = read_continue();
            }
        }
    }

    async fn manage_secrets_menu(&self) {
        loop {
            write_manage_secrets_submenu();

            let command = match read_menu_option() {
                Ok(command) => command,
                Err(e) => {
                    write_unexpected_error(&e.into());
                    return;
                }
            };
            let outcome = match command.as_str() {
                "1" => self.secrets.list().await,
                "2" => self.secrets.create().await,
                "3" => self.secrets.retrieval().await,
                "4" => self.secrets.update().await,
                "5" => self.secrets.delete().await,
                "M" => return,
                _ => continue,
            };
            if let Err(e) = outcome {
                write_unexpected_error(&e);
                let _ = read_continue();
            }
        }
    }
}

fn write_main_menu() {
    println!();
    println!("KEY VAULT SERVICES: MAIN MENU");
    println!();
    println!("COMMAND DESCRIPTION");
    println!("{}", "=".repeat(80));
    println!("[ K ]   MANAGE KEYS");
    println!("[ S ]   MANAGE SECRETS");
    println!("[ X ]   EXIT");
    println!("{}", "=".repeat(80));
}

fn write_manage_keys_submenu() {
    println!();
    println!("KEY VAULT SERVICES: MANAGE KEYS MENU");
    println!();
    println!("COMMAND DESCRIPTION");
    println!("{}", "=".repeat(80));
    println!("[ 1 ]   LIST KEYS");
    println!("[ 2 ]   CREATE KEY");
    println!("[ 3 ]   RETRIEVE KEY");
    println!("[ 4 ]   UPDATE KEY");
    println!("[ 5 ]   DELETE KEY");
    println!("[ M ]   MAIN MENU");
    println!("{}", "=".repeat(80));
}

fn write_manage_secrets_submenu() {
    println!();
    println!("KEY VAULT SERVICES: MANAGE SECRETS MENU");
    println!();
    println!("COMMAND DESCRIPTION");
    println!("{}", "=".repeat(80));
    println!("[ 1 ]   LIST SECRETS");
    println!("[ 2 ]   CREATE SECRET");
    println!("[ 3 ]   RETRIEVE SECRET");
    println!("[ 4 ]   UPDATE SECRET");
    println!("[ 5 ]   DELETE SECRET");
    println!("[ M ]   MAIN MENU");
    println!("{}", "=".repeat(80));
}

/// Read a single menu command: uppercased, empty input maps to exit.
fn read_menu_option() -> io::Result<String> {
    println!();
    print!("ENTER COMMAND AND PRESS ENTER: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let command = line.trim().to_uppercase();
    Ok(if command.is_empty() {
        "X".to_string()
    } else {
        command
    })
}

/// Prompt for one input field with a fixed-width label.
pub(crate) fn read_input_field(label: &str) -> io::Result<String> {
    print!("- {label:<20} : ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub(crate) fn read_continue() -> io::Result<()> {
    println!();
    print!("PRESS ENTER TO CONTINUE ->");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

pub(crate) fn write_error_message(message: &str) {
    println!("error-> {message}");
}

fn write_unexpected_error(e: &anyhow::Error) {
    println!("unexpected exception-> {e}");
    for cause in e.chain().skip(1) {
        println!("caused by-> {cause}");
    }
    println!("backtrace->");
    println!("{}", e.backtrace());
}
