//! Interactive console menu
//!
//! Shows the seven menu choices, prompts for the fields of the chosen
//! operation and runs it. Rejected operations can be retried with new input.
//! Only a fatal error leaves the loop early.

use super::args::Operation;
use crate::core::{Clock, ParkingEngine};
use crate::store::RecordStore;
use dialoguer::{Confirm, Input, Select};

/// Entries of the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    RegisterUser,
    DeleteUser,
    RegisterBicycle,
    DeleteBicycle,
    RecordEntry,
    RecordExit,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 7] = [
        MenuChoice::RegisterUser,
        MenuChoice::DeleteUser,
        MenuChoice::RegisterBicycle,
        MenuChoice::DeleteBicycle,
        MenuChoice::RecordEntry,
        MenuChoice::RecordExit,
        MenuChoice::Exit,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::RegisterUser => "1. Register user",
            MenuChoice::DeleteUser => "2. Delete user",
            MenuChoice::RegisterBicycle => "3. Register bicycle",
            MenuChoice::DeleteBicycle => "4. Delete bicycle",
            MenuChoice::RecordEntry => "5. Record entry",
            MenuChoice::RecordExit => "6. Record exit",
            MenuChoice::Exit => "7. Exit",
        }
    }

    /// Field prompts for this choice, in the order the operation takes them
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            MenuChoice::RegisterUser => &["Identity number", "Name", "Email"],
            MenuChoice::DeleteUser => &["Identity number"],
            MenuChoice::RegisterBicycle => {
                &["Serial number", "Owner identity number", "Brand", "Model"]
            }
            MenuChoice::DeleteBicycle => &["Serial number"],
            MenuChoice::RecordEntry | MenuChoice::RecordExit => {
                &["Identity number", "Serial number"]
            }
            MenuChoice::Exit => &[],
        }
    }

    /// Build the operation from answers given in [`MenuChoice::fields`] order
    ///
    /// Returns `None` for [`MenuChoice::Exit`] or when the number of answers
    /// does not match.
    pub fn operation(&self, answers: &[String]) -> Option<Operation> {
        let op = match (self, answers) {
            (MenuChoice::RegisterUser, [identity, name, email]) => Operation::RegisterUser {
                identity: identity.clone(),
                name: name.clone(),
                email: email.clone(),
            },
            (MenuChoice::DeleteUser, [identity]) => Operation::DeleteUser {
                identity: identity.clone(),
            },
            (MenuChoice::RegisterBicycle, [serial, owner, brand, model]) => {
                Operation::RegisterBike {
                    serial: serial.clone(),
                    owner: owner.clone(),
                    brand: brand.clone(),
                    model: model.clone(),
                }
            }
            (MenuChoice::DeleteBicycle, [serial]) => Operation::DeleteBike {
                serial: serial.clone(),
            },
            (MenuChoice::RecordEntry, [identity, serial]) => Operation::CheckIn {
                identity: identity.clone(),
                serial: serial.clone(),
            },
            (MenuChoice::RecordExit, [identity, serial]) => Operation::CheckOut {
                identity: identity.clone(),
                serial: serial.clone(),
            },
            _ => return None,
        };
        Some(op)
    }
}

/// Run the menu until the operator exits
///
/// # Errors
///
/// Returns an error if the terminal cannot be read or an operation fails
/// with a fatal error.
pub fn run<S: RecordStore, C: Clock>(engine: &mut ParkingEngine<S, C>) -> anyhow::Result<()> {
    let labels: Vec<&str> = MenuChoice::ALL.iter().map(MenuChoice::label).collect();

    println!("=== Bicycle parking ===");
    loop {
        let index = Select::new()
            .with_prompt("Choose an option")
            .items(&labels[..])
            .default(0)
            .interact()?;
        let Some(choice) = MenuChoice::from_index(index) else {
            continue;
        };
        if choice == MenuChoice::Exit {
            tracing::debug!("menu closed");
            return Ok(());
        }

        run_choice(engine, choice)?;
    }
}

/// Prompt and run one menu choice, offering a retry after each rejection
fn run_choice<S: RecordStore, C: Clock>(
    engine: &mut ParkingEngine<S, C>,
    choice: MenuChoice,
) -> anyhow::Result<()> {
    loop {
        let answers = choice
            .fields()
            .iter()
            .map(|field| prompt(field))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let Some(operation) = choice.operation(&answers) else {
            return Ok(());
        };

        match operation.execute(engine) {
            Ok(message) => {
                println!("OK: {message}");
                return Ok(());
            }
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(e) => {
                println!("ERROR: {e}");
                let again = Confirm::new()
                    .with_prompt("Try again?")
                    .default(true)
                    .interact()?;
                if !again {
                    return Ok(());
                }
            }
        }
    }
}

fn prompt(field: &str) -> anyhow::Result<String> {
    let value = Input::<String>::new()
        .with_prompt(field)
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}
