use std::path::Path;

use anyhow::{anyhow, Result};
use dialoguer::Confirm;
use models::Character;
use service::{parse_amount, Ledger};
use tracing::info;

use crate::cli::Commands;

pub fn run(command: Commands, data_file: &Path) -> Result<()> {
    common::env::ensure_data_dir(data_file)?;
    let mut ledger = Ledger::open(data_file)?;

    match command {
        Commands::List => list(&ledger),
        Commands::Show { name } => {
            print_character(&ledger.character(&name)?);
            Ok(())
        }
        Commands::Add { name } => {
            ledger.add_character(&name)?;
            println!("Added {name}");
            Ok(())
        }
        Commands::Rm { name, force } => remove(&mut ledger, &name, force),
        Commands::Plus { name, coin, amount } => change(&mut ledger, &name, &coin, &amount, false),
        Commands::Minus { name, coin, amount } => change(&mut ledger, &name, &coin, &amount, true),
    }
}

fn list(ledger: &Ledger) -> Result<()> {
    let names = ledger.list_character_names();
    if names.is_empty() {
        println!("No characters yet.");
        println!("  Add one with: coin-manager add <name>");
        return Ok(());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn remove(ledger: &mut Ledger, name: &str, force: bool) -> Result<()> {
    // fail with NotFound before asking
    ledger.balances(name)?;

    if !force {
        let confirm = Confirm::new()
            .with_prompt(format!("Delete '{}'?", name))
            .default(false)
            .interact()?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    ledger.delete_character(name)?;
    println!("Deleted {name}");
    Ok(())
}

fn change(ledger: &mut Ledger, name: &str, coin: &str, amount: &str, negate: bool) -> Result<()> {
    let Some(value) = parse_amount(amount) else {
        info!(name, amount, "amount_ignored_not_a_number");
        println!("Ignoring amount {amount:?}: not a whole number.");
        return Ok(());
    };
    let delta = if negate {
        value.checked_neg().ok_or_else(|| anyhow!("amount out of range: {value}"))?
    } else {
        value
    };

    ledger.adjust_balance(name, coin, delta)?;
    print_character(&ledger.character(name)?);
    Ok(())
}

fn print_character(character: &Character) {
    println!("{}", character.name());
    for (denomination, amount) in character.balances().iter() {
        println!("  {:<10} {:>8}", denomination.key(), amount);
    }
}
