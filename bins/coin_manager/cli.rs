use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coin-manager")]
#[command(author, version, about = "Track copper, silver, gold and platinum per character")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data file holding every character's balances (overrides the config)
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// TOML config file (defaults to $CONFIG_PATH, then ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List characters
    #[command(alias = "ls")]
    List,

    /// Show a character's balances
    Show {
        /// Character name
        name: String,
    },

    /// Add a character with empty purses
    Add {
        /// Character name
        name: String,
    },

    /// Remove a character
    Rm {
        /// Character name
        name: String,

        /// Remove without confirmation
        #[arg(long, short)]
        force: bool,
    },

    /// Add coins to a character
    Plus {
        /// Character name
        name: String,

        /// copper, silver, gold or platinum
        coin: String,

        /// Whole number of coins; anything else is ignored
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Take coins from a character (balances may go negative)
    Minus {
        /// Character name
        name: String,

        /// copper, silver, gold or platinum
        coin: String,

        /// Whole number of coins; anything else is ignored
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
}
