//! Domain types for tracking coin balances per character.
//! - `Denomination`: the fixed set of coin units.
//! - `Character` / `Balances`: one named character and its four counters.
//! - `CharacterName`: a validated, non-blank character name.
//! - `ModelError`: validation failures raised by the types above.

pub mod character;
pub mod denomination;
pub mod errors;
pub mod name;

pub use character::{Balances, Character};
pub use denomination::Denomination;
pub use errors::ModelError;
pub use name::CharacterName;
