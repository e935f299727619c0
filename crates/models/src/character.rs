use serde::{Deserialize, Serialize};

use crate::denomination::Denomination;
use crate::errors::ModelError;

/// The four coin counters held by one character.
///
/// Serialized as `{"copper": n, "silver": n, "gold": n, "platinum": n}`. A missing key loads
/// as zero; any other key is rejected so the key set stays exactly the four denominations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Balances {
    #[serde(default)]
    pub copper: i64,
    #[serde(default)]
    pub silver: i64,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub platinum: i64,
}

impl Balances {
    pub fn new(copper: i64, silver: i64, gold: i64, platinum: i64) -> Self {
        Self { copper, silver, gold, platinum }
    }

    pub fn get(&self, denomination: Denomination) -> i64 {
        match denomination {
            Denomination::Copper => self.copper,
            Denomination::Silver => self.silver,
            Denomination::Gold => self.gold,
            Denomination::Platinum => self.platinum,
        }
    }

    fn slot_mut(&mut self, denomination: Denomination) -> &mut i64 {
        match denomination {
            Denomination::Copper => &mut self.copper,
            Denomination::Silver => &mut self.silver,
            Denomination::Gold => &mut self.gold,
            Denomination::Platinum => &mut self.platinum,
        }
    }

    /// Add a signed `delta` to one balance and return the new amount.
    ///
    /// Balances may go negative. A result outside `i64` is rejected and the balance is
    /// left unchanged.
    pub fn adjust(&mut self, denomination: Denomination, delta: i64) -> Result<i64, ModelError> {
        let slot = self.slot_mut(denomination);
        let next = slot.checked_add(delta).ok_or(ModelError::Overflow {
            denomination,
            current: *slot,
            delta,
        })?;
        *slot = next;
        Ok(next)
    }

    /// Iterate `(denomination, amount)` pairs, lowest value first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, i64)> + '_ {
        Denomination::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

/// A named character and its coin balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    name: String,
    balances: Balances,
}

impl Character {
    /// Create a character with every balance at zero. The name is not validated here.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_balances(name, Balances::default())
    }

    pub fn with_balances(name: impl Into<String>, balances: Balances) -> Self {
        Self { name: name.into(), balances }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    /// Add a signed `delta` to one balance; see [`Balances::adjust`].
    pub fn adjust(&mut self, denomination: Denomination, delta: i64) -> Result<i64, ModelError> {
        self.balances.adjust(denomination, delta)
    }

    /// Same as [`Character::adjust`] but takes the denomination key as text.
    pub fn adjust_by_key(&mut self, key: &str, delta: i64) -> Result<i64, ModelError> {
        self.adjust(key.parse()?, delta)
    }
}
