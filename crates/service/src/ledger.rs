use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use models::{Balances, Character, CharacterName, Denomination};
use tracing::{debug, info, warn};

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

/// File name used when no data file is configured.
pub const DEFAULT_DATA_FILE: &str = "data.json";

/// In-memory map of character name to coin balances, persisted after every mutation.
///
/// The ledger is bound to one data file (`path`). `load`/`save` use it; `load_from`/`save_to`
/// take an explicit path without rebinding. A mutation that fails validation is never saved,
/// and a mutation whose save fails is undone, so the in-memory map always matches what was
/// last written.
#[derive(Debug, Clone)]
pub struct Ledger {
    store: JsonMapStore<CharacterName, Balances>,
}

impl Ledger {
    /// Empty ledger bound to `path`. Nothing is read until [`Ledger::load`].
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { store: JsonMapStore::new(path) }
    }

    /// Ledger bound to `path` and hydrated from it. A missing file yields an empty ledger.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        let mut ledger = Self::new(path);
        ledger.load()?;
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn load(&mut self) -> Result<(), ServiceError> {
        self.store.reload()?;
        info!(path = %self.path().display(), characters = self.len(), "ledger_loaded");
        Ok(())
    }

    /// Replace every character with the contents of `path`. The bound path is unchanged.
    pub fn load_from(&mut self, path: impl AsRef<Path>) -> Result<(), ServiceError> {
        let path = path.as_ref();
        self.store.load_from(path)?;
        info!(path = %path.display(), characters = self.len(), "ledger_loaded");
        Ok(())
    }

    pub fn save(&self) -> Result<(), ServiceError> {
        self.store.save()
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ServiceError> {
        self.store.save_to(path.as_ref())
    }

    /// Character names in ascending order.
    pub fn list_character_names(&self) -> Vec<String> {
        self.store.keys().map(|name| name.to_string()).collect()
    }

    /// Every character with its balances, in name order.
    pub fn characters(&self) -> impl Iterator<Item = Character> + '_ {
        self.store.iter().map(|(name, balances)| Character::with_balances(name.as_str(), *balances))
    }

    pub fn character(&self, name: &str) -> Result<Character, ServiceError> {
        self.balances(name).map(|balances| Character::with_balances(name, balances))
    }

    pub fn balances(&self, name: &str) -> Result<Balances, ServiceError> {
        debug!(name, "balances_lookup");
        self.store
            .get(name)
            .copied()
            .ok_or_else(|| ServiceError::not_found(&format!("character {name:?}")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Add a character with every balance at zero and persist.
    pub fn add_character(&mut self, name: &str) -> Result<(), ServiceError> {
        let key = CharacterName::new(name).map_err(|e| {
            warn!(name, "character_add_rejected_blank");
            ServiceError::from(e)
        })?;
        self.store.update_map(|map| match map.entry(key) {
            Entry::Occupied(e) => {
                warn!(name = %e.key(), "character_add_rejected_duplicate");
                Err(ServiceError::DuplicateName(e.key().to_string()))
            }
            Entry::Vacant(e) => {
                e.insert(Balances::default());
                Ok(())
            }
        })?;
        info!(name, "character_added");
        Ok(())
    }

    /// Remove a character and persist.
    pub fn delete_character(&mut self, name: &str) -> Result<(), ServiceError> {
        self.store.update_map(|map| {
            map.remove(name)
                .map(|_| ())
                .ok_or_else(|| ServiceError::not_found(&format!("character {name:?}")))
        })?;
        info!(name, "character_deleted");
        Ok(())
    }

    /// Add a signed `delta` to one of a character's balances, persist, and return the new
    /// amount. The character is looked up before the denomination key is checked.
    pub fn adjust_balance(&mut self, name: &str, denomination: &str, delta: i64) -> Result<i64, ServiceError> {
        let amount = self.store.update_map(|map| {
            let balances = map
                .get_mut(name)
                .ok_or_else(|| ServiceError::not_found(&format!("character {name:?}")))?;
            let denomination: Denomination = denomination.parse()?;
            Ok(balances.adjust(denomination, delta)?)
        });
        match &amount {
            Ok(value) => info!(name, denomination, delta, balance = value, "balance_adjusted"),
            Err(e) => warn!(name, denomination, delta, error = %e, "balance_adjust_rejected"),
        }
        amount
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}
