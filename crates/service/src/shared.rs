use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use models::Balances;

use crate::errors::ServiceError;
use crate::ledger::Ledger;

/// Cloneable handle for callers that share one ledger across threads.
///
/// Each mutation holds the write lock for the whole mutate-then-save cycle, so there is
/// still exactly one writer to the data file at a time.
#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self { inner: Arc::new(RwLock::new(ledger)) }
    }

    // a panicked writer either saved or rolled back, so the ledger is still consistent
    fn read(&self) -> RwLockReadGuard<'_, Ledger> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Ledger> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn list_character_names(&self) -> Vec<String> {
        self.read().list_character_names()
    }

    pub fn balances(&self, name: &str) -> Result<Balances, ServiceError> {
        self.read().balances(name)
    }

    pub fn add_character(&self, name: &str) -> Result<(), ServiceError> {
        self.write().add_character(name)
    }

    pub fn delete_character(&self, name: &str) -> Result<(), ServiceError> {
        self.write().delete_character(name)
    }

    pub fn adjust_balance(&self, name: &str, denomination: &str, delta: i64) -> Result<i64, ServiceError> {
        self.write().adjust_balance(name, denomination, delta)
    }

    pub fn load(&self) -> Result<(), ServiceError> {
        self.write().load()
    }

    pub fn save(&self) -> Result<(), ServiceError> {
        self.read().save()
    }

    /// Apply several operations under one lock acquisition.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&mut Ledger) -> R) -> R {
        f(&mut self.write())
    }
}

impl From<Ledger> for SharedLedger {
    fn from(ledger: Ledger) -> Self {
        Self::new(ledger)
    }
}
