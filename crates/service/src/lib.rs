//! Service layer for the coin ledger.
//! - `ledger`: the character store, persisted after every mutation.
//! - `shared`: a lock-guarded handle for callers on several threads.
//! - `storage`: the JSON file-backed map the ledger writes through.
//! - `amount`: parsing of user-typed amounts.
//! - `errors`: the error taxonomy every operation reports.

pub mod amount;
pub mod errors;
pub mod ledger;
pub mod shared;
pub mod storage;

pub use amount::parse_amount;
pub use errors::ServiceError;
pub use ledger::{Ledger, DEFAULT_DATA_FILE};
pub use shared::SharedLedger;
