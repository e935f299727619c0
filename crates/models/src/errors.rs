use thiserror::Error;

use crate::denomination::Denomination;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    #[error("invalid denomination: {0}")]
    InvalidDenomination(String),
    #[error("{denomination} balance overflow: {current} + {delta}")]
    Overflow {
        denomination: Denomination,
        current: i64,
        delta: i64,
    },
}
