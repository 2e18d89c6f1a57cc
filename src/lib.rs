//! Builds the Slovenian eDavki Doh_KDVP (capital gains) declaration from a
//! broker's gains-and-losses statement.

pub mod config;
pub mod decimal;
pub mod error;
pub mod inventory;
pub mod kdvp;
pub mod ledger;
pub mod parser;
pub mod service;

pub use crate::error::{Error, Result};
