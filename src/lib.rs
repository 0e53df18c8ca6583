//! A proof-of-work ledger node with longest-valid-chain consensus among
//! manually registered peers.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod ledger;
pub mod network;
pub mod transaction;

pub use ledger::{Ledger, Reconciliation};
