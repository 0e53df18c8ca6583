use std::time::Duration;

use thiserror::Error;

/// Rejected transaction submissions. Nothing is mutated when these occur.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Some elements of the transaction are missing: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("refusing to replace the chain with an empty one")]
    Empty,
}

/// Failures talking to, or registering, a peer.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("invalid peer address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("request to peer {peer} failed: {source}")]
    Request {
        peer: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("peer {peer} answered with status {status}")]
    Status { peer: String, status: u16 },

    #[error("peer {peer} did not answer within {timeout:?}")]
    Timeout { peer: String, timeout: Duration },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("mining cancelled before a proof was found")]
    MiningCancelled,

    #[error("mining gave up after {0:?}")]
    MiningTimedOut(Duration),

    #[error("proof search worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}
