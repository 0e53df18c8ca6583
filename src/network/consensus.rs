//! Longest-valid-chain selection.
//!
//! Candidates are scanned in registry order. A candidate survives only if it
//! is strictly longer than the best seen so far (starting from the local
//! length) and passes [`is_chain_valid`], so the first of several equally long
//! chains wins. Unreachable peers and invalid chains are dropped the same way.

use log::{debug, warn};

use super::client::PeerChain;
use crate::blockchain::{Block, is_chain_valid};
use crate::error::PeerError;

/// Which length to believe for a peer's chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthPolicy {
    /// Count the blocks actually returned.
    #[default]
    Counted,
    /// Use the peer's self-reported `length` field, as legacy nodes do.
    Reported,
}

impl LengthPolicy {
    fn length_of(self, peer: &str, response: &PeerChain) -> usize {
        let counted = response.chain.len();
        if counted != response.length {
            warn!(
                "CONSENSUS - {} reports length {} but returned {} blocks",
                peer, response.length, counted
            );
        }
        match self {
            LengthPolicy::Counted => counted,
            LengthPolicy::Reported => response.length,
        }
    }
}

/// The chain chosen among peer responses, with the length it was judged by.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub peer: String,
    pub length: usize,
    pub chain: Vec<Block>,
}

/// Pick the longest valid chain strictly longer than `local_length`.
pub fn select_longest(
    local_length: usize,
    responses: Vec<(String, Result<PeerChain, PeerError>)>,
    policy: LengthPolicy,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    let mut max_length = local_length;

    for (peer, response) in responses {
        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!("CONSENSUS - peer {} discarded: {}", peer, e);
                continue;
            }
        };

        let length = policy.length_of(&peer, &response);
        if length <= max_length {
            debug!(
                "CONSENSUS - peer {} not longer ({} <= {})",
                peer, length, max_length
            );
            continue;
        }
        if !is_chain_valid(&response.chain) {
            warn!("CONSENSUS - peer {} discarded: invalid chain", peer);
            continue;
        }

        max_length = length;
        best = Some(Candidate {
            peer,
            length,
            chain: response.chain,
        });
    }

    best
}
