pub mod block;
pub mod model;
pub mod pow;

pub use block::{Block, fingerprint};
pub use model::{Blockchain, is_chain_valid};

/// Required hex prefix of a valid proof digest. Fixed, never adjusted.
pub const DIFFICULTY_PREFIX: &str = "0000";

/// Proof carried by the genesis block.
pub const GENESIS_PROOF: u64 = 1;

/// `previous_hash` of the genesis block, which has no predecessor.
pub const GENESIS_PREVIOUS_HASH: &str = "0";
