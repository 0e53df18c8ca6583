use super::Block;
use super::block::fingerprint;
use super::pow::is_valid_proof;
use crate::error::ChainError;
use crate::transaction::Transaction;

/// In-memory, append-only chain. Never empty: the genesis block is seeded on
/// construction and only a wholesale [`Blockchain::replace`] can swap it out.
#[derive(Debug)]
pub struct Blockchain {
    chain: Vec<Block>,
}

impl Blockchain {
    /// Initialize a new chain with a genesis block.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
        }
    }

    /// Append a block at `len + 1` and return it.
    pub fn create_block(
        &mut self,
        proof: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
    ) -> &Block {
        let index = self.chain.len() as u64 + 1;
        self.chain
            .push(Block::new(index, proof, previous_hash, transactions));
        self.tip()
    }

    /// Return the last block in the chain.
    pub fn tip(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Swap the whole chain for `candidate`.
    pub fn replace(&mut self, candidate: Vec<Block>) -> Result<(), ChainError> {
        if candidate.is_empty() {
            return Err(ChainError::Empty);
        }
        self.chain = candidate;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        is_chain_valid(&self.chain)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate any chain from genesis forward: linkage and PoW for blocks 2..N.
/// The first block is taken as-is; empty and single-block chains are valid.
pub fn is_chain_valid(chain: &[Block]) -> bool {
    chain.windows(2).all(|pair| {
        let (prev, current) = (&pair[0], &pair[1]);
        current.previous_hash == fingerprint(prev) && is_valid_proof(prev.proof, current.proof)
    })
}
