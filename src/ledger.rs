//! One node's ledger: the chain and pending pool behind a single lock, plus
//! the registered peers.
//!
//! Mining solves the puzzle on the blocking pool without holding the lock and
//! only re-locks to commit. The commit checks that the tip it solved against
//! is still the tip, then drains the pool and appends in one step, so a
//! transaction submitted mid-search lands either in this block or the next.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::join_all;
use log::{debug, info, warn};
use tokio::task::spawn_blocking;
use tokio::time::timeout;

use crate::blockchain::{Block, Blockchain, is_chain_valid, pow};
use crate::config::LedgerSettings;
use crate::error::{LedgerError, PeerError};
use crate::network::peers::parse_authority;
use crate::network::{PeerClient, PeerRegistry, select_longest};
use crate::transaction::{Transaction, TransactionPool};

#[derive(Debug, Default)]
struct LedgerState {
    chain: Blockchain,
    pool: TransactionPool,
}

/// Outcome of a reconciliation round.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub replaced: bool,
    pub chain: Vec<Block>,
}

/// Raises the search's cancel flag when the mining future finishes or is
/// dropped, so an abandoned request stops the blocking search.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug, Default)]
pub struct Ledger {
    state: Mutex<LedgerState>,
    peers: Mutex<PeerRegistry>,
    settings: LedgerSettings,
}

impl Ledger {
    pub fn new(settings: LedgerSettings) -> Self {
        Self {
            state: Mutex::new(LedgerState::default()),
            peers: Mutex::new(PeerRegistry::new()),
            settings,
        }
    }

    // Every mutation is a single assignment or push, so a poisoned lock still
    // guards a consistent chain and pool.
    fn state(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn peer_registry(&self) -> MutexGuard<'_, PeerRegistry> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the committed chain.
    pub fn chain(&self) -> Vec<Block> {
        self.state().chain.blocks().to_vec()
    }

    pub fn len(&self) -> usize {
        self.state().chain.len()
    }

    pub fn tip(&self) -> Block {
        self.state().chain.tip().clone()
    }

    /// Validate the local chain. Hashing happens outside the lock.
    pub fn is_valid(&self) -> bool {
        is_chain_valid(&self.chain())
    }

    /// Queue a transaction and return the index of the block it is expected
    /// to land in. Advisory only: the slot is not reserved.
    pub fn add_transaction(&self, transaction: Transaction) -> u64 {
        let mut state = self.state();
        debug!(
            "POOL - queued {} -> {} ({})",
            transaction.sender, transaction.receiver, transaction.amount
        );
        state.pool.add(transaction);
        state.chain.tip().index + 1
    }

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.state().pool.pending().to_vec()
    }

    /// Register every address or none of them. Returns the full peer list.
    pub fn register_peers<I, S>(&self, addresses: I) -> Result<Vec<String>, PeerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let authorities = addresses
            .into_iter()
            .map(|a| parse_authority(a.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut registry = self.peer_registry();
        for authority in authorities {
            if registry.add_peer(&authority)? {
                info!("PEERS - registered {}", authority);
            }
        }
        Ok(registry.list())
    }

    pub fn peers(&self) -> Vec<String> {
        self.peer_registry().list()
    }

    /// Mine one block on top of the current tip, however long it takes.
    pub async fn mine(&self) -> Result<Block, LedgerError> {
        self.mine_until(Arc::new(AtomicBool::new(false))).await
    }

    /// Mine one block, giving up (and stopping the search) after `limit`.
    pub async fn mine_with_timeout(&self, limit: Duration) -> Result<Block, LedgerError> {
        match timeout(limit, self.mine()).await {
            Ok(result) => result,
            Err(_) => {
                warn!("MINER - no proof found within {:?}, search stopped", limit);
                Err(LedgerError::MiningTimedOut(limit))
            }
        }
    }

    /// Mine until a block is committed or `cancel` is raised. Dropping the
    /// returned future raises `cancel`.
    pub async fn mine_until(&self, cancel: Arc<AtomicBool>) -> Result<Block, LedgerError> {
        let _guard = CancelOnDrop(Arc::clone(&cancel));
        loop {
            let (previous_proof, previous_hash) = {
                let state = self.state();
                let tip = state.chain.tip();
                (tip.proof, tip.fingerprint())
            };

            let flag = Arc::clone(&cancel);
            let proof = spawn_blocking(move || pow::solve_cancellable(previous_proof, &flag))
                .await?
                .ok_or(LedgerError::MiningCancelled)?;

            match self.commit_block(proof, previous_hash) {
                Some(block) => return Ok(block),
                None => debug!("MINER - tip moved while solving, retrying on the new tip"),
            }
        }
    }

    /// Append a block for `proof` if the tip is still the one it was solved
    /// against. Drains the pool into the block.
    fn commit_block(&self, proof: u64, previous_hash: String) -> Option<Block> {
        let mut state = self.state();
        if state.chain.tip().fingerprint() != previous_hash {
            return None;
        }

        if let Some(reward) = &self.settings.reward {
            state.pool.add(reward.transaction());
        }
        let transactions = state.pool.drain_all();
        let block = state
            .chain
            .create_block(proof, previous_hash, transactions)
            .clone();
        info!(
            "MINER - sealed block #{} (proof={}, txs={})",
            block.index,
            block.proof,
            block.transactions.len()
        );
        Some(block)
    }

    /// Ask every peer for its chain and adopt the longest valid one if it
    /// beats the local chain. Failed or invalid peers are skipped.
    pub async fn reconcile<C: PeerClient>(&self, client: &C) -> Reconciliation {
        let peers = self.peers();
        let local_length = self.len();
        if peers.is_empty() {
            debug!("CONSENSUS - no peers registered");
            return Reconciliation {
                replaced: false,
                chain: self.chain(),
            };
        }

        let responses = join_all(peers.into_iter().map(|peer| async move {
            let response = client.fetch_chain(&peer).await;
            (peer, response)
        }))
        .await;

        let candidate = select_longest(local_length, responses, self.settings.length_policy);

        let mut state = self.state();
        let replaced = match candidate {
            Some(candidate) if candidate.length > state.chain.len() => {
                let peer = candidate.peer;
                let length = candidate.length;
                match state.chain.replace(candidate.chain) {
                    Ok(()) => {
                        info!(
                            "CONSENSUS - adopted chain of length {} from {}",
                            length, peer
                        );
                        true
                    }
                    Err(e) => {
                        warn!("CONSENSUS - chain from {} not adopted: {}", peer, e);
                        false
                    }
                }
            }
            Some(candidate) => {
                debug!(
                    "CONSENSUS - local chain grew to {} meanwhile, keeping it over {}",
                    state.chain.len(),
                    candidate.peer
                );
                false
            }
            None => false,
        };

        Reconciliation {
            replaced,
            chain: state.chain.blocks().to_vec(),
        }
    }
}
