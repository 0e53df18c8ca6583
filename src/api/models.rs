use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::blockchain::Block;
use crate::config::NodeConfig;
use crate::ledger::Ledger;
use crate::network::HttpPeerClient;
use crate::transaction::Transaction;

/// Shared application state: this node's ledger and the client used to reach
/// its peers.
pub struct AppState {
    pub ledger: Ledger,
    pub peer_client: HttpPeerClient,
    pub mine_timeout: Option<Duration>,
}

impl AppState {
    pub fn from_config(config: &NodeConfig) -> Self {
        Self {
            ledger: Ledger::new(config.ledger.clone()),
            peer_client: HttpPeerClient::new(config.peer_timeout),
            mine_timeout: config.mine_timeout,
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub timestamp: String,
    pub proof: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl From<Block> for MineResponse {
    fn from(block: Block) -> Self {
        Self {
            message: "Congratulations, you just mined a block!".into(),
            index: block.index,
            timestamp: block.timestamp,
            proof: block.proof,
            previous_hash: block.previous_hash,
            transactions: block.transactions,
        }
    }
}

/// Same shape as [`crate::network::PeerChain`], which is how peers read it.
#[derive(Serialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Serialize, Deserialize)]
pub struct ValidateResponse {
    pub message: String,
    pub valid: bool,
}

/* ---------- TX API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize, Deserialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct ConnectNodeRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize, Deserialize)]
pub struct ConnectNodeResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ReplaceChainResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_chain: Option<Vec<Block>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_chain: Option<Vec<Block>>,
}
