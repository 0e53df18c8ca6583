use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde_json::Number;
use uuid::Uuid;

use crate::error::ConfigError;
use crate::network::LengthPolicy;
use crate::transaction::Transaction;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PEER_TIMEOUT_SECS: u64 = 5;

/// Paid to the configured receiver by this node in every block it mines.
#[derive(Debug, Clone, PartialEq)]
pub struct MiningReward {
    pub sender: String,
    pub receiver: String,
    pub amount: Number,
}

impl MiningReward {
    pub fn transaction(&self) -> Transaction {
        Transaction::new(self.sender.clone(), self.receiver.clone(), self.amount.clone())
    }
}

/// The knobs the ledger itself cares about.
#[derive(Debug, Clone, Default)]
pub struct LedgerSettings {
    pub length_policy: LengthPolicy,
    pub reward: Option<MiningReward>,
}

/// Node configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub node_id: String,
    pub peer_timeout: Duration,
    /// `None` lets a proof search run for as long as it takes.
    pub mine_timeout: Option<Duration>,
    pub ledger: LedgerSettings,
}

impl NodeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let node_id = lookup("NODE_ID").unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        let peer_timeout = Duration::from_secs(parse_or(
            &lookup,
            "PEER_TIMEOUT_SECS",
            DEFAULT_PEER_TIMEOUT_SECS,
        )?);
        let mine_timeout = match lookup("MINE_TIMEOUT_SECS") {
            Some(v) => Some(Duration::from_secs(parse("MINE_TIMEOUT_SECS", &v)?)),
            None => None,
        };
        let length_policy = if parse_or(&lookup, "TRUST_REPORTED_LENGTH", false)? {
            LengthPolicy::Reported
        } else {
            LengthPolicy::Counted
        };

        let reward = match lookup("REWARD_RECEIVER") {
            Some(receiver) => {
                let amount = match lookup("REWARD_AMOUNT") {
                    Some(v) => serde_json::from_str::<Number>(&v).map_err(|_| {
                        ConfigError::Invalid {
                            key: "REWARD_AMOUNT",
                            value: v.clone(),
                        }
                    })?,
                    None => Number::from(1),
                };
                Some(MiningReward {
                    sender: node_id.clone(),
                    receiver,
                    amount,
                })
            }
            None => None,
        };

        Ok(Self {
            host,
            port,
            node_id,
            peer_timeout,
            mine_timeout,
            ledger: LedgerSettings {
                length_policy,
                reward,
            },
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => parse(key, &v),
        None => Ok(default),
    }
}
