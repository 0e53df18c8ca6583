use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::TransactionError;

/// A transfer between two parties. No signatures and no balance checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    /// Kept as the JSON number that was submitted (integer or float) so a
    /// block re-serializes byte-for-byte on every node.
    pub amount: Number,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: Number) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }
}

/// A submission as received, before required fields are checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionDraft {
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub amount: Option<Number>,
}

impl TransactionDraft {
    pub fn into_transaction(self) -> Result<Transaction, TransactionError> {
        let sender = self.sender.ok_or(TransactionError::MissingField("sender"))?;
        let receiver = self
            .receiver
            .ok_or(TransactionError::MissingField("receiver"))?;
        let amount = self.amount.ok_or(TransactionError::MissingField("amount"))?;
        Ok(Transaction::new(sender, receiver, amount))
    }
}
