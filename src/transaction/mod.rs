pub mod model;
pub mod pool;

pub use model::{Transaction, TransactionDraft};
pub use pool::TransactionPool;
