pub mod client;
pub mod consensus;
pub mod peers;

pub use client::{HttpPeerClient, PeerChain, PeerClient};
pub use consensus::{Candidate, LengthPolicy, select_longest};
pub use peers::PeerRegistry;
