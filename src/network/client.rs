use std::future::Future;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use crate::blockchain::Block;
use crate::error::PeerError;

/// What a peer answers on `GET /get_chain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Fetches a peer's full chain. Implementations must bound the call in time.
pub trait PeerClient: Send + Sync {
    fn fetch_chain(
        &self,
        authority: &str,
    ) -> impl Future<Output = Result<PeerChain, PeerError>> + Send;
}

/// Queries peers over HTTP at `http://{authority}/get_chain`.
#[derive(Debug, Clone)]
pub struct HttpPeerClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPeerClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    async fn request(&self, authority: &str) -> Result<PeerChain, PeerError> {
        let url = format!("http://{authority}/get_chain");
        let request_failed = |source| PeerError::Request {
            peer: authority.to_string(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(request_failed)?;
        let status = response.status();
        if !status.is_success() {
            return Err(PeerError::Status {
                peer: authority.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.json::<PeerChain>().await.map_err(request_failed)?;
        debug!(
            "CONSENSUS - {} returned {} blocks (reported length {})",
            authority,
            body.chain.len(),
            body.length
        );
        Ok(body)
    }
}

impl PeerClient for HttpPeerClient {
    async fn fetch_chain(&self, authority: &str) -> Result<PeerChain, PeerError> {
        timeout(self.timeout, self.request(authority))
            .await
            .map_err(|_| PeerError::Timeout {
                peer: authority.to_string(),
                timeout: self.timeout,
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn unreachable_peer_is_an_error() {
        let client = HttpPeerClient::new(Duration::from_secs(2));
        // port 1 (tcpmux) is never served in test environments
        let result = client.fetch_chain("127.0.0.1:1").await;
        assert!(matches!(
            result,
            Err(PeerError::Request { .. }) | Err(PeerError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn silent_peer_times_out() {
        // accepts the connection and never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let silent = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let client = HttpPeerClient::new(Duration::from_millis(300));
        let started = Instant::now();
        let result = client.fetch_chain(&addr.to_string()).await;

        assert!(matches!(result, Err(PeerError::Timeout { .. })));
        assert!(started.elapsed() >= Duration::from_millis(300));
        assert!(started.elapsed() < Duration::from_secs(5));
        silent.abort();
    }
}
