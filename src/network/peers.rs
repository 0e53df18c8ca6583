use std::collections::BTreeSet;

use reqwest::Url;

use crate::error::PeerError;

/// Known peers, keyed by `host[:port]`. Iteration is lexicographic, which is
/// also the order reconciliation considers candidates in.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: BTreeSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self {
            peers: BTreeSet::new(),
        }
    }

    /// Register `address`. Returns `false` when the authority was already known.
    pub fn add_peer(&mut self, address: &str) -> Result<bool, PeerError> {
        Ok(self.peers.insert(parse_authority(address)?))
    }

    pub fn list(&self) -> Vec<String> {
        self.peers.iter().cloned().collect()
    }
}

/// Reduce an address to its `host[:port]` authority. The scheme is optional
/// (`http` is assumed); path, query and fragment are dropped. A port written
/// in the address is kept even when it is the scheme's default.
pub fn parse_authority(address: &str) -> Result<String, PeerError> {
    let trimmed = address.trim();
    let invalid = |reason: String| PeerError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    let url = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("http://{trimmed}"))
    }
    .map_err(|e| invalid(e.to_string()))?;

    let host = match url.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return Err(invalid("no host".into())),
    };

    // `Url::port` hides default ports, so look at what was actually written
    let written = trimmed.split_once("://").map_or(trimmed, |(_, rest)| rest);
    let written = written.split(['/', '?', '#']).next().unwrap_or_default();
    let port = if has_explicit_port(written) {
        url.port_or_known_default()
    } else {
        url.port()
    };

    Ok(match port {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn has_explicit_port(authority: &str) -> bool {
    authority.rsplit_once(':').is_some_and(|(_, port)| {
        !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_and_path() {
        assert_eq!(
            parse_authority("http://127.0.0.1:5001/").unwrap(),
            "127.0.0.1:5001"
        );
        assert_eq!(
            parse_authority("https://node.example:8443/get_chain?x=1").unwrap(),
            "node.example:8443"
        );
        assert_eq!(parse_authority("https://node:443/").unwrap(), "node:443");
        assert_eq!(parse_authority("http://node:80").unwrap(), "node:80");
        assert_eq!(parse_authority("http://node/").unwrap(), "node");
        assert_eq!(parse_authority("[::1]:5001").unwrap(), "[::1]:5001");
    }

    #[test]
    fn scheme_is_optional() {
        assert_eq!(parse_authority("127.0.0.1:5002").unwrap(), "127.0.0.1:5002");
        assert_eq!(parse_authority("localhost:5003").unwrap(), "localhost:5003");
    }

    #[test]
    fn rejects_addresses_without_host() {
        assert!(matches!(
            parse_authority("http://"),
            Err(PeerError::InvalidAddress { .. })
        ));
        assert!(parse_authority("").is_err());
    }

    #[test]
    fn deduplicates_by_authority() {
        let mut reg = PeerRegistry::new();
        assert!(reg.add_peer("http://127.0.0.1:5001/").unwrap());
        assert!(!reg.add_peer("127.0.0.1:5001").unwrap());
        assert!(!reg.add_peer("http://127.0.0.1:5001/get_chain").unwrap());
        assert!(reg.add_peer("http://127.0.0.1:5002").unwrap());

        assert_eq!(reg.list(), vec!["127.0.0.1:5001", "127.0.0.1:5002"]);
    }

    #[test]
    fn default_ports_stay_distinct_peers() {
        let mut reg = PeerRegistry::new();
        assert!(reg.add_peer("https://node:443").unwrap());
        assert!(reg.add_peer("http://node:80").unwrap());
        assert!(!reg.add_peer("node:443").unwrap());
        assert_eq!(reg.list(), vec!["node:443", "node:80"]);
    }
}
