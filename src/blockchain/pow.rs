//! Proof-of-Work puzzle.
//!
//! A proof `p` is valid against the previous proof `q` when the SHA-256 of the
//! decimal string of `p² - q²` starts with [`DIFFICULTY_PREFIX`] in lowercase
//! hex. The difference is signed: when `p < q` the string carries a leading
//! `-` and is hashed as-is, which changes which integers qualify.

use std::sync::atomic::{AtomicBool, Ordering};

use sha2::{Digest, Sha256};

use super::DIFFICULTY_PREFIX;

/// How many candidates are tested between two looks at the cancel flag.
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Decimal rendering of `proof² - previous_proof²`, computed exactly.
pub fn squared_difference(previous_proof: u64, proof: u64) -> String {
    let (p, q) = (u128::from(proof), u128::from(previous_proof));
    let (p2, q2) = (p * p, q * q);
    if p2 >= q2 {
        (p2 - q2).to_string()
    } else {
        format!("-{}", q2 - p2)
    }
}

/// Lowercase hex SHA-256 of the squared difference.
pub fn proof_digest(previous_proof: u64, proof: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(squared_difference(previous_proof, proof).as_bytes());
    hex::encode(hasher.finalize())
}

pub fn is_valid_proof(previous_proof: u64, proof: u64) -> bool {
    proof_digest(previous_proof, proof).starts_with(DIFFICULTY_PREFIX)
}

/// Smallest proof `>= 1` satisfying the puzzle against `previous_proof`.
/// The search is unbounded.
pub fn solve(previous_proof: u64) -> u64 {
    let mut proof = 1;
    while !is_valid_proof(previous_proof, proof) {
        proof += 1;
    }
    proof
}

/// Same search as [`solve`], giving up with `None` once `cancel` is raised.
pub fn solve_cancellable(previous_proof: u64, cancel: &AtomicBool) -> Option<u64> {
    let mut proof = 1;
    loop {
        if proof % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
            return None;
        }
        if is_valid_proof(previous_proof, proof) {
            return Some(proof);
        }
        proof += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_against_genesis_proof() {
        assert_eq!(solve(1), 533);
        assert!(is_valid_proof(1, 533));
        assert!(proof_digest(1, 533).starts_with("0000"));
    }

    #[test]
    fn returns_smallest_solution() {
        let p = solve(533);
        assert_eq!(p, 45293);
        assert!((1..p).all(|q| !is_valid_proof(533, q)));
    }

    #[test]
    fn negative_difference_is_hashed_with_sign() {
        assert_eq!(squared_difference(45293, 21391), "-1593880968");
        assert_eq!(solve(45293), 21391);
    }

    #[test]
    fn deterministic() {
        assert_eq!(solve(8018), solve(8018));
    }

    #[test]
    fn large_proofs_do_not_overflow() {
        let s = squared_difference(0, u64::MAX);
        assert_eq!(s, (u128::from(u64::MAX) * u128::from(u64::MAX)).to_string());
        assert!(squared_difference(u64::MAX, 0).starts_with('-'));
    }

    #[test]
    fn cancellable_search_matches_plain_search() {
        let flag = AtomicBool::new(false);
        assert_eq!(solve_cancellable(1, &flag), Some(533));
    }

    #[test]
    fn raised_flag_stops_search() {
        let flag = AtomicBool::new(true);
        // 45293 lies beyond the first check interval
        assert_eq!(solve_cancellable(533, &flag), None);
    }
}
