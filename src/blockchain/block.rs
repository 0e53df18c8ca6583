use std::io;

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::ser::Formatter;
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// A single block in the chain holding the transactions drained from the pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String, // local time, informational only
    pub proof: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self::new(
            1,
            super::GENESIS_PROOF,
            super::GENESIS_PREVIOUS_HASH.to_string(),
            Vec::new(),
        )
    }

    /// Create a block stamped with the current local time.
    pub fn new(
        index: u64,
        proof: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self::new_with_timestamp(index, proof, previous_hash, transactions, now_timestamp())
    }

    pub fn new_with_timestamp(
        index: u64,
        proof: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
        timestamp: String,
    ) -> Self {
        Self {
            index,
            timestamp,
            proof,
            previous_hash,
            transactions,
        }
    }

    /// SHA-256 of the canonical serialization, lowercase hex.
    pub fn fingerprint(&self) -> String {
        fingerprint(self)
    }
}

/// `YYYY-MM-DD HH:MM:SS.ffffff` in local time.
pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Fingerprint a block. Mining and validation must both go through here,
/// otherwise a freshly mined `previous_hash` would not match what a
/// validator recomputes.
pub fn fingerprint(block: &Block) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_json(block));
    hex::encode(hasher.finalize())
}

/// Serialize a block with sorted keys and the separators/escaping of
/// Python's `json.dumps(block, sort_keys=True)`, so fingerprints agree
/// byte-for-byte with every other node on the network.
pub fn canonical_json(block: &Block) -> Vec<u8> {
    let mut value = serde_json::to_value(block).expect("block serializes to JSON");
    value.sort_all_objects();

    let mut out = Vec::with_capacity(256);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedAsciiFormatter);
    value
        .serialize(&mut ser)
        .expect("writing JSON into a Vec cannot fail");
    out
}

/// `", "` / `": "` separators, `\uXXXX` escapes for anything outside
/// printable ASCII and floats written like Python's `repr`.
struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if (' '..='~').contains(&ch) {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(python_float_repr(value).as_bytes())
    }
}

/// Shortest round-trip digits, laid out the way Python prints floats:
/// positional for decimal exponents in `-4..16` (always with a fractional
/// part), otherwise `d.ddde+XX` with a signed exponent of at least two digits.
fn python_float_repr(value: f64) -> String {
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };

    if !(-4..16).contains(&exponent) {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}e{exp_sign}{:02}", exponent.abs());
    }

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        return format!("{sign}0.{zeros}{digits}");
    }

    let point = exponent as usize + 1;
    if digits.len() <= point {
        format!("{sign}{digits}{}.0", "0".repeat(point - digits.len()))
    } else {
        format!("{sign}{}.{}", &digits[..point], &digits[point..])
    }
}
