//! # Vivarium Genome
//!
//! Creature genome container and the text codecs used to exchange one.
//!
//! A genome is an opaque byte payload. Two printable renderings are
//! supported: standard padded base-64, and a base-60 form whose alphabet
//! drops the look-alike symbols `O` and `l`. Base-60 encodings have one
//! canonical width per byte length, so every genome of a given size
//! renders at the same width and round-trips exactly.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Byte length of a default genome.
pub const DEFAULT_GENOME_LEN: usize = 16;

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

// 0-9, A-Z without O, a-z without l.
const BASE60_ALPHABET: &[u8; 60] =
    b"0123456789ABCDEFGHIJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Decoding failures for the genome text codecs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    /// A symbol outside the codec alphabet.
    #[error("invalid symbol {symbol:?} at position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    /// An encoding length no genome can produce.
    #[error("invalid encoding length: {0}")]
    InvalidLength(usize),

    /// The encoded value does not fit the byte length its width implies.
    #[error("encoded value exceeds {0} bytes")]
    Overflow(usize),
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Opaque creature genome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genome {
    bytes: Vec<u8>,
}

impl Genome {
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Deterministically fills `length` bytes from a seeded ChaCha8 stream.
    #[must_use]
    pub fn from_seed(seed: u64, length: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut bytes = vec![0u8; length];
        rng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// SHA-256 digest of the payload, hex encoded.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

// ----------------------------------------------------------------------
// Base-64
// ----------------------------------------------------------------------

#[must_use]
pub fn to_base64(genome: &Genome) -> String {
    let bytes = genome.bytes();
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let b0 = u32::from(chunk[0]);
        let b1 = u32::from(chunk.get(1).copied().unwrap_or(0));
        let b2 = u32::from(chunk.get(2).copied().unwrap_or(0));
        let triple = (b0 << 16) | (b1 << 8) | b2;
        out.push(BASE64_ALPHABET[(triple >> 18) as usize & 63] as char);
        out.push(BASE64_ALPHABET[(triple >> 12) as usize & 63] as char);
        if chunk.len() > 1 {
            out.push(BASE64_ALPHABET[(triple >> 6) as usize & 63] as char);
        } else {
            out.push('=');
        }
        if chunk.len() > 2 {
            out.push(BASE64_ALPHABET[triple as usize & 63] as char);
        } else {
            out.push('=');
        }
    }
    out
}

pub fn from_base64(text: &str) -> Result<Genome> {
    if text.len() % 4 != 0 {
        return Err(CodecError::InvalidLength(text.len()));
    }
    let stripped = text
        .strip_suffix("==")
        .or_else(|| text.strip_suffix('='))
        .unwrap_or(text);
    let mut acc = 0u32;
    let mut pending_bits = 0u32;
    let mut bytes = Vec::with_capacity(stripped.len() * 3 / 4 + 2);
    for (position, symbol) in stripped.char_indices() {
        let value = symbol_value(BASE64_ALPHABET, symbol)
            .ok_or(CodecError::InvalidSymbol { symbol, position })?;
        acc = (acc << 6) | u32::from(value);
        pending_bits += 6;
        if pending_bits >= 8 {
            pending_bits -= 8;
            bytes.push((acc >> pending_bits) as u8);
        }
    }
    Ok(Genome::from_bytes(bytes))
}

// ----------------------------------------------------------------------
// Base-60
// ----------------------------------------------------------------------

#[must_use]
pub fn to_base60(genome: &Genome) -> String {
    let digits = base_convert(genome.bytes(), 256, 60);
    let width = base60_width(genome.len());
    let mut out = String::with_capacity(width);
    for _ in digits.len()..width {
        out.push(BASE60_ALPHABET[0] as char);
    }
    for digit in digits {
        out.push(BASE60_ALPHABET[digit as usize] as char);
    }
    out
}

pub fn from_base60(text: &str) -> Result<Genome> {
    let mut digits = Vec::with_capacity(text.len());
    for (position, symbol) in text.char_indices() {
        let value = symbol_value(BASE60_ALPHABET, symbol)
            .ok_or(CodecError::InvalidSymbol { symbol, position })?;
        digits.push(value);
    }
    let width = digits.len();
    let byte_len = base60_byte_len(width);
    if base60_width(byte_len) != width {
        return Err(CodecError::InvalidLength(width));
    }
    let bytes = base_convert(&digits, 60, 256);
    if bytes.len() > byte_len {
        return Err(CodecError::Overflow(byte_len));
    }
    let mut out = vec![0u8; byte_len - bytes.len()];
    out.extend(bytes);
    Ok(Genome::from_bytes(out))
}

/// Canonical base-60 width for a payload of `byte_len` bytes: the smallest
/// digit count whose capacity covers every value of that many bytes.
#[must_use]
pub fn base60_width(byte_len: usize) -> usize {
    if byte_len == 0 {
        return 0;
    }
    ((byte_len * 8) as f64 / 60f64.log2()).ceil() as usize
}

fn base60_byte_len(width: usize) -> usize {
    (width as f64 * 60f64.log2() / 8.0).floor() as usize
}

/// Repeated-division rebase of big-endian digits between arbitrary bases.
fn base_convert(input: &[u8], from: u32, to: u32) -> Vec<u8> {
    let mut source: Vec<u32> = input.iter().map(|&digit| u32::from(digit)).collect();
    let mut digits = Vec::new();
    while source.iter().any(|&digit| digit != 0) {
        let mut remainder = 0u32;
        let mut next = Vec::with_capacity(source.len());
        for &digit in &source {
            let acc = remainder * from + digit;
            let quotient = acc / to;
            remainder = acc % to;
            if !next.is_empty() || quotient != 0 {
                next.push(quotient);
            }
        }
        digits.push(remainder as u8);
        source = next;
    }
    digits.reverse();
    digits
}

fn symbol_value(alphabet: &[u8], symbol: char) -> Option<u8> {
    if !symbol.is_ascii() {
        return None;
    }
    alphabet
        .iter()
        .position(|&entry| entry == symbol as u8)
        .map(|index| index as u8)
}
