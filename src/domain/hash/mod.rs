use std::fmt;

use crate::domain::error::Result;

pub mod sha256;

use sha256::hash_sha256;

/// An immutable byte string: a digest, or the raw payload before digesting.
///
/// Every producing operation returns a fresh value. Hex rendering is uppercase,
/// two characters per byte, most significant nibble first.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashValue {
    bytes: Vec<u8>,
}

impl HashValue {
    /// Wrap raw bytes as-is. Zero-length input is allowed.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// UTF-8 bytes of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }

    /// Text that arrives as bytes. Fails when the bytes are not UTF-8.
    pub fn from_utf8(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_text(text))
    }

    /// Inverse of [`HashValue::to_hex`]. Either case is accepted.
    pub fn from_hex(encoded: &str) -> Result<Self> {
        Ok(Self::new(hex::decode(encoded)?))
    }

    /// SHA-256 of the bytes, always 32 bytes long.
    pub fn digest(&self) -> HashValue {
        hash_sha256(&self.bytes).into()
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.bytes)
    }

    /// Uppercase hex of the SHA-256 of the bytes.
    pub fn digest_hex(&self) -> String {
        hex::encode_upper(hash_sha256(&self.bytes))
    }

    /// Raw `self ‖ other`. Does not digest.
    pub fn concat(&self, other: &HashValue) -> HashValue {
        let mut bytes = Vec::with_capacity(self.bytes.len() + other.bytes.len());
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(&other.bytes);
        Self::new(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for HashValue {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for HashValue {
    fn from(value: Vec<u8>) -> Self {
        Self::new(value)
    }
}

impl From<&[u8]> for HashValue {
    fn from(value: &[u8]) -> Self {
        Self::new(value.to_vec())
    }
}

impl From<[u8; 32]> for HashValue {
    fn from(value: [u8; 32]) -> Self {
        Self::new(value.to_vec())
    }
}

impl From<&str> for HashValue {
    fn from(value: &str) -> Self {
        Self::from_text(value)
    }
}

impl From<String> for HashValue {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({})", self.to_hex())
    }
}
