use sha2::{digest::FixedOutput, Digest, Sha256};

pub const DIGEST_LEN: usize = 32;

/// Single SHA-256 over `data`.
pub fn hash_sha256(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize_fixed().into()
}
