//! Merkle root computation over ordered, power-of-two sized lists of hashes.
//!
//! Leaves are kept as given; every internal node holds
//! `SHA-256(left ‖ right)` of its children's hashes.
#![deny(clippy::all)]

pub mod domain;

pub use domain::error::{MerkleError, Result};
pub use domain::hash::{sha256::hash_sha256, HashValue};
pub use domain::tree::{
    builder::{build_tree, TreeBuilder},
    options::BuildOptions,
    Leaves, TreeNode,
};
