use itertools::Itertools;
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use std::time::Instant;

use super::{options::BuildOptions, TreeNode};
use crate::domain::{
    error::{MerkleError, Result},
    hash::HashValue,
};

/// Reduces an ordered, power-of-two sized list of leaf hashes to a single root.
#[derive(Clone, Debug, Default)]
pub struct TreeBuilder {
    options: BuildOptions,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Build the tree over already-hashed leaves, keeping their order.
    ///
    /// Fails before any hashing if `leaves` is empty or its length is not a
    /// power of two. A single leaf is returned as the root unchanged.
    pub fn build(&self, leaves: Vec<HashValue>) -> Result<TreeNode> {
        let total_start = Instant::now();
        check_leaf_count(leaves.len())?;

        let mut level: Vec<TreeNode> = leaves.into_iter().map(TreeNode::leaf).collect();
        trace!("Wrapped {} leaves", level.len());

        let mut height = 0;
        while level.len() > 1 {
            let level_start = Instant::now();
            let width = level.len();
            level = self.reduce_level(level);
            height += 1;
            debug!(
                "Reduced level {} ({} -> {} nodes) in {:?}",
                height,
                width,
                level.len(),
                level_start.elapsed()
            );
        }

        // check_leaf_count guarantees at least one node survives
        let root = level.pop().ok_or(MerkleError::EmptyInput)?;
        info!("Total duration of build: {:?}", total_start.elapsed());
        Ok(root)
    }

    /// Digest each raw item with SHA-256 and build the tree over the digests.
    pub fn build_from_data<I, T>(&self, items: I) -> Result<TreeNode>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]> + Sync,
    {
        let items: Vec<T> = items.into_iter().collect();
        check_leaf_count(items.len())?;

        let hash_start = Instant::now();
        let leaves: Vec<HashValue> = if self.options.use_pool(items.len()) {
            items
                .par_iter()
                .map(|item| HashValue::from(item.as_ref()).digest())
                .collect()
        } else {
            items
                .iter()
                .map(|item| HashValue::from(item.as_ref()).digest())
                .collect()
        };
        debug!("Hashing {} items took {:?}", leaves.len(), hash_start.elapsed());

        self.build(leaves)
    }

    /// Only the Merkle root of `leaves`.
    pub fn root(&self, leaves: Vec<HashValue>) -> Result<HashValue> {
        self.build(leaves).map(TreeNode::into_hash)
    }

    /// Pair consecutive nodes left to right; the previous level is consumed.
    fn reduce_level(&self, level: Vec<TreeNode>) -> Vec<TreeNode> {
        let pairs: Vec<(TreeNode, TreeNode)> = level.into_iter().tuples().collect();

        if self.options.use_pool(pairs.len()) {
            pairs
                .into_par_iter()
                .map(|(left, right)| TreeNode::internal(left, right))
                .collect()
        } else {
            pairs
                .into_iter()
                .map(|(left, right)| TreeNode::internal(left, right))
                .collect()
        }
    }
}

/// [`TreeBuilder::build`] with default options.
pub fn build_tree(leaves: Vec<HashValue>) -> Result<TreeNode> {
    TreeBuilder::default().build(leaves)
}

fn check_leaf_count(count: usize) -> Result<()> {
    if count == 0 {
        warn!("Refusing to build a tree without leaves");
        return Err(MerkleError::EmptyInput);
    }
    if !count.is_power_of_two() {
        warn!("Refusing to build a tree over {} leaves", count);
        return Err(MerkleError::InvalidSize(count));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{build_tree, TreeBuilder};
    use crate::domain::{
        error::MerkleError,
        hash::HashValue,
        tree::{options::BuildOptions, TreeNode},
    };
    use rand::Rng;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn byte(b: u8) -> HashValue {
        HashValue::new(vec![b])
    }

    fn generate_random_leaves(count: usize) -> Vec<HashValue> {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| {
                let data: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
                HashValue::new(data)
            })
            .collect()
    }

    /// Every internal node must hash its children's concatenation.
    fn assert_well_formed(node: &TreeNode) {
        if let TreeNode::Internal { hash, left, right } = node {
            assert_eq!(hash, &left.hash().concat(right.hash()).digest());
            assert_eq!(left.depth(), right.depth(), "Tree must be complete");
            assert_well_formed(left);
            assert_well_formed(right);
        }
    }

    #[test]
    fn test_empty_leaves_error() {
        init_logger();
        let result = build_tree(vec![]);
        assert_eq!(result, Err(MerkleError::EmptyInput));
    }

    #[test]
    fn test_non_power_of_two_error() {
        init_logger();
        for count in [3usize, 5, 6, 7, 9, 12, 100] {
            let result = build_tree(generate_random_leaves(count));
            assert_eq!(
                result,
                Err(MerkleError::InvalidSize(count)),
                "{} leaves must be rejected",
                count
            );
        }
    }

    #[test]
    fn test_build_from_data_checks_count_first() {
        let builder = TreeBuilder::new();
        assert_eq!(
            builder.build_from_data(Vec::<Vec<u8>>::new()),
            Err(MerkleError::EmptyInput)
        );
        assert_eq!(
            builder.build_from_data([b"a", b"b", b"c"]),
            Err(MerkleError::InvalidSize(3))
        );
    }

    #[test]
    fn test_single_leaf_tree() {
        init_logger();
        let leaf = HashValue::from_text("only_leaf");
        let root = build_tree(vec![leaf.clone()]).expect("Single leaf must build");

        assert!(root.is_leaf());
        assert_eq!(root.hash(), &leaf, "Single leaf must be the root unchanged");
    }

    #[test]
    fn test_power_of_two_sizes_succeed() {
        init_logger();
        for (count, depth) in [(1usize, 0usize), (2, 1), (4, 2), (8, 3), (64, 6)] {
            let leaves = generate_random_leaves(count);
            let root = build_tree(leaves.clone()).expect("Power of two must build");

            assert_eq!(root.depth(), depth);
            assert_eq!(root.leaf_count(), count);
            assert_eq!(root.hash().len(), 32);
            let kept: Vec<_> = root.leaves().cloned().collect();
            assert_eq!(kept, leaves, "Leaves must keep input order");
            assert_well_formed(&root);
        }
    }

    #[test]
    fn test_two_leaves() {
        let root = build_tree(vec![byte(0xAA), byte(0xBB)]).unwrap();
        assert_eq!(
            root.hash().to_hex(),
            "D798D1FAC6BD4BB1C11F50312760351013379A0AB6F0A8C0AF8A506B96B2525A"
        );
    }

    #[test]
    fn test_four_leaf_worked_example() {
        init_logger();
        let (h1, h2, h3, h4) = (byte(0xAA), byte(0xBB), byte(0xCC), byte(0xDD));
        let root = build_tree(vec![h1.clone(), h2.clone(), h3.clone(), h4.clone()]).unwrap();

        let n1 = h1.concat(&h2).digest();
        let n2 = h3.concat(&h4).digest();
        assert_eq!(root.hash(), &n1.concat(&n2).digest());
        assert_eq!(
            root.hash().to_hex(),
            "6D62581504ABD8443170846AF03BF44C80FC49F2234156831A8D4069310AB2B9"
        );
        assert_eq!(root.left().map(TreeNode::hash), Some(&n1));
        assert_eq!(root.right().map(TreeNode::hash), Some(&n2));
    }

    #[test]
    fn test_order_sensitivity() {
        let h1 = HashValue::from_text("first");
        let h2 = HashValue::from_text("second");

        let forward = build_tree(vec![h1.clone(), h2.clone()]).unwrap();
        let backward = build_tree(vec![h2, h1]).unwrap();
        assert_ne!(forward.hash(), backward.hash());
    }

    #[test]
    fn test_deterministic_root() {
        let leaves = generate_random_leaves(16);
        let first = build_tree(leaves.clone()).unwrap();
        let second = build_tree(leaves).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        init_logger();
        let leaves = generate_random_leaves(256);

        let sequential = TreeBuilder::with_options(BuildOptions::default().with_parallel(false))
            .root(leaves.clone())
            .unwrap();
        let parallel = TreeBuilder::with_options(
            BuildOptions::default()
                .with_parallel(true)
                .with_parallel_threshold(1),
        )
        .root(leaves)
        .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_build_from_data_digests_items() {
        let items = vec![b"leaf0".to_vec(), b"leaf1".to_vec()];
        let builder =
            TreeBuilder::with_options(BuildOptions::default().with_parallel_threshold(1));
        let root = builder.build_from_data(items.clone()).unwrap();

        let expected = build_tree(
            items
                .iter()
                .map(|item| HashValue::from(item.as_slice()).digest())
                .collect(),
        )
        .unwrap();
        assert_eq!(root, expected);
    }

    #[test]
    fn test_duplicate_leaves() {
        let dup = HashValue::from_text("dup");
        let root = build_tree(vec![dup.clone(); 4]).unwrap();

        assert_eq!(root.leaves().filter(|h| **h == dup).count(), 4);
        assert_eq!(root.left().map(TreeNode::hash), root.right().map(TreeNode::hash));
    }
}
