use crate::domain::hash::HashValue;

pub mod builder;
pub mod options;

/// A node of a Merkle tree. The root owns the whole structure beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// One input hash, kept unchanged.
    Leaf(HashValue),
    /// `hash == digest(left.hash ‖ right.hash)`.
    Internal {
        hash: HashValue,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    pub fn leaf(hash: HashValue) -> Self {
        TreeNode::Leaf(hash)
    }

    /// Join two subtrees under a new node hashing their concatenation.
    pub fn internal(left: TreeNode, right: TreeNode) -> Self {
        let hash = left.hash().concat(right.hash()).digest();
        TreeNode::Internal {
            hash,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The summarizing hash of this node. For the root, the Merkle root.
    pub fn hash(&self) -> &HashValue {
        match self {
            TreeNode::Leaf(hash) => hash,
            TreeNode::Internal { hash, .. } => hash,
        }
    }

    pub fn into_hash(self) -> HashValue {
        match self {
            TreeNode::Leaf(hash) => hash,
            TreeNode::Internal { hash, .. } => hash,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf(_))
    }

    pub fn left(&self) -> Option<&TreeNode> {
        match self {
            TreeNode::Leaf(_) => None,
            TreeNode::Internal { left, .. } => Some(&**left),
        }
    }

    pub fn right(&self) -> Option<&TreeNode> {
        match self {
            TreeNode::Leaf(_) => None,
            TreeNode::Internal { right, .. } => Some(&**right),
        }
    }

    /// Edges from this node down to its leaves. Trees built here are
    /// complete, so following the left spine is enough.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self;
        while let Some(left) = node.left() {
            depth += 1;
            node = left;
        }
        depth
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// Leaf hashes, left to right.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }
}

/// Depth-first iterator over the leaf hashes of a tree.
pub struct Leaves<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a HashValue;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                TreeNode::Leaf(hash) => return Some(hash),
                TreeNode::Internal { left, right, .. } => {
                    // right first so that left is popped next
                    self.stack.push(right);
                    self.stack.push(left);
                }
            }
        }
        None
    }
}
