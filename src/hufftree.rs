use std::collections::BTreeMap;

use bitvec::prelude::*;

use crate::error::HuffmanError;
use crate::min_heap::MinHeap;

/// One node of an encoding tree.
///
/// Branch order is semantic: taking the `zero` branch appends bit 0 to a
/// symbol's code, the `one` branch appends bit 1. Equality is structural,
/// which is exactly the tree-equality the round-trip laws are stated in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: char,
    },
    Internal {
        zero: Box<HuffNode>,
        one: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(symbol: char) -> Self {
        HuffNode::Leaf { symbol }
    }

    pub fn internal(zero: HuffNode, one: HuffNode) -> Self {
        HuffNode::Internal {
            zero: Box::new(zero),
            one: Box::new(one),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    fn flatten_into(&self, shape: &mut BitVec<u8, Msb0>, leaves: &mut Vec<char>) {
        match self {
            HuffNode::Leaf { symbol } => {
                shape.push(false);
                leaves.push(*symbol);
            }
            HuffNode::Internal { zero, one } => {
                shape.push(true);
                zero.flatten_into(shape, leaves);
                one.flatten_into(shape, leaves);
            }
        }
    }

    fn unflatten_from(
        shape: &mut impl Iterator<Item = bool>,
        leaves: &mut impl Iterator<Item = char>,
    ) -> Result<HuffNode, HuffmanError> {
        match shape.next() {
            None => Err(HuffmanError::MalformedTreeData {
                reason: "shape bits exhausted before the tree was complete",
            }),
            Some(false) => leaves
                .next()
                .map(HuffNode::leaf)
                .ok_or(HuffmanError::MalformedTreeData {
                    reason: "leaf symbols exhausted before the tree was complete",
                }),
            Some(true) => {
                let zero = HuffNode::unflatten_from(shape, leaves)?;
                let one = HuffNode::unflatten_from(shape, leaves)?;
                Ok(HuffNode::internal(zero, one))
            }
        }
    }
}

/// An optimal prefix-code tree over the characters of one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    /// Builds the Huffman tree for `text`.
    ///
    /// Counts character frequencies in one pass, then greedily merges the
    /// two lowest-weight trees until one remains; the first tree popped
    /// becomes the `zero` branch of the merge. Leaves enter the queue in
    /// ascending character order and weight ties pop most-recent-first, so
    /// the resulting tree (and therefore the bit output) is deterministic.
    ///
    /// Fails with [`HuffmanError::InsufficientAlphabet`] when `text` holds
    /// fewer than two distinct characters, including the empty text.
    pub fn build(text: &str) -> Result<HuffmanTree, HuffmanError> {
        let mut frequencies: BTreeMap<char, u64> = BTreeMap::new();
        for symbol in text.chars() {
            *frequencies.entry(symbol).or_insert(0) += 1;
        }

        let distinct = frequencies.len();
        if distinct < 2 {
            return Err(HuffmanError::InsufficientAlphabet { distinct });
        }

        let mut heap = MinHeap::with_capacity(distinct);
        for (symbol, weight) in frequencies {
            heap.push(HuffNode::leaf(symbol), weight);
        }

        while let Some(((zero, zero_weight), (one, one_weight))) = heap.pop_two() {
            heap.push(HuffNode::internal(zero, one), zero_weight + one_weight);
        }

        // The heap holds exactly one tree here; distinct >= 2 was checked.
        heap.pop()
            .map(|(root, _)| HuffmanTree { root })
            .ok_or(HuffmanError::InsufficientAlphabet { distinct })
    }

    /// Serializes the tree into its flattened form.
    ///
    /// The shape bits record a pre-order walk: 1 for an internal node
    /// (zero branch first, then one branch), 0 for a leaf. The leaf symbols
    /// are listed in the order that same walk visits them.
    pub fn flatten(&self) -> (BitVec<u8, Msb0>, Vec<char>) {
        let mut shape = BitVec::new();
        let mut leaves = Vec::new();
        self.root.flatten_into(&mut shape, &mut leaves);
        (shape, leaves)
    }

    /// Rebuilds a tree from its flattened form, consuming `shape` and
    /// `leaves` in lockstep with the order [`flatten`](Self::flatten) emits.
    ///
    /// Fails with [`HuffmanError::MalformedTreeData`] when either sequence
    /// runs out before the tree is complete, or when elements remain after
    /// the root has been fully parsed.
    pub fn unflatten(
        shape: &BitSlice<u8, Msb0>,
        leaves: &[char],
    ) -> Result<HuffmanTree, HuffmanError> {
        let mut shape_bits = shape.iter().by_vals();
        let mut leaf_symbols = leaves.iter().copied();

        let root = HuffNode::unflatten_from(&mut shape_bits, &mut leaf_symbols)?;

        if shape_bits.next().is_some() {
            return Err(HuffmanError::MalformedTreeData {
                reason: "unconsumed shape bits after the tree was complete",
            });
        }
        if leaf_symbols.next().is_some() {
            return Err(HuffmanError::MalformedTreeData {
                reason: "unconsumed leaf symbols after the tree was complete",
            });
        }

        Ok(HuffmanTree { root })
    }
}

/// The reference tree used across the test suite:
///
/// ```text
///        *
///       / \
///      T   *
///         / \
///        *   E
///       / \
///      R   S
/// ```
#[cfg(test)]
pub(crate) fn example_tree() -> HuffmanTree {
    let rs = HuffNode::internal(HuffNode::leaf('R'), HuffNode::leaf('S'));
    let rse = HuffNode::internal(rs, HuffNode::leaf('E'));
    HuffmanTree {
        root: HuffNode::internal(HuffNode::leaf('T'), rse),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn build_reproduces_example_tree() {
        let tree = HuffmanTree::build("STREETTEST").unwrap();
        assert_eq!(tree, example_tree());
    }

    #[test]
    fn build_two_symbol_text() {
        let tree = HuffmanTree::build("AB").unwrap();
        // Equal weights: 'B' entered the queue last, so it pops first and
        // becomes the zero branch.
        let expected = HuffmanTree {
            root: HuffNode::internal(HuffNode::leaf('B'), HuffNode::leaf('A')),
        };
        assert_eq!(tree, expected);
    }

    #[test]
    fn build_accepts_non_alphabetic_symbols() {
        let tree = HuffmanTree::build("-!").unwrap();
        let expected = HuffmanTree {
            root: HuffNode::internal(HuffNode::leaf('-'), HuffNode::leaf('!')),
        };
        assert_eq!(tree, expected);
    }

    #[test]
    fn build_rejects_empty_text() {
        assert_eq!(
            HuffmanTree::build(""),
            Err(HuffmanError::InsufficientAlphabet { distinct: 0 })
        );
    }

    #[test]
    fn build_rejects_single_symbol_text() {
        assert_eq!(
            HuffmanTree::build("aaaa"),
            Err(HuffmanError::InsufficientAlphabet { distinct: 1 })
        );
    }

    #[test]
    fn flatten_example_tree() {
        let (shape, leaves) = example_tree().flatten();
        assert_eq!(shape, bitvec![u8, Msb0; 1, 0, 1, 1, 0, 0, 0]);
        assert_eq!(leaves, vec!['T', 'R', 'S', 'E']);
    }

    #[test]
    fn unflatten_example_tree() {
        let shape = bitvec![u8, Msb0; 1, 0, 1, 1, 0, 0, 0];
        let leaves = ['T', 'R', 'S', 'E'];
        let tree = HuffmanTree::unflatten(&shape, &leaves).unwrap();
        assert_eq!(tree, example_tree());
    }

    #[test]
    fn flatten_unflatten_round_trip() {
        for text in ["STREETTEST", "HAPPY HIP HOP", "abracadabra", "-!-!-?"] {
            let tree = HuffmanTree::build(text).unwrap();
            let (shape, leaves) = tree.flatten();
            assert_eq!(HuffmanTree::unflatten(&shape, &leaves).unwrap(), tree);
        }
    }

    #[test]
    fn unflatten_single_leaf() {
        let shape = bitvec![u8, Msb0; 0];
        let tree = HuffmanTree::unflatten(&shape, &['A']).unwrap();
        assert_eq!(tree.root, HuffNode::leaf('A'));
    }

    #[test]
    fn unflatten_rejects_exhausted_shape() {
        // The one branch of the root is never described.
        let shape = bitvec![u8, Msb0; 1, 0];
        let err = HuffmanTree::unflatten(&shape, &['A', 'B']).unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedTreeData { .. }));
    }

    #[test]
    fn unflatten_rejects_exhausted_leaves() {
        let shape = bitvec![u8, Msb0; 1, 0, 0];
        let err = HuffmanTree::unflatten(&shape, &['A']).unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedTreeData { .. }));
    }

    #[test]
    fn unflatten_rejects_leftover_shape_bits() {
        let shape = bitvec![u8, Msb0; 0, 0];
        let err = HuffmanTree::unflatten(&shape, &['A', 'B']).unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedTreeData { .. }));
    }

    #[test]
    fn unflatten_rejects_leftover_leaves() {
        let shape = bitvec![u8, Msb0; 0];
        let err = HuffmanTree::unflatten(&shape, &['A', 'B']).unwrap_err();
        assert!(matches!(err, HuffmanError::MalformedTreeData { .. }));
    }
}
