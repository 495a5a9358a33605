use std::collections::HashMap;

use bitvec::prelude::*;

use crate::error::HuffmanError;
use crate::hufftree::{HuffNode, HuffmanTree};
use crate::package::EncodedPackage;

/// Encodes and decodes text against one encoding tree.
///
/// Construction derives the code table (symbol -> root-to-leaf bit path) in
/// a single traversal; the table is owned by the codec and never persisted.
pub struct HuffmanCodec {
    tree: HuffmanTree,
    code_table: HashMap<char, BitVec<u8, Msb0>>,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        let mut code_table = HashMap::new();
        let mut prefix = BitVec::new();
        collect_codes(&tree.root, &mut prefix, &mut code_table);
        HuffmanCodec { tree, code_table }
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Encodes `text` by concatenating each character's code in order.
    ///
    /// Fails with [`HuffmanError::UnmappedSymbol`] on the first character
    /// the tree has no leaf for.
    pub fn encode(&self, text: &str) -> Result<BitVec<u8, Msb0>, HuffmanError> {
        let mut bits = BitVec::new();
        for symbol in text.chars() {
            let code = self
                .code_table
                .get(&symbol)
                .ok_or(HuffmanError::UnmappedSymbol { symbol })?;
            bits.extend_from_bitslice(code);
        }
        Ok(bits)
    }

    /// Decodes `bits` by walking the tree from the root: bit 0 takes the
    /// zero branch, bit 1 the one branch; reaching a leaf emits its symbol
    /// and resets the walk to the root, until the bits are exhausted.
    ///
    /// Fails with [`HuffmanError::MalformedMessage`] when the bits end in
    /// the middle of a code, or when a bit would step below a leaf (which
    /// can only happen with a single-leaf tree from `unflatten`).
    pub fn decode(&self, bits: &BitSlice<u8, Msb0>) -> Result<String, HuffmanError> {
        let root = &self.tree.root;
        let mut node = root;
        let mut text = String::new();

        for bit in bits.iter().by_vals() {
            node = match node {
                HuffNode::Internal { zero, one } => {
                    if bit {
                        one.as_ref()
                    } else {
                        zero.as_ref()
                    }
                }
                HuffNode::Leaf { .. } => {
                    return Err(HuffmanError::MalformedMessage {
                        reason: "bit walks below a leaf with no children",
                    });
                }
            };
            if let HuffNode::Leaf { symbol } = node {
                text.push(*symbol);
                node = root;
            }
        }

        if !std::ptr::eq(node, root) {
            return Err(HuffmanError::MalformedMessage {
                reason: "message bits end in the middle of a code",
            });
        }
        Ok(text)
    }
}

fn collect_codes(
    node: &HuffNode,
    prefix: &mut BitVec<u8, Msb0>,
    table: &mut HashMap<char, BitVec<u8, Msb0>>,
) {
    match node {
        HuffNode::Leaf { symbol } => {
            table.insert(*symbol, prefix.clone());
        }
        HuffNode::Internal { zero, one } => {
            prefix.push(false);
            collect_codes(zero, prefix, table);
            prefix.pop();
            prefix.push(true);
            collect_codes(one, prefix, table);
            prefix.pop();
        }
    }
}

/// Compresses `text` into a self-describing package: the flattened encoding
/// tree plus the encoded message bits.
///
/// Fails with [`HuffmanError::InsufficientAlphabet`] when `text` holds fewer
/// than two distinct characters.
pub fn compress(text: &str) -> Result<EncodedPackage, HuffmanError> {
    let tree = HuffmanTree::build(text)?;
    let codec = HuffmanCodec::new(tree);
    let message_bits = codec.encode(text)?;
    let (tree_shape, tree_leaves) = codec.tree().flatten();
    Ok(EncodedPackage {
        tree_shape,
        tree_leaves,
        message_bits,
    })
}

/// Reconstructs the original text from a package produced by [`compress`].
///
/// Propagates [`HuffmanError::MalformedTreeData`] and
/// [`HuffmanError::MalformedMessage`] when the package is inconsistent.
pub fn decompress(package: &EncodedPackage) -> Result<String, HuffmanError> {
    let tree = HuffmanTree::unflatten(&package.tree_shape, &package.tree_leaves)?;
    HuffmanCodec::new(tree).decode(&package.message_bits)
}
