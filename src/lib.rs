//! # huffpack
//!
//! Lossless Huffman text compression.
//!
//! A text is compressed into an [`EncodedPackage`]: the minimal-redundancy
//! bit encoding of its characters plus a compact flattened description of
//! the encoding tree, from which the original text is reconstructed exactly.
//!
//! ## Quick Start
//!
//! ```rust
//! let package = huffpack::compress("HAPPY HIP HOP")?;
//! let text = huffpack::decompress(&package)?;
//! assert_eq!(text, "HAPPY HIP HOP");
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```
//!
//! The lower layers are public too: [`HuffmanTree::build`] constructs the
//! optimal prefix-code tree, [`HuffmanTree::flatten`] /
//! [`HuffmanTree::unflatten`] convert it to and from its serialized shape,
//! and [`HuffmanCodec`] encodes and decodes text against a given tree.

pub mod error;
pub mod huffman_codec;
pub mod hufftree;
pub mod package;

// Internal module - not part of public API
mod min_heap;

// Re-export main types for convenience
pub use error::HuffmanError;
pub use huffman_codec::{compress, decompress, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree};
pub use package::EncodedPackage;
