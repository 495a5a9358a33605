use thiserror::Error;

/// Errors produced by tree construction, the tree codec and the text codec.
///
/// Every failure is final for the call that raised it: no partial tree,
/// bit stream or text is ever returned alongside an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HuffmanError {
    /// The input text holds fewer than two distinct symbols, so no prefix
    /// code can be assigned.
    #[error("input must contain at least 2 distinct symbols, found {distinct}")]
    InsufficientAlphabet { distinct: usize },

    /// The flattened shape/leaves pair does not describe a valid tree.
    #[error("malformed tree data: {reason}")]
    MalformedTreeData { reason: &'static str },

    /// The text being encoded contains a symbol the tree has no leaf for.
    #[error("symbol {symbol:?} has no code in the encoding tree")]
    UnmappedSymbol { symbol: char },

    /// The message bits do not resolve into complete root-to-leaf paths.
    #[error("malformed message bits: {reason}")]
    MalformedMessage { reason: &'static str },
}
