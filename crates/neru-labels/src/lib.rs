//! Prefix-free label generation and trie-indexed lookup (§4.1, §4.2).

mod cache;
mod generate;
mod trie;

pub use cache::LabelCache;
pub use generate::{generate, is_prefix_free};
pub use trie::LabelTrie;
