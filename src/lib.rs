//! A height-balanced, rank-augmented binary tree for text-editing buffers.
//!
//! [`EditTree`] stores a sequence of symbols (characters by default) and
//! supports insert, remove and lookup by position in O(log n).

pub mod balance;
pub mod edit_tree;
pub mod error;
pub mod iter;
pub mod node;

pub use self::balance::{Balance, Side};
pub use self::edit_tree::EditTree;
pub use self::error::{Error, Result};
pub use self::iter::Iter;
pub use self::node::Node;
