use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::iter::Iter;
use crate::node::{self, Link, Node, Outcome};

/// A sequence of symbols backed by a rank-augmented AVL tree.
///
/// Positional insert, remove and lookup are O(log n); `get_range` is
/// O(length + log n).
///
/// ```
/// use edit_tree::EditTree;
///
/// let mut tree = EditTree::from("editor");
/// assert_eq!(tree.get(0), Ok(&'e'));
/// assert_eq!(tree.remove(0), Ok('e'));
/// tree.insert(0, 'a').unwrap();
/// assert_eq!(tree.to_string(), "aditor");
/// ```
#[derive(Debug)]
pub struct EditTree<T = char> {
    root: Link<T>,
    len: usize,
    /// Primitive rotations performed over this tree's lifetime.
    rotations: usize,
}

impl<T> Default for EditTree<T> {
    fn default() -> Self {
        Self {
            root: None,
            len: 0,
            rotations: 0,
        }
    }
}

/// Copies every node. The copy's rotation count starts at zero, since copying
/// performs no rotations.
impl<T: Clone> Clone for EditTree<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
            rotations: 0,
        }
    }
}

impl<T> EditTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_symbol(symbol: T) -> Self {
        Self {
            root: Some(Box::new(Node::leaf(symbol))),
            len: 1,
            rotations: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Lifetime count of rotations; a double rotation counts as two.
    pub fn rotation_count(&self) -> usize {
        self.rotations
    }

    /// Read-only view of the root, for tooling that renders the tree.
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root(), self.len)
    }

    fn record(&mut self, outcome: Outcome) {
        self.rotations += outcome.rotations;
    }

    /// Inserts `symbol` at `position`, shifting everything after it right.
    /// `position == len()` appends.
    pub fn insert(&mut self, position: usize, symbol: T) -> Result<()> {
        if position > self.len {
            return Err(Error::OutOfRange {
                position,
                len: self.len,
            });
        }
        let outcome = node::insert(&mut self.root, position, symbol);
        self.record(outcome);
        self.len += 1;
        Ok(())
    }

    /// Appends `symbol` by descending the right spine.
    pub fn push(&mut self, symbol: T) {
        let outcome = node::push(&mut self.root, symbol);
        self.record(outcome);
        self.len += 1;
    }

    pub fn get(&self, position: usize) -> Result<&T> {
        if position >= self.len {
            return Err(Error::OutOfRange {
                position,
                len: self.len,
            });
        }
        node::get(&self.root, position).ok_or(Error::OutOfRange {
            position,
            len: self.len,
        })
    }

    /// Removes and returns the symbol at `position`.
    ///
    /// A node with two children takes its in-order successor's symbol.
    pub fn remove(&mut self, position: usize) -> Result<T> {
        let out_of_range = Error::OutOfRange {
            position,
            len: self.len,
        };
        if position >= self.len {
            return Err(out_of_range);
        }
        let removed = node::remove(&mut self.root, position).ok_or(out_of_range)?;
        self.record(removed.outcome);
        self.len -= 1;
        Ok(removed.symbol)
    }

    // The checks below walk the whole tree without trusting ranks or balance
    // codes. They exist for tests and debugging.

    /// Height by brute force; -1 for an empty tree.
    pub fn slow_height(&self) -> isize {
        node::slow_height(&self.root)
    }

    pub fn slow_size(&self) -> usize {
        node::slow_size(&self.root)
    }

    pub fn ranks_match_left_subtree_size(&self) -> bool {
        node::checked_size(&self.root).is_some()
    }

    /// True iff every balance code matches the children's actual heights and
    /// no node is more than one level out of balance.
    pub fn balance_codes_are_correct(&self) -> bool {
        node::checked_height(&self.root).is_some()
    }

    /// Height in O(log n) by following balance codes; only meaningful when
    /// [`balance_codes_are_correct`](Self::balance_codes_are_correct) holds.
    pub fn fast_height(&self) -> isize {
        node::fast_height(&self.root)
    }
}

impl<T: Clone> EditTree<T> {
    /// Copies out `length` symbols starting at `position`.
    pub fn get_range(&self, position: usize, length: usize) -> Result<Vec<T>> {
        let end = position.checked_add(length).ok_or(Error::OutOfRange {
            position: usize::MAX,
            len: self.len,
        })?;
        if end > self.len {
            return Err(Error::OutOfRange {
                position: end,
                len: self.len,
            });
        }
        let mut out = Vec::with_capacity(length);
        node::extend_range(&self.root, position, end, &mut out);
        Ok(out)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Display> EditTree<T> {
    /// Pre-order `<symbol><rank>` dump, e.g. `[b1, a0, c0]`.
    pub fn to_rank_string(&self) -> String {
        node::preorder_string(&self.root, false)
    }

    /// Pre-order `<symbol><rank><balance>` dump, e.g. `[b1/, a0=]`.
    pub fn to_debug_string(&self) -> String {
        node::preorder_string(&self.root, true)
    }
}

/// Builds a balanced tree in O(n) rather than inserting one symbol at a time.
impl<T> From<Vec<T>> for EditTree<T> {
    fn from(symbols: Vec<T>) -> Self {
        let len = symbols.len();
        let (root, levels) = node::build(&mut symbols.into_iter(), len);
        log::debug!("built tree of {len} symbols, {levels} levels");
        Self {
            root,
            len,
            rotations: 0,
        }
    }
}

impl<T: Clone> From<&[T]> for EditTree<T> {
    fn from(symbols: &[T]) -> Self {
        Self::from(symbols.to_vec())
    }
}

impl From<&str> for EditTree<char> {
    fn from(text: &str) -> Self {
        text.chars().collect()
    }
}

impl<T> FromIterator<T> for EditTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(Vec::from_iter(iter))
    }
}

impl<T> Extend<T> for EditTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for symbol in iter {
            self.push(symbol);
        }
    }
}

impl<'a, T> IntoIterator for &'a EditTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Trees are equal when they hold the same sequence, whatever their shape.
impl<T: PartialEq> PartialEq for EditTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for EditTree<T> {}

impl<T: Display> Display for EditTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for symbol in self {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl<T: Serialize> Serialize for EditTree<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for EditTree<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from)
    }
}
